pub mod model_tests;
pub mod random_factory_tests;

pub mod property_tester;
pub mod random_factory;

pub use property_tester::PropertyTester;
pub use random_factory::RandomValueFactory;

pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ ConfigError, TesterConfig };
pub use errors::{ AccessError, ContractViolation, PropertyTestError, PropertyTestResult };
pub use implementations::{ property_tester::PropertyTester, random_factory::RandomValueFactory };
pub use models::{
    property::{
        IgnoredProperties,
        PropertyDescriptor,
        PropertySelector,
    },
    value::{
        CollectionKind,
        Primitive,
        PropertyType,
        TypeDescriptor,
        TypeShape,
        Value,
    },
    verification::{
        PropertyOutcome,
        PropertyStatus,
        SkipReason,
        VerificationReport,
    },
};
pub use traits::{
    Inspectable,
    NotifyPropertyChanged,
    PropertyChangedEvent,
    PropertyTable,
    Reflect,
    ValueFactory,
};

pub mod property;
pub mod value;
pub mod verification;

// Re-export common model types
pub use property::{ IgnoredProperties, PropertyDescriptor, PropertySelector };
pub use value::{ CollectionKind, Primitive, PropertyType, TypeDescriptor, TypeShape, Value };
pub use verification::{ PropertyOutcome, PropertyStatus, SkipReason, VerificationReport };

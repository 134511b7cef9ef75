use std::fmt;

use thiserror::Error;

/// Errors raised while verifying the properties of a subject
#[derive(Debug, Error)]
pub enum PropertyTestError {
    /// A caller passed something the engine cannot work with (missing subject,
    /// malformed property selector, unknown property name)
    #[error("Invalid argument `{argument}`: {message}")]
    InvalidArgument { argument: String, message: String },

    /// The subject broke its get/set/notify contract for one property
    #[error("Property `{property}` failed verification: {violation}")]
    PropertyContract { property: String, violation: ContractViolation },

    /// The value factory misbehaved; the subject is not at fault
    #[error("Invalid operation for type {type_name}: {message}")]
    InvalidOperation { type_name: String, message: String },
}

/// Result type specific to property verification
pub type PropertyTestResult<T> = Result<T, PropertyTestError>;

impl PropertyTestError {
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        PropertyTestError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    pub fn contract(property: impl Into<String>, violation: ContractViolation) -> Self {
        PropertyTestError::PropertyContract {
            property: property.into(),
            violation,
        }
    }

    pub fn invalid_operation(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        PropertyTestError::InvalidOperation {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn is_argument_error(&self) -> bool {
        matches!(self, PropertyTestError::InvalidArgument { .. })
    }

    /// True when the subject is the side that needs fixing
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, PropertyTestError::PropertyContract { .. })
    }

    /// True when the value factory is the side that needs fixing
    pub fn is_generator_invalid(&self) -> bool {
        matches!(self, PropertyTestError::InvalidOperation { .. })
    }

    /// Name of the offending property, for contract violations
    pub fn property(&self) -> Option<&str> {
        match self {
            PropertyTestError::PropertyContract { property, .. } => Some(property),
            _ => None,
        }
    }

    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            PropertyTestError::PropertyContract { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

/// The ways a subject can break the property contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// Reading the property back did not return the value just written
    GetSetMismatch { expected: String, actual: String },
    /// The subject has a change notifier but assignment raised nothing for the property
    MissingNotification,
    /// Assignment raised more than one notification for the property
    DuplicateNotification { count: usize },
    /// The setter refused a value of the declared type
    SetterRejected(String),
    /// The getter failed after a successful assignment
    GetterFailed(String),
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::GetSetMismatch { expected, actual } => {
                write!(f, "get/set asymmetry: wrote {} but read back {}", expected, actual)
            }
            ContractViolation::MissingNotification => write!(f, "no change notification was raised"),
            ContractViolation::DuplicateNotification { count } => {
                write!(f, "expected exactly one change notification, got {}", count)
            }
            ContractViolation::SetterRejected(reason) => write!(f, "setter rejected the value: {}", reason),
            ContractViolation::GetterFailed(reason) => write!(f, "getter failed: {}", reason),
        }
    }
}

/// Failures reported by a subject when a property is read or written by name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("no property named `{0}`")]
    UnknownProperty(String),

    #[error("property `{0}` has no getter")]
    NotReadable(String),

    #[error("property `{0}` has no setter")]
    NotWritable(String),

    #[error("property `{0}` is indexed and needs arguments")]
    Indexed(String),

    #[error("property `{property}` expects {expected}, got {found}")]
    TypeMismatch { property: String, expected: String, found: String },

    #[error("property `{property}` rejected the value: {reason}")]
    Rejected { property: String, reason: String },
}

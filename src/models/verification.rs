use std::{ fmt, time::Duration };

/// Why a property was not exercised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    Indexed,
    NoSetter,
    /// The active value factory cannot build the property's type
    NotGeneratable { type_name: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ignored => write!(f, "ignored"),
            SkipReason::Indexed => write!(f, "indexed"),
            SkipReason::NoSetter => write!(f, "no setter"),
            SkipReason::NotGeneratable { type_name } => write!(f, "cannot generate {}", type_name),
        }
    }
}

/// Verdict for a single property in a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyStatus {
    Passed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyOutcome {
    pub property: String,
    pub status: PropertyStatus,
}

impl PropertyOutcome {
    pub fn passed(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            status: PropertyStatus::Passed,
        }
    }

    pub fn skipped(property: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            property: property.into(),
            status: PropertyStatus::Skipped(reason),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == PropertyStatus::Passed
    }
}

/// Summary of a run that finished without a violation
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub subject_type: String,
    pub outcomes: Vec<PropertyOutcome>,
    /// False when the subject has no change notifier
    pub notifications_checked: bool,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed: Duration,
}

impl VerificationReport {
    pub fn passed(&self) -> impl Iterator<Item = &PropertyOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_passed())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &PropertyOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_passed())
    }

    pub fn outcome(&self, property: &str) -> Option<&PropertyOutcome> {
        self.outcomes.iter().find(|outcome| outcome.property == property)
    }

    /// True when nothing was actually exercised
    pub fn is_vacuous(&self) -> bool {
        self.passed().next().is_none()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} passed, {} skipped",
            self.subject_type,
            self.passed().count(),
            self.skipped().count()
        )?;
        if !self.notifications_checked {
            write!(f, " (no change notifier)")?;
        }
        for outcome in self.skipped() {
            if let PropertyStatus::Skipped(reason) = &outcome.status {
                write!(f, "\n  {}: {}", outcome.property, reason)?;
            }
        }
        Ok(())
    }
}

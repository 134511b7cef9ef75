use std::cell::RefCell;
use std::collections::{ BTreeSet, HashSet };
use std::any::TypeId;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use log::{ debug, info, warn };

use crate::config::TesterConfig;
use crate::errors::{ AccessError, ContractViolation, PropertyTestError, PropertyTestResult };
use crate::implementations::random_factory::RandomValueFactory;
use crate::models::property::{ IgnoredProperties, PropertyDescriptor, PropertySelector };
use crate::models::value::{ TypeDescriptor, Value };
use crate::models::verification::{ PropertyOutcome, SkipReason, VerificationReport };
use crate::traits::inspectable::Inspectable;
use crate::traits::value_factory::ValueFactory;

type NotificationLog = Rc<RefCell<Vec<String>>>;

/// Exercises every writable property of a subject and checks that it reads
/// back what was written and, when the subject has a change notifier, that
/// each assignment announces exactly the property that changed.
///
/// ```rust
/// use propcheck::{ PropertyChangedEvent, PropertyTable, PropertyTester, Reflect };
/// use propcheck::traits::NotifyPropertyChanged;
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     changed: PropertyChangedEvent,
/// }
///
/// impl Reflect for Person {
///     fn property_table() -> PropertyTable<Self> {
///         PropertyTable::new().read_write(
///             "name",
///             |person: &Person| person.name.clone(),
///             |person: &mut Person, name: String| {
///                 person.name = name;
///                 person.changed.raise("name");
///             },
///         )
///     }
///
///     fn notifier(&mut self) -> Option<&mut dyn NotifyPropertyChanged> {
///         Some(&mut self.changed)
///     }
/// }
///
/// let mut person = Person::default();
/// let report = PropertyTester::new(&mut person).test_properties().unwrap();
/// assert_eq!(report.passed().count(), 1);
/// ```
pub struct PropertyTester<'a> {
    subject: &'a mut dyn Inspectable,
    factory: Box<dyn ValueFactory>,
    ignored: IgnoredProperties,
    completed_runs: usize,
}

impl<'a> PropertyTester<'a> {
    /// Create a tester that generates values with the default factory
    pub fn new(subject: &'a mut dyn Inspectable) -> Self {
        Self::with_factory(subject, RandomValueFactory::new())
    }

    pub fn with_factory(subject: &'a mut dyn Inspectable, factory: impl ValueFactory + 'static) -> Self {
        Self {
            subject,
            factory: Box::new(factory),
            ignored: IgnoredProperties::new(),
            completed_runs: 0,
        }
    }

    /// Create a tester whose default factory and ignored set come from `config`
    pub fn with_config(subject: &'a mut dyn Inspectable, config: &TesterConfig) -> Self {
        let mut tester = Self::with_factory(subject, RandomValueFactory::from_config(config));
        tester.ignored.extend(config.ignored_properties.iter().cloned());
        tester
    }

    /// Fallible construction for callers that may not have a subject at hand
    pub fn try_new(
        subject: Option<&'a mut dyn Inspectable>,
        factory: Option<Box<dyn ValueFactory>>
    ) -> PropertyTestResult<Self> {
        let subject = subject.ok_or_else(|| {
            PropertyTestError::invalid_argument("subject", "a subject instance is required")
        })?;
        Ok(match factory {
            Some(factory) => Self::with_factory(subject, factory),
            None => Self::new(subject),
        })
    }

    pub fn ignored_properties(&self) -> &IgnoredProperties {
        &self.ignored
    }

    pub fn ignored_properties_mut(&mut self) -> &mut IgnoredProperties {
        &mut self.ignored
    }

    /// Ignore the property read by `selector`, typically built with [`property!`](crate::property)
    pub fn add_ignored_property(&mut self, selector: PropertySelector) -> PropertyTestResult<()> {
        let name = selector.property_name()?;
        let declared = self.subject
            .properties()
            .iter()
            .any(|property| property.name == name);
        if !declared {
            return Err(
                PropertyTestError::invalid_argument(
                    "selector",
                    format!("{} declares no property `{}`", self.subject.type_name(), name)
                )
            );
        }
        debug!("Ignoring property {} (from `{}`)", name, selector);
        self.ignored.add(name);
        Ok(())
    }

    /// Run the full verification pass.
    ///
    /// Returns on the first violation. Subscriptions made on the subject's
    /// change notifier are removed before returning either way.
    pub fn test_properties(&mut self) -> PropertyTestResult<VerificationReport> {
        let started_at = chrono::Utc::now();
        let clock = Instant::now();
        let subject_type = self.subject.type_name().to_string();
        info!("Verifying properties of {}", subject_type);

        let notifications: NotificationLog = Rc::new(RefCell::new(Vec::new()));
        let subscription = self.subject.change_notifier().map(|notifier| {
            let log = Rc::clone(&notifications);
            notifier.subscribe(Box::new(move |property: &str| log.borrow_mut().push(property.to_string())))
        });
        if subscription.is_none() {
            debug!("{} has no change notifier; notification checks are skipped", subject_type);
        }

        let result = self.verify_all(subscription.is_some(), &notifications);

        if let Some(id) = subscription {
            let removed = self.subject
                .change_notifier()
                .map_or(false, |notifier| notifier.unsubscribe(id));
            if !removed {
                warn!("Could not unsubscribe from the change notifier of {}", subject_type);
            }
        }

        let outcomes = result?;
        self.completed_runs += 1;

        let report = VerificationReport {
            subject_type,
            outcomes,
            notifications_checked: subscription.is_some(),
            started_at,
            elapsed: clock.elapsed(),
        };
        info!("{}", report);
        Ok(report)
    }

    fn verify_all(&mut self, observe: bool, notifications: &NotificationLog) -> PropertyTestResult<Vec<PropertyOutcome>> {
        // distinguishability is checked once per type and run
        let mut checked_types = HashSet::new();
        self.factory.begin_run();
        let mut outcomes = Vec::new();
        for property in self.subject.properties() {
            let outcome = self.verify_property(&property, observe, notifications, &mut checked_types)?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn verify_property(
        &mut self,
        property: &PropertyDescriptor,
        observe: bool,
        notifications: &NotificationLog,
        checked_types: &mut HashSet<TypeId>
    ) -> PropertyTestResult<PropertyOutcome> {
        let name = property.name.as_str();
        let ty = &property.property_type;

        if property.indexed {
            return Ok(PropertyOutcome::skipped(name, SkipReason::Indexed));
        }
        if self.ignored.contains(name) {
            debug!("Skipping ignored property {}", name);
            return Ok(PropertyOutcome::skipped(name, SkipReason::Ignored));
        }
        if !property.writable {
            return Ok(PropertyOutcome::skipped(name, SkipReason::NoSetter));
        }
        if !self.factory.can_create_instance(ty) {
            warn!("Skipping {}: no value can be generated for {}", name, ty.name());
            return Ok(
                PropertyOutcome::skipped(name, SkipReason::NotGeneratable {
                    type_name: ty.name().to_string(),
                })
            );
        }

        let first = self.generate(ty)?;
        let mut second = None;
        let mut assigned = first.clone();

        // a change-guarded setter stays silent when handed the value it already holds
        if observe && property.readable && self.read(name)? == first {
            let next = self.generate(ty)?;
            if next == first {
                checked_types.insert(ty.type_id());
                return Err(Self::indistinguishable(ty, &first));
            }
            assigned = next.clone();
            second = Some(next);
        }

        debug!("Assigning {:?} to {}", assigned, name);
        notifications.borrow_mut().clear();
        self.subject
            .set_property(name, assigned.clone())
            .map_err(|err| Self::setter_error(name, ty, err))?;

        if property.readable {
            let actual = self.read(name)?;
            if actual != assigned {
                return Err(
                    PropertyTestError::contract(name, ContractViolation::GetSetMismatch {
                        expected: format!("{:?}", assigned),
                        actual: format!("{:?}", actual),
                    })
                );
            }
        }

        if observe {
            let raised = notifications
                .borrow()
                .iter()
                .filter(|changed| changed.as_str() == name)
                .count();
            match raised {
                1 => {}
                0 => {
                    return Err(PropertyTestError::contract(name, ContractViolation::MissingNotification));
                }
                count => {
                    return Err(PropertyTestError::contract(name, ContractViolation::DuplicateNotification { count }));
                }
            }
        }

        let second = match second {
            Some(value) => value,
            None => self.generate(ty)?,
        };
        if checked_types.insert(ty.type_id()) && second == first {
            return Err(Self::indistinguishable(ty, &first));
        }

        debug!("Property {} passed", name);
        Ok(PropertyOutcome::passed(name))
    }

    fn generate(&mut self, ty: &TypeDescriptor) -> PropertyTestResult<Value> {
        let value = self.factory.create_random_value(ty)?;
        if !ty.accepts(&value) {
            return Err(
                PropertyTestError::invalid_operation(
                    ty.name(),
                    format!("the value factory produced a {} instead", value.type_name())
                )
            );
        }
        Ok(value)
    }

    fn indistinguishable(ty: &TypeDescriptor, value: &Value) -> PropertyTestError {
        PropertyTestError::invalid_operation(
            ty.name(),
            format!("the value factory produced {:?} twice and cannot generate two different values", value)
        )
    }

    fn read(&self, name: &str) -> PropertyTestResult<Value> {
        self.subject
            .get_property(name)
            .map_err(|err| PropertyTestError::contract(name, ContractViolation::GetterFailed(err.to_string())))
    }

    fn setter_error(name: &str, ty: &TypeDescriptor, err: AccessError) -> PropertyTestError {
        match err {
            AccessError::TypeMismatch { found, .. } => {
                PropertyTestError::invalid_operation(ty.name(), format!("{} is not assignable to `{}`", found, name))
            }
            AccessError::Rejected { reason, .. } => {
                PropertyTestError::contract(name, ContractViolation::SetterRejected(reason))
            }
            other => PropertyTestError::contract(name, ContractViolation::SetterRejected(other.to_string())),
        }
    }
}

// The tester is itself a subject: its ignored set is a read-write property
impl Inspectable for PropertyTester<'_> {
    fn type_name(&self) -> &'static str {
        "PropertyTester"
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::new("ignored_properties", TypeDescriptor::of::<BTreeSet<String>>())
                .readable()
                .writable(),
            PropertyDescriptor::new("subject_type", TypeDescriptor::of::<String>()).readable(),
            PropertyDescriptor::new("completed_runs", TypeDescriptor::of::<usize>()).readable()
        ]
    }

    fn get_property(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "ignored_properties" => Ok(Value::new(self.ignored.as_set().clone())),
            "subject_type" => Ok(Value::new(self.subject.type_name().to_string())),
            "completed_runs" => Ok(Value::new(self.completed_runs)),
            _ => Err(AccessError::UnknownProperty(name.to_string())),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        match name {
            "ignored_properties" => {
                let names = value.downcast::<BTreeSet<String>>().map_err(|value| AccessError::TypeMismatch {
                    property: name.to_string(),
                    expected: TypeDescriptor::of::<BTreeSet<String>>().name().to_string(),
                    found: value.type_name().to_string(),
                })?;
                self.ignored.replace(names);
                Ok(())
            }
            "subject_type" | "completed_runs" => Err(AccessError::NotWritable(name.to_string())),
            _ => Err(AccessError::UnknownProperty(name.to_string())),
        }
    }
}

impl fmt::Debug for PropertyTester<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTester")
            .field("subject", &self.subject.type_name())
            .field("ignored", &self.ignored)
            .field("completed_runs", &self.completed_runs)
            .finish()
    }
}

use crate::errors::AccessError;
use crate::models::property::PropertyDescriptor;
use crate::models::value::{ PropertyType, TypeDescriptor, Value };
use crate::traits::notify::NotifyPropertyChanged;

/// The introspection surface a subject exposes to the property tester.
///
/// Implement it directly when properties have no backing storage (mocks,
/// proxies, interceptors). Plain data holders usually implement [`Reflect`]
/// instead and get this trait for free.
pub trait Inspectable {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Every declared instance property, including read-only and indexed ones
    fn properties(&self) -> Vec<PropertyDescriptor>;

    fn get_property(&self, name: &str) -> Result<Value, AccessError>;

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), AccessError>;

    /// The subject's change notifier, if it announces property changes at all
    fn change_notifier(&mut self) -> Option<&mut dyn NotifyPropertyChanged> {
        None
    }
}

/// Declarative introspection through a [`PropertyTable`]
pub trait Reflect: Sized + 'static {
    fn property_table() -> PropertyTable<Self>;

    fn notifier(&mut self) -> Option<&mut dyn NotifyPropertyChanged> {
        None
    }
}

impl<S: Reflect> Inspectable for S {
    fn properties(&self) -> Vec<PropertyDescriptor> {
        S::property_table().descriptors()
    }

    fn get_property(&self, name: &str) -> Result<Value, AccessError> {
        S::property_table().get(self, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        S::property_table().set(self, name, value)
    }

    fn change_notifier(&mut self) -> Option<&mut dyn NotifyPropertyChanged> {
        self.notifier()
    }
}

type Getter<S> = Box<dyn Fn(&S) -> Value>;
type Setter<S> = Box<dyn Fn(&mut S, Value) -> Result<(), AccessError>>;

struct TableEntry<S> {
    descriptor: PropertyDescriptor,
    getter: Option<Getter<S>>,
    setter: Option<Setter<S>>,
}

/// Typed accessors for every property of `S`, erased behind [`Value`]
pub struct PropertyTable<S> {
    entries: Vec<TableEntry<S>>,
}

impl<S: 'static> Default for PropertyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> PropertyTable<S> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn read_write<T, G, W>(self, name: &str, get: G, set: W) -> Self
        where T: PropertyType, G: Fn(&S) -> T + 'static, W: Fn(&mut S, T) + 'static
    {
        self.read_write_validated(name, get, move |subject: &mut S, value: T| {
            set(subject, value);
            Ok(())
        })
    }

    /// Like [`read_write`](Self::read_write), but the setter may refuse a value
    pub fn read_write_validated<T, G, W>(self, name: &str, get: G, set: W) -> Self
        where
            T: PropertyType,
            G: Fn(&S) -> T + 'static,
            W: Fn(&mut S, T) -> Result<(), String> + 'static
    {
        let descriptor = PropertyDescriptor::new(name, T::type_descriptor()).readable().writable();
        self.push(descriptor, Some(Self::erase_getter(get)), Some(Self::erase_setter(name, set)))
    }

    pub fn read_only<T, G>(self, name: &str, get: G) -> Self
        where T: PropertyType, G: Fn(&S) -> T + 'static
    {
        let descriptor = PropertyDescriptor::new(name, T::type_descriptor()).readable();
        self.push(descriptor, Some(Self::erase_getter(get)), None)
    }

    pub fn write_only<T, W>(self, name: &str, set: W) -> Self
        where T: PropertyType, W: Fn(&mut S, T) + 'static
    {
        let descriptor = PropertyDescriptor::new(name, T::type_descriptor()).writable();
        let set = move |subject: &mut S, value: T| {
            set(subject, value);
            Ok(())
        };
        self.push(descriptor, None, Some(Self::erase_setter(name, set)))
    }

    /// Declares a parameterised accessor; it is listed but never callable by name
    pub fn indexed<T: PropertyType>(self, name: &str) -> Self {
        let descriptor = PropertyDescriptor::new(name, T::type_descriptor())
            .readable()
            .writable()
            .indexed();
        self.push(descriptor, None, None)
    }

    pub fn descriptors(&self) -> Vec<PropertyDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn get(&self, subject: &S, name: &str) -> Result<Value, AccessError> {
        let entry = self.entry(name)?;
        match &entry.getter {
            Some(getter) => Ok(getter(subject)),
            None => Err(AccessError::NotReadable(name.to_string())),
        }
    }

    pub fn set(&self, subject: &mut S, name: &str, value: Value) -> Result<(), AccessError> {
        let entry = self.entry(name)?;
        let setter = entry.setter
            .as_ref()
            .ok_or_else(|| AccessError::NotWritable(name.to_string()))?;
        if !entry.descriptor.property_type.accepts(&value) {
            return Err(AccessError::TypeMismatch {
                property: name.to_string(),
                expected: entry.descriptor.property_type.name().to_string(),
                found: value.type_name().to_string(),
            });
        }
        setter(subject, value)
    }

    fn entry(&self, name: &str) -> Result<&TableEntry<S>, AccessError> {
        let entry = self.entries
            .iter()
            .find(|entry| entry.descriptor.name == name)
            .ok_or_else(|| AccessError::UnknownProperty(name.to_string()))?;
        if entry.descriptor.indexed {
            return Err(AccessError::Indexed(name.to_string()));
        }
        Ok(entry)
    }

    fn push(mut self, descriptor: PropertyDescriptor, getter: Option<Getter<S>>, setter: Option<Setter<S>>) -> Self {
        // a later declaration replaces an earlier one with the same name
        self.entries.retain(|entry| entry.descriptor.name != descriptor.name);
        self.entries.push(TableEntry { descriptor, getter, setter });
        self
    }

    fn erase_getter<T, G>(get: G) -> Getter<S> where T: PropertyType, G: Fn(&S) -> T + 'static {
        Box::new(move |subject: &S| Value::new(get(subject)))
    }

    fn erase_setter<T, W>(name: &str, set: W) -> Setter<S>
        where T: PropertyType, W: Fn(&mut S, T) -> Result<(), String> + 'static
    {
        let name = name.to_string();
        Box::new(move |subject: &mut S, value: Value| {
            let expected = TypeDescriptor::of::<T>();
            let value = value.downcast::<T>().map_err(|value| AccessError::TypeMismatch {
                property: name.clone(),
                expected: expected.name().to_string(),
                found: value.type_name().to_string(),
            })?;
            set(subject, value).map_err(|reason| AccessError::Rejected {
                property: name.clone(),
                reason,
            })
        })
    }
}

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use log::debug;
use rand::distributions::Alphanumeric;
use rand::{ Rng, SeedableRng };
use rand_chacha::ChaCha8Rng;

use crate::config::TesterConfig;
use crate::errors::{ PropertyTestError, PropertyTestResult };
use crate::models::value::{ Primitive, TypeDescriptor, TypeShape, Value };
use crate::traits::value_factory::ValueFactory;

const FLOAT_RANGE: f64 = 1.0e6;

/// General-purpose value factory.
///
/// Builds primitives, strings, optionals, enumerations and the standard
/// containers. Container elements, map entries and optional payloads are
/// generated through [`ValueFactory::create_random_value`] on this same
/// factory, so registered overrides apply at every depth:
///
/// ```rust
/// use propcheck::{ RandomValueFactory, TypeDescriptor, ValueFactory };
///
/// let mut factory = RandomValueFactory::with_seed(7);
/// let names = factory.create_random_value(&TypeDescriptor::of::<Vec<String>>()).unwrap();
/// assert!(names.downcast_ref::<Vec<String>>().is_some());
/// ```
///
/// Within a run, consecutive values for the same type differ whenever the type
/// has more than one inhabitant, so a well-formed factory always passes the
/// distinguishability check. [`ValueFactory::begin_run`] forgets the values
/// drawn so far.
pub struct RandomValueFactory {
    rng: ChaCha8Rng,
    max_collection_len: usize,
    max_string_len: usize,
    max_distinct_attempts: usize,
    overrides: Vec<Box<dyn ValueFactory>>,
    previous: HashMap<TypeId, Value>,
}

impl RandomValueFactory {
    pub fn new() -> Self {
        Self::from_config(&TesterConfig::default())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_config(&TesterConfig::default().with_seed(seed))
    }

    pub fn from_config(config: &TesterConfig) -> Self {
        let config = config.clone().normalized();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng,
            max_collection_len: config.max_collection_len,
            max_string_len: config.max_string_len,
            max_distinct_attempts: config.max_distinct_attempts,
            overrides: Vec::new(),
            previous: HashMap::new(),
        }
    }

    /// Registers a factory that is consulted before the built-in generators,
    /// for top-level properties and for nested element types alike
    pub fn with_override(mut self, factory: impl ValueFactory + 'static) -> Self {
        self.overrides.push(Box::new(factory));
        self
    }

    fn supports(&self, ty: &TypeDescriptor) -> bool {
        match ty.shape() {
            TypeShape::Primitive(_) => true,
            TypeShape::Optional { inner, .. } => self.can_create_instance(inner),
            TypeShape::Collection { element, .. } => self.can_create_instance(element),
            TypeShape::Map { key, value, .. } => self.can_create_instance(key) && self.can_create_instance(value),
            // a single variant can never yield two distinct values
            TypeShape::Enumeration { variants } => variants().len() >= 2,
            TypeShape::Opaque => false,
        }
    }

    fn generate(&mut self, ty: &TypeDescriptor) -> PropertyTestResult<Value> {
        let value = match ty.shape() {
            TypeShape::Primitive(primitive) => Some(self.primitive(*primitive)),
            TypeShape::Optional { inner, some } => {
                let inner = self.create_random_value(inner)?;
                some(inner)
            }
            TypeShape::Collection { element, collect, .. } => {
                let len = self.rng.gen_range(1..=self.max_collection_len);
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.create_random_value(element)?);
                }
                collect(items)
            }
            TypeShape::Map { key, value, collect } => {
                let len = self.rng.gen_range(1..=self.max_collection_len);
                let mut entries = Vec::with_capacity(len);
                for _ in 0..len {
                    let k = self.create_random_value(key)?;
                    let v = self.create_random_value(value)?;
                    entries.push((k, v));
                }
                collect(entries)
            }
            TypeShape::Enumeration { variants } => {
                let mut variants = variants();
                if variants.is_empty() {
                    None
                } else {
                    let index = self.rng.gen_range(0..variants.len());
                    Some(variants.swap_remove(index))
                }
            }
            TypeShape::Opaque => None,
        };

        value.ok_or_else(|| {
            PropertyTestError::invalid_operation(
                ty.name(),
                "generated parts could not be assembled into the requested type"
            )
        })
    }

    fn primitive(&mut self, primitive: Primitive) -> Value {
        let rng = &mut self.rng;
        match primitive {
            Primitive::Bool => Value::new(rng.gen::<bool>()),
            Primitive::Char => Value::new(char::from(rng.sample(Alphanumeric))),
            Primitive::I8 => Value::new(rng.gen::<i8>()),
            Primitive::I16 => Value::new(rng.gen::<i16>()),
            Primitive::I32 => Value::new(rng.gen::<i32>()),
            Primitive::I64 => Value::new(rng.gen::<i64>()),
            Primitive::I128 => Value::new(rng.gen::<i128>()),
            Primitive::Isize => Value::new(rng.gen::<isize>()),
            Primitive::U8 => Value::new(rng.gen::<u8>()),
            Primitive::U16 => Value::new(rng.gen::<u16>()),
            Primitive::U32 => Value::new(rng.gen::<u32>()),
            Primitive::U64 => Value::new(rng.gen::<u64>()),
            Primitive::U128 => Value::new(rng.gen::<u128>()),
            Primitive::Usize => Value::new(rng.gen::<usize>()),
            Primitive::F32 => Value::new(rng.gen_range(-(FLOAT_RANGE as f32)..(FLOAT_RANGE as f32))),
            Primitive::F64 => Value::new(rng.gen_range(-FLOAT_RANGE..FLOAT_RANGE)),
            Primitive::String => {
                let len = rng.gen_range(1..=self.max_string_len);
                let text: String = rng.sample_iter(&Alphanumeric).take(len).map(char::from).collect();
                Value::new(text)
            }
        }
    }
}

impl Default for RandomValueFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueFactory for RandomValueFactory {
    fn can_create_instance(&self, ty: &TypeDescriptor) -> bool {
        self.overrides.iter().any(|factory| factory.can_create_instance(ty)) || self.supports(ty)
    }

    fn create_random_value(&mut self, ty: &TypeDescriptor) -> PropertyTestResult<Value> {
        if let Some(factory) = self.overrides.iter_mut().find(|factory| factory.can_create_instance(ty)) {
            return factory.create_random_value(ty);
        }
        if !self.supports(ty) {
            return Err(PropertyTestError::invalid_operation(ty.name(), "not supported by the default value factory"));
        }

        let mut value = self.generate(ty)?;
        let mut attempts = 1;
        while attempts < self.max_distinct_attempts && self.previous.get(&ty.type_id()) == Some(&value) {
            value = self.generate(ty)?;
            attempts += 1;
        }
        if attempts > 1 {
            debug!("Redrew {} value {} times to avoid a repeat", ty.name(), attempts - 1);
        }

        self.previous.insert(ty.type_id(), value.clone());
        Ok(value)
    }

    fn begin_run(&mut self) {
        self.previous.clear();
        for factory in &mut self.overrides {
            factory.begin_run();
        }
    }
}

impl fmt::Debug for RandomValueFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomValueFactory")
            .field("max_collection_len", &self.max_collection_len)
            .field("max_string_len", &self.max_string_len)
            .field("max_distinct_attempts", &self.max_distinct_attempts)
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

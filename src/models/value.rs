use std::any::{ Any, TypeId };
use std::collections::{ BTreeMap, BTreeSet, HashMap, HashSet, VecDeque };
use std::fmt;
use std::hash::Hash;

/// Object-safe view of a property value
trait DynValue: Any {
    fn clone_box(&self) -> Box<dyn DynValue>;
    fn eq_dyn(&self, other: &dyn DynValue) -> bool;
    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn as_any(&self) -> &dyn Any;
}

impl<T: PropertyType> DynValue for T {
    fn clone_box(&self) -> Box<dyn DynValue> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn DynValue) -> bool {
        other.as_any().downcast_ref::<T>().map_or(false, |other| self == other)
    }

    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A type-erased property value.
///
/// Equality follows the wrapped type's own `PartialEq`, so a type whose
/// equality is degenerate stays degenerate after erasure.
pub struct Value {
    inner: Box<dyn DynValue>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: PropertyType>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.inner.as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: PropertyType>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    pub fn downcast_ref<T: PropertyType>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Unwraps the value, handing it back unchanged when the type does not match
    pub fn downcast<T: PropertyType>(self) -> Result<T, Value> {
        if let Some(value) = self.downcast_ref::<T>() {
            return Ok(value.clone());
        }
        Err(self)
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
            type_name: self.type_name,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.debug_fmt(f)
    }
}

/// A type that can appear as a property value
pub trait PropertyType: Any + Clone + fmt::Debug + PartialEq {
    /// Describes the closed type so a value factory can decide how to build one
    fn type_descriptor() -> TypeDescriptor;
}

/// Scalar types the default factory builds directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
}

/// Kinds of single-element containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Vec,
    VecDeque,
    BTreeSet,
    HashSet,
}

/// Structural description of a type, with the constructors a factory needs
/// to assemble values of it from generated parts
#[derive(Clone)]
pub enum TypeShape {
    Primitive(Primitive),
    Optional {
        inner: Box<TypeDescriptor>,
        some: fn(Value) -> Option<Value>,
    },
    Collection {
        kind: CollectionKind,
        element: Box<TypeDescriptor>,
        collect: fn(Vec<Value>) -> Option<Value>,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
        collect: fn(Vec<(Value, Value)>) -> Option<Value>,
    },
    Enumeration {
        variants: fn() -> Vec<Value>,
    },
    /// Nothing is known about the structure; only a custom factory can build it
    Opaque,
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Primitive(p) => write!(f, "Primitive({:?})", p),
            TypeShape::Optional { inner, .. } => write!(f, "Optional({})", inner.name()),
            TypeShape::Collection { kind, element, .. } => {
                write!(f, "Collection({:?}, {})", kind, element.name())
            }
            TypeShape::Map { key, value, .. } => write!(f, "Map({}, {})", key.name(), value.name()),
            TypeShape::Enumeration { .. } => write!(f, "Enumeration"),
            TypeShape::Opaque => write!(f, "Opaque"),
        }
    }
}

/// Closed (fully substituted) description of a property's declared type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    name: &'static str,
    shape: TypeShape,
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl TypeDescriptor {
    pub fn of<T: PropertyType>() -> Self {
        T::type_descriptor()
    }

    pub fn new<T: PropertyType>(shape: TypeShape) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape,
        }
    }

    pub fn primitive<T: PropertyType>(primitive: Primitive) -> Self {
        Self::new::<T>(TypeShape::Primitive(primitive))
    }

    pub fn opaque<T: PropertyType>() -> Self {
        Self::new::<T>(TypeShape::Opaque)
    }

    /// Describes a fieldless enum by listing its variants
    pub fn enumeration<T: PropertyType>(variants: fn() -> Vec<Value>) -> Self {
        Self::new::<T>(TypeShape::Enumeration { variants })
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn is<T: PropertyType>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Whether `value` can be assigned to a property of this type
    pub fn accepts(&self, value: &Value) -> bool {
        self.type_id == value.type_id()
    }
}

macro_rules! primitive_property_types {
    ($($ty:ty => $primitive:ident),* $(,)?) => {
        $(
            impl PropertyType for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::primitive::<$ty>(Primitive::$primitive)
                }
            }
        )*
    };
}

primitive_property_types! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl<T: PropertyType> PropertyType for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Option<T>>(TypeShape::Optional {
            inner: Box::new(T::type_descriptor()),
            some: |value| value.downcast::<T>().ok().map(|inner| Value::new(Some(inner))),
        })
    }
}

fn downcast_all<T: PropertyType>(values: Vec<Value>) -> Option<Vec<T>> {
    values.into_iter().map(|value| value.downcast::<T>().ok()).collect()
}

fn downcast_pairs<K: PropertyType, V: PropertyType>(pairs: Vec<(Value, Value)>) -> Option<Vec<(K, V)>> {
    pairs
        .into_iter()
        .map(|(key, value)| Some((key.downcast::<K>().ok()?, value.downcast::<V>().ok()?)))
        .collect()
}

impl<T: PropertyType> PropertyType for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Vec<T>>(TypeShape::Collection {
            kind: CollectionKind::Vec,
            element: Box::new(T::type_descriptor()),
            collect: |values| downcast_all::<T>(values).map(Value::new),
        })
    }
}

impl<T: PropertyType> PropertyType for VecDeque<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<VecDeque<T>>(TypeShape::Collection {
            kind: CollectionKind::VecDeque,
            element: Box::new(T::type_descriptor()),
            collect: |values| downcast_all::<T>(values).map(|items| Value::new(VecDeque::from(items))),
        })
    }
}

impl<T: PropertyType + Ord> PropertyType for BTreeSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<BTreeSet<T>>(TypeShape::Collection {
            kind: CollectionKind::BTreeSet,
            element: Box::new(T::type_descriptor()),
            collect: |values| {
                downcast_all::<T>(values).map(|items| Value::new(items.into_iter().collect::<BTreeSet<T>>()))
            },
        })
    }
}

impl<T: PropertyType + Eq + Hash> PropertyType for HashSet<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<HashSet<T>>(TypeShape::Collection {
            kind: CollectionKind::HashSet,
            element: Box::new(T::type_descriptor()),
            collect: |values| {
                downcast_all::<T>(values).map(|items| Value::new(items.into_iter().collect::<HashSet<T>>()))
            },
        })
    }
}

impl<K: PropertyType + Ord, V: PropertyType> PropertyType for BTreeMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<BTreeMap<K, V>>(TypeShape::Map {
            key: Box::new(K::type_descriptor()),
            value: Box::new(V::type_descriptor()),
            collect: |pairs| {
                downcast_pairs::<K, V>(pairs).map(|items| Value::new(items.into_iter().collect::<BTreeMap<K, V>>()))
            },
        })
    }
}

impl<K: PropertyType + Eq + Hash, V: PropertyType> PropertyType for HashMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<HashMap<K, V>>(TypeShape::Map {
            key: Box::new(K::type_descriptor()),
            value: Box::new(V::type_descriptor()),
            collect: |pairs| {
                downcast_pairs::<K, V>(pairs).map(|items| Value::new(items.into_iter().collect::<HashMap<K, V>>()))
            },
        })
    }
}

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::{ PropertyTestError, PropertyTestResult };
use crate::models::value::TypeDescriptor;

/// Metadata for one property discovered on a subject
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: TypeDescriptor,
    pub readable: bool,
    pub writable: bool,
    /// Indexed properties need arguments and are never exercised
    pub indexed: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, property_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            property_type,
            readable: false,
            writable: false,
            indexed: false,
        }
    }

    pub fn readable(mut self) -> Self {
        self.readable = true;
        self
    }

    pub fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// Names of the properties a test author has excluded from verification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredProperties {
    names: BTreeSet<String>,
}

impl IgnoredProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the name was already ignored
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn replace(&mut self, names: BTreeSet<String>) {
        self.names = names;
    }
}

impl<S: Into<String>> Extend<S> for IgnoredProperties {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoredProperties {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ignored = Self::new();
        ignored.extend(iter);
        ignored
    }
}

/// The source text of a single property access, such as `subject.name` or
/// `subject.name()`.
///
/// Build one with the [`property!`](crate::property) macro so the access is
/// type-checked against the subject's type, or with [`PropertySelector::new`]
/// from plain text. Only a direct read of one property off a receiver is a
/// valid selector; anything else is rejected when the name is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySelector {
    expression: String,
}

impl PropertySelector {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Resolves the name of the property the expression reads
    pub fn property_name(&self) -> PropertyTestResult<String> {
        let compact: String = self.expression.chars().filter(|c| !c.is_whitespace()).collect();
        let access = compact.strip_suffix("()").unwrap_or(&compact);

        let segments: Vec<&str> = access.split('.').collect();
        let name = match segments.as_slice() {
            [name] => *name,
            [receiver, name] if is_identifier(receiver) => *name,
            _ => {
                return Err(self.not_simple_access());
            }
        };

        if !is_identifier(name) {
            return Err(self.not_simple_access());
        }
        Ok(name.trim_start_matches("r#").to_string())
    }

    fn not_simple_access(&self) -> PropertyTestError {
        PropertyTestError::invalid_argument(
            "selector",
            format!("`{}` is not a simple property access", self.expression)
        )
    }
}

impl fmt::Display for PropertySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

fn is_identifier(text: &str) -> bool {
    let text = text.strip_prefix("r#").unwrap_or(text);
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => {
            return false;
        }
    }
    text != "_" && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Builds a [`PropertySelector`] from a property access on a subject type.
///
/// The access is compiled against the named type, so renaming the property
/// breaks the build instead of silently un-ignoring it:
///
/// ```rust
/// use propcheck::{ property, PropertySelector };
///
/// struct Person {
///     name: String,
/// }
///
/// let selector: PropertySelector = property!(Person => name);
/// assert_eq!(selector.property_name().unwrap(), "name");
/// ```
#[macro_export]
macro_rules! property {
    ($subject:ty => $($access:tt)+) => {
        {
            let _ = |subject: &$subject| {
                let _ = &subject.$($access)+;
            };
            $crate::models::property::PropertySelector::new(stringify!(subject.$($access)+))
        }
    };
}

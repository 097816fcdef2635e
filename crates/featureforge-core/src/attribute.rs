//! Typed attribute bags for features and constraints.
//!
//! An [`Attribute`] is a small descriptor: namespace, name, value type, an
//! optional default function and an optional validator. Values live in a
//! per-element [`Attributes`] map keyed by the descriptor's
//! `(namespace, name)` pair. [`AttributeRegistry`] resolves keys back to
//! descriptors, e.g. when reading persisted properties.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{FeatureModelError, Result};

/// Namespace of the built-in attributes.
pub const NAMESPACE: &str = "featureforge";

/// Element name. Must be non-empty.
pub const NAME: Attribute = Attribute::new(NAMESPACE, "name", ValueType::String)
    .with_validator(validate_name);

/// Free-form description.
pub const DESCRIPTION: Attribute = Attribute::new(NAMESPACE, "description", ValueType::String);

/// Abstract features carry no implementation. Defaults to `false`.
pub const ABSTRACT: Attribute =
    Attribute::new(NAMESPACE, "abstract", ValueType::Bool).with_default(default_false);

/// Hidden features are left out of user-facing partition views. Defaults to `false`.
pub const HIDDEN: Attribute =
    Attribute::new(NAMESPACE, "hidden", ValueType::Bool).with_default(default_false);

fn validate_name(value: &AttributeValue) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

fn default_false(_: &Attributes) -> AttributeValue {
    AttributeValue::Bool(false)
}

/// Type tag of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueType {
    Bool,
    Long,
    Double,
    String,
}

impl ValueType {
    /// Parses a value of this type from its persisted text form.
    pub fn parse(&self, text: &str) -> Option<AttributeValue> {
        match self {
            ValueType::Bool => text.parse().ok().map(AttributeValue::Bool),
            ValueType::Long => text.parse().ok().map(AttributeValue::Long),
            ValueType::Double => text.parse().ok().map(AttributeValue::Double),
            ValueType::String => Some(AttributeValue::String(text.to_string())),
        }
    }

    /// Returns the persisted type name (`bool`, `long`, `double`, `string`).
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::String => "string",
        }
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl AttributeValue {
    /// Returns the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::Bool(_) => ValueType::Bool,
            AttributeValue::Long(_) => ValueType::Long,
            AttributeValue::Double(_) => ValueType::Double,
            AttributeValue::String(_) => ValueType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            AttributeValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(v) => Some(*v),
            AttributeValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Long(v) => write!(f, "{v}"),
            AttributeValue::Double(v) => write!(f, "{v}"),
            AttributeValue::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Long(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Double(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

/// Key of an attribute inside an [`Attributes`] bag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeKey {
    pub namespace: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

impl AttributeKey {
    pub fn new(namespace: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Descriptor of an attribute.
///
/// # Example
///
/// ```
/// use featureforge_core::attribute::{Attribute, Attributes, ValueType};
///
/// fn zero(_: &Attributes) -> featureforge_core::attribute::AttributeValue {
///     0i64.into()
/// }
///
/// const COST: Attribute = Attribute::new("shop", "cost", ValueType::Long).with_default(zero);
///
/// let mut attrs = Attributes::new();
/// assert_eq!(attrs.get(&COST).and_then(|v| v.as_long()), Some(0));
/// attrs.set(&COST, 25i64.into()).unwrap();
/// assert_eq!(attrs.get(&COST).and_then(|v| v.as_long()), Some(25));
/// assert!(attrs.set(&COST, "cheap".into()).is_err());
/// ```
#[derive(Clone)]
pub struct Attribute {
    pub namespace: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub value_type: ValueType,
    default: Option<fn(&Attributes) -> AttributeValue>,
    validator: Option<fn(&AttributeValue) -> bool>,
}

impl Attribute {
    /// Creates a descriptor without default or validator.
    pub const fn new(namespace: &'static str, name: &'static str, value_type: ValueType) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
            value_type,
            default: None,
            validator: None,
        }
    }

    /// Creates a descriptor with runtime-owned names.
    pub fn dynamic(namespace: impl Into<String>, name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            namespace: Cow::Owned(namespace.into()),
            name: Cow::Owned(name.into()),
            value_type,
            default: None,
            validator: None,
        }
    }

    pub const fn with_default(mut self, default: fn(&Attributes) -> AttributeValue) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn with_validator(mut self, validator: fn(&AttributeValue) -> bool) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Returns the key this attribute is stored under.
    pub fn key(&self) -> AttributeKey {
        AttributeKey::new(self.namespace.clone(), self.name.clone())
    }

    /// Computes the default value for the given bag, if this attribute has one.
    pub fn default_value(&self, attributes: &Attributes) -> Option<AttributeValue> {
        self.default.map(|f| f(attributes))
    }

    /// Checks type and validator.
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        value.value_type() == self.value_type && self.validator.map_or(true, |v| v(value))
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("has_default", &self.default.is_some())
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// Ordered attribute bag of one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<AttributeKey, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, falling back to the attribute's default.
    pub fn get(&self, attribute: &Attribute) -> Option<AttributeValue> {
        self.values
            .get(&attribute.key())
            .cloned()
            .or_else(|| attribute.default_value(self))
    }

    /// Returns the stored value without consulting defaults.
    pub fn get_raw(&self, key: &AttributeKey) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.values.contains_key(&attribute.key())
    }

    /// Stores a value after checking it against the descriptor.
    ///
    /// Returns the previous explicit value.
    pub fn set(&mut self, attribute: &Attribute, value: AttributeValue) -> Result<Option<AttributeValue>> {
        if !attribute.accepts(&value) {
            return Err(FeatureModelError::InvalidAttribute(attribute.key().to_string()));
        }
        Ok(self.values.insert(attribute.key(), value))
    }

    pub fn remove(&mut self, attribute: &Attribute) -> Option<AttributeValue> {
        self.values.remove(&attribute.key())
    }

    /// Iterates explicit values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn get_string(&self, attribute: &Attribute) -> Option<String> {
        self.get(attribute).and_then(|v| v.as_str().map(str::to_string))
    }

    pub(crate) fn get_flag(&self, attribute: &Attribute) -> bool {
        self.get(attribute).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

/// Registry resolving `(namespace, name)` keys to attribute descriptors.
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    attributes: HashMap<AttributeKey, Attribute>,
}

impl AttributeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in attributes.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for attribute in [NAME, DESCRIPTION, ABSTRACT, HIDDEN] {
            registry.register(attribute);
        }
        registry
    }

    /// Registers a descriptor, replacing any previous one under the same key.
    pub fn register(&mut self, attribute: Attribute) -> Option<Attribute> {
        self.attributes.insert(attribute.key(), attribute)
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&Attribute> {
        self.attributes
            .get(&AttributeKey::new(namespace.to_string(), name.to_string()))
    }

    /// Returns the registered descriptor, registering a fresh one of the
    /// given type when the key is unknown.
    pub fn get_or_register(&mut self, namespace: &str, name: &str, value_type: ValueType) -> &Attribute {
        self.attributes
            .entry(AttributeKey::new(namespace.to_string(), name.to_string()))
            .or_insert_with(|| Attribute::dynamic(namespace, name, value_type))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset() {
        let attrs = Attributes::new();
        assert_eq!(attrs.get(&ABSTRACT), Some(AttributeValue::Bool(false)));
        assert_eq!(attrs.get(&DESCRIPTION), None);
        assert!(!attrs.contains(&HIDDEN));
    }

    #[test]
    fn test_set_validates_type() {
        let mut attrs = Attributes::new();
        assert!(attrs.set(&HIDDEN, AttributeValue::Long(1)).is_err());
        assert_eq!(attrs.set(&HIDDEN, true.into()), Ok(None));
        assert_eq!(attrs.set(&HIDDEN, false.into()), Ok(Some(AttributeValue::Bool(true))));
    }

    #[test]
    fn test_name_validator_rejects_empty() {
        let mut attrs = Attributes::new();
        assert_eq!(
            attrs.set(&NAME, "".into()),
            Err(FeatureModelError::InvalidAttribute("featureforge:name".to_string()))
        );
        assert!(attrs.set(&NAME, "Car".into()).is_ok());
    }

    #[test]
    fn test_registry_resolves_builtins() {
        let mut registry = AttributeRegistry::with_builtins();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.get(NAMESPACE, "hidden").map(|a| a.value_type),
            Some(ValueType::Bool)
        );

        let custom = registry.get_or_register("shop", "price", ValueType::Double);
        assert_eq!(custom.value_type, ValueType::Double);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_value_type_parse() {
        assert_eq!(ValueType::Long.parse("42"), Some(AttributeValue::Long(42)));
        assert_eq!(ValueType::Bool.parse("maybe"), None);
        assert_eq!(ValueType::Long.name(), "long");
    }
}

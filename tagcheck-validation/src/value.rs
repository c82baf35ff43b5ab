// Field values and record descriptors

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A field value read once from a record.
///
/// Rules match on this closed set of variants instead of inspecting
/// arbitrary types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`None`)
    Null,
    Bool(bool),
    /// Signed integer of any width
    Int(i64),
    /// Unsigned integer of any width
    Uint(u64),
    /// Floating point number of any width
    Float(f64),
    Str(String),
    /// Homogeneous sequence
    Seq(Vec<Value>),
    /// Key-value collection, in the iteration order of its source
    Map(Vec<(Value, Value)>),
    /// Nested record
    Record(Record),
}

/// The kind of a [`Value`], used in messages and fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Seq,
    Map,
    Record,
}

impl ValueKind {
    /// Get the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Seq => "sequence",
            ValueKind::Map => "map",
            ValueKind::Record => "struct",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Whether the value counts as missing for the `required` rule.
    ///
    /// Booleans and records are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Int(v) => *v == 0,
            Value::Uint(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Bool(_) | Value::Record(_) => false,
        }
    }

    /// Numeric view of integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Uint(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            // Debug keeps the fractional part: 5.0 renders as "5.0", not "5"
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Str(s) => f.write_str(s),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
            Value::Record(record) => write!(f, "{}", record),
        }
    }
}

/// One named field of a [`Record`] together with its directive metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    value: Value,
    directive: Option<String>,
    condition: Option<String>,
    error_message: Option<String>,
}

impl Field {
    /// Create a field without any directives
    pub fn new(name: impl Into<String>, value: impl ToValue) -> Self {
        Self {
            name: name.into(),
            value: value.to_value(),
            directive: None,
            condition: None,
            error_message: None,
        }
    }

    /// Set the directive string (`"required,min=3"`)
    pub fn validate(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    /// Set the conditional directive (`"IsActive=true,required"`)
    pub fn validate_if(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Replace the cause text of every failure reported for this field
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn message_override(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Runtime descriptor of a composite value: its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: String,
    fields: Vec<Field>,
}

impl Record {
    /// Create an empty record descriptor
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style)
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a field
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.type_name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", field.name, field.value)?;
        }
        f.write_str("}")
    }
}

/// Conversion of Rust values into [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Record {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_value {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self as $target)
                }
            }
        )+
    };
}

impl_to_value!(Int as i64: i8, i16, i32, i64, isize);
impl_to_value!(Uint as u64: u8, u16, u32, u64, usize);

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        // Widen through the shortest decimal form so 5.1f32 stays 5.1
        Value::Float(self.to_string().parse().unwrap_or(*self as f64))
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_display_keeps_kind() {
        assert_eq!(17i32.to_value().to_string(), "17");
        assert_eq!(5.0f64.to_value().to_string(), "5.0");
        assert_eq!(5.1f32.to_value().to_string(), "5.1");
        assert_eq!(3u8.to_value().to_string(), "3");
    }

    #[test]
    fn test_collection_display() {
        let names = vec!["John", "Do"];
        assert_eq!(names.to_value().to_string(), "[John Do]");

        let mut tags = BTreeMap::new();
        tags.insert("a", 1);
        tags.insert("b", 2);
        assert_eq!(tags.to_value().to_string(), "map[a:1 b:2]");

        let none: Option<i32> = None;
        assert_eq!(none.to_value().to_string(), "nil");
    }

    #[test]
    fn test_is_empty() {
        assert!(Value::Null.is_empty());
        assert!(0i32.to_value().is_empty());
        assert!(0.0f64.to_value().is_empty());
        assert!("".to_value().is_empty());
        assert!(Vec::<String>::new().to_value().is_empty());
        assert!(!false.to_value().is_empty());
        assert!(!"x".to_value().is_empty());
        assert!(!Record::new("Empty").to_value().is_empty());
    }

    #[test]
    fn test_record_lookup_and_display() {
        let record = Record::new("Address")
            .field(Field::new("City", "Jakarta").validate("required"))
            .field(Field::new("ZipCode", "12345"));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("City").and_then(|f| f.directive()), Some("required"));
        assert!(record.get("Street").is_none());
        assert_eq!(record.to_string(), "Address{City:Jakarta ZipCode:12345}");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Value::Int(1).kind(), ValueKind::Int);
        assert_eq!(ValueKind::Seq.to_string(), "sequence");
    }
}

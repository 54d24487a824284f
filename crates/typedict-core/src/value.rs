//! # Host Values
//!
//! [`Value`] is the closed set of values a typed dictionary can store.
//! Validators dispatch on its variants; nothing is ever coerced implicitly
//! (a `String` holding `"3.14"` is text, not a number).
//!
//! `Map` and `List` carry *untyped* nested data. Typed nesting lives in the
//! type registry, not in the value.

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;

use crate::object::{ObjectRef, ResourceHandle};

/// Insertion-ordered map of string keys to values.
pub type ValueMap = IndexMap<String, Value>;

/// A host value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A date/time object. Textual dates are `String`s and stay that way.
    Date(DateTime<FixedOffset>),
    Object(ObjectRef),
    Resource(ResourceHandle),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Class name that `instanceof` checks associate with `Date` values.
    pub const DATE_CLASS: &'static str = "DateTime";

    /// Short category name used in diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Object(_) => "object",
            Value::Resource(_) => "resource",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is a nested keyed structure.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of an `Int` or `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceHandle> {
        match self {
            Value::Resource(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The string form of a value, as seen by filters.
    ///
    /// Objects only have one when they implement [`HostObject::to_text`].
    /// Lists, maps and resources have none.
    ///
    /// [`HostObject::to_text`]: crate::object::HostObject::to_text
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(d.to_rfc3339()),
            Value::Object(o) => o.get().to_text(),
            Value::Resource(_) | Value::List(_) | Value::Map(_) => None,
        }
    }

    /// Boolean coercion.
    ///
    /// Strings are read as switch words (`"off"`, `"disabled"`, ...) and
    /// then as numbers; any other string is true. Objects use their
    /// boolean form, then their text form, and are otherwise true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => text_truthy(s),
            Value::Date(_) | Value::Resource(_) => true,
            Value::Object(o) => o
                .get()
                .to_bool()
                .or_else(|| o.get().to_text().map(|t| text_truthy(&t)))
                .unwrap_or(true),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }
}

/// Interpret a switch word such as `"yes"`, `"off"` or `"enabled"`.
///
/// Returns `None` for text that is not a recognised switch word.
pub fn parse_bool_word(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "positive" | "on" | "enabled" | "enable" | "1" => Some(true),
        "false" | "no" | "negative" | "off" | "disabled" | "disable" | "0" | "" => Some(false),
        _ => None,
    }
}

fn text_truthy(text: &str) -> bool {
    parse_bool_word(text)
        .or_else(|| text.trim().parse::<f64>().ok().map(|f| f != 0.0))
        .unwrap_or(true)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d.fixed_offset())
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<ResourceHandle> for Value {
    fn from(r: ResourceHandle) -> Self {
        Value::Resource(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// JSON literals map onto the plain variants: objects become `Map`,
/// arrays become `List`, integral numbers become `Int`.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}

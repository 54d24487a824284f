//! # Validators
//!
//! A [`Validator`] is a pure predicate over one candidate value and the
//! config of the spec that invoked it. Built-in kinds each have one; hosts
//! add their own through [`Validators`](crate::Validators).
//!
//! No validator converts its input: `"3.14"` is not a float, `"2017-01-01"`
//! is not a date, `1` is not a boolean.

use std::fmt;

use typedict_core::Value;

use crate::spec::{SpecConfig, OPT_INSTANCEOF, OPT_RESOURCE_TYPE};

/// Predicate capability invoked by a type spec.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Whether `value` satisfies the spec carrying `config`.
    fn validate(&self, value: &Value, config: &SpecConfig) -> bool;
}

/// Integral numbers only. Floats are accepted when they have no fractional part.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntValidator;

impl Validator for IntValidator {
    fn validate(&self, value: &Value, _config: &SpecConfig) -> bool {
        match value {
            Value::Int(_) => true,
            Value::Float(f) => {
                f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64
            }
            _ => false,
        }
    }
}

/// Any number, integral or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatValidator;

impl Validator for FloatValidator {
    fn validate(&self, value: &Value, _config: &SpecConfig) -> bool {
        matches!(value, Value::Int(_) | Value::Float(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

impl Validator for StringValidator {
    fn validate(&self, value: &Value, _config: &SpecConfig) -> bool {
        matches!(value, Value::String(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolValidator;

impl Validator for BoolValidator {
    fn validate(&self, value: &Value, _config: &SpecConfig) -> bool {
        matches!(value, Value::Bool(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateValidator;

impl Validator for DateValidator {
    fn validate(&self, value: &Value, _config: &SpecConfig) -> bool {
        matches!(value, Value::Date(_))
    }
}

/// Untyped substructure: everything passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayValidator;

impl Validator for ArrayValidator {
    fn validate(&self, _value: &Value, _config: &SpecConfig) -> bool {
        true
    }
}

/// Host objects satisfying the `instanceof` option.
///
/// `Date` values count as instances of [`Value::DATE_CLASS`]. Plain maps
/// are never objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectValidator;

impl Validator for ObjectValidator {
    fn validate(&self, value: &Value, config: &SpecConfig) -> bool {
        let Some(class) = config.get(OPT_INSTANCEOF).and_then(|c| c.as_str()) else {
            return false;
        };
        match value {
            Value::Object(object) => object.instance_of(class),
            Value::Date(_) => class == Value::DATE_CLASS,
            _ => false,
        }
    }
}

/// Resource handles, restricted to one resource type when configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceValidator;

impl Validator for ResourceValidator {
    fn validate(&self, value: &Value, config: &SpecConfig) -> bool {
        let Value::Resource(handle) = value else {
            return false;
        };
        match config.get(OPT_RESOURCE_TYPE).and_then(|t| t.as_str()) {
            Some(kind) => handle.kind() == kind,
            None => true,
        }
    }
}

/// The unconstrained leaf: accepts every value, null included.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValidator;

impl Validator for AnyValidator {
    fn validate(&self, _value: &Value, _config: &SpecConfig) -> bool {
        true
    }
}

/// Adapts a closure into a [`Validator`].
pub struct FnValidator<F> {
    name: String,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value, &SpecConfig) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").field("name", &self.name).finish()
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value, &SpecConfig) -> bool + Send + Sync,
{
    fn validate(&self, value: &Value, config: &SpecConfig) -> bool {
        (self.check)(value, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use typedict_core::{HostObject, ObjectRef, ResourceHandle, ValueMap};

    #[derive(Debug)]
    struct Custom;

    impl HostObject for Custom {
        fn class_name(&self) -> &str {
            "CustomObject"
        }
    }

    fn cfg(pairs: &[(&str, &str)]) -> SpecConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect()
    }

    fn date() -> Value {
        Value::from(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_int_rejects_text_bool_and_fractions() {
        let none = SpecConfig::new();
        assert!(IntValidator.validate(&Value::Int(3), &none));
        assert!(IntValidator.validate(&Value::Float(3.0), &none));
        assert!(!IntValidator.validate(&Value::Float(4.5), &none));
        assert!(!IntValidator.validate(&Value::from("15"), &none));
        assert!(!IntValidator.validate(&Value::Bool(false), &none));
        assert!(!IntValidator.validate(&Value::Null, &none));
        assert!(!IntValidator.validate(&Value::Float(f64::NAN), &none));
    }

    #[test]
    fn test_float_accepts_integers() {
        let none = SpecConfig::new();
        assert!(FloatValidator.validate(&Value::Int(3), &none));
        assert!(FloatValidator.validate(&Value::Float(2.75), &none));
        assert!(!FloatValidator.validate(&Value::from("3.14"), &none));
        assert!(!FloatValidator.validate(&Value::Bool(true), &none));
    }

    #[test]
    fn test_string_and_bool_are_strict() {
        let none = SpecConfig::new();
        assert!(StringValidator.validate(&Value::from("str"), &none));
        assert!(!StringValidator.validate(&Value::Int(3), &none));
        assert!(!StringValidator.validate(&Value::Null, &none));
        assert!(BoolValidator.validate(&Value::Bool(false), &none));
        assert!(!BoolValidator.validate(&Value::Int(0), &none));
        assert!(!BoolValidator.validate(&Value::from("true"), &none));
    }

    #[test]
    fn test_date_rejects_textual_dates() {
        let none = SpecConfig::new();
        assert!(DateValidator.validate(&date(), &none));
        assert!(!DateValidator.validate(&Value::from("2017-01-01"), &none));
    }

    #[test]
    fn test_object_instanceof() {
        let config = cfg(&[(OPT_INSTANCEOF, "CustomObject")]);
        assert!(ObjectValidator.validate(&Value::from(ObjectRef::new(Custom)), &config));
        assert!(!ObjectValidator.validate(&date(), &config));
        assert!(!ObjectValidator.validate(&Value::Map(ValueMap::new()), &config));
        let custom = Value::from(ObjectRef::new(Custom));
        assert!(!ObjectValidator.validate(&custom, &SpecConfig::new()));

        let dates = cfg(&[(OPT_INSTANCEOF, Value::DATE_CLASS)]);
        assert!(ObjectValidator.validate(&date(), &dates));
        assert!(!ObjectValidator.validate(&Value::from("loremipsum"), &dates));
    }

    #[test]
    fn test_resource_type() {
        let stream = Value::from(ResourceHandle::new("stream", ()));
        let socket = Value::from(ResourceHandle::new("socket", ()));
        let config = cfg(&[(OPT_RESOURCE_TYPE, "stream")]);
        assert!(ResourceValidator.validate(&stream, &config));
        assert!(!ResourceValidator.validate(&socket, &config));
        assert!(ResourceValidator.validate(&socket, &SpecConfig::new()));
        assert!(!ResourceValidator.validate(&Value::Null, &SpecConfig::new()));
    }

    #[test]
    fn test_any_and_array_accept_null() {
        let none = SpecConfig::new();
        assert!(AnyValidator.validate(&Value::Null, &none));
        assert!(ArrayValidator.validate(&Value::Null, &none));
    }

    #[test]
    fn test_fn_validator() {
        let even = FnValidator::new("even", |v: &Value, _: &SpecConfig| {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        });
        assert!(even.validate(&Value::Int(4), &SpecConfig::new()));
        assert!(!even.validate(&Value::Int(3), &SpecConfig::new()));
        assert!(format!("{even:?}").contains("even"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every integer is a valid float.
        #[test]
        fn float_accepts_every_integer(n in any::<i64>()) {
            prop_assert!(FloatValidator.validate(&Value::Int(n), &SpecConfig::new()));
        }

        /// Every finite float is a valid float, and its text form is not.
        #[test]
        fn float_rejects_numeric_text(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
            prop_assert!(FloatValidator.validate(&Value::Float(f), &SpecConfig::new()));
            prop_assert!(!FloatValidator.validate(&Value::from(f.to_string()), &SpecConfig::new()));
        }

        /// Fractional floats are never integers.
        #[test]
        fn int_rejects_fractions(f in any::<f64>().prop_filter("fractional", |f| {
            f.is_finite() && f.fract() != 0.0
        })) {
            prop_assert!(!IntValidator.validate(&Value::Float(f), &SpecConfig::new()));
        }
    }
}

//! # Validator Registry
//!
//! [`Validators`] holds the host-supplied custom kinds and filters. Built-in
//! kinds and filters are always available and cannot be shadowed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use typedict_core::DictError;

use crate::filter::{builtin_filter, Filter};
use crate::kind::TypeKind;
use crate::spec::{SpecConfig, TypeSpec};
use crate::validator::Validator;

/// Custom kinds and filters available when building type specs.
#[derive(Clone, Default)]
pub struct Validators {
    kinds: HashMap<String, Arc<dyn Validator>>,
    filters: HashMap<String, Arc<dyn Filter>>,
}

impl Validators {
    /// A registry with only the built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom kind. Registering a name again replaces the
    /// earlier validator.
    ///
    /// # Errors
    ///
    /// `InvalidSpec` if `name` is a built-in kind.
    pub fn register_kind(
        &mut self,
        name: impl Into<String>,
        validator: impl Validator + 'static,
    ) -> Result<&mut Self, DictError> {
        let name = name.into();
        if TypeKind::builtin(&name).is_some() {
            return Err(DictError::InvalidSpec {
                kind: name,
                reason: "a built-in kind cannot be redefined".to_string(),
            });
        }
        tracing::debug!(kind = %name, "registered custom kind");
        self.kinds.insert(name, Arc::new(validator));
        Ok(self)
    }

    /// Register a named filter for `filter` specs. Registering a name again
    /// replaces the earlier filter.
    ///
    /// # Errors
    ///
    /// `InvalidSpec` if `name` is a built-in filter.
    pub fn register_filter(
        &mut self,
        name: impl Into<String>,
        filter: impl Filter + 'static,
    ) -> Result<&mut Self, DictError> {
        let name = name.into();
        if builtin_filter(&name).is_some() {
            return Err(DictError::InvalidSpec {
                kind: TypeKind::Filter.to_string(),
                reason: format!("built-in filter '{name}' cannot be redefined"),
            });
        }
        tracing::debug!(filter = %name, "registered custom filter");
        self.filters.insert(name, Arc::new(filter));
        Ok(self)
    }

    /// Whether `name` is a built-in or registered kind.
    pub fn has_kind(&self, name: &str) -> bool {
        TypeKind::builtin(name).is_some() || self.kinds.contains_key(name)
    }

    /// Build a spec from a kind name and options.
    ///
    /// # Errors
    ///
    /// `UnknownType` if `kind` is neither built-in nor registered;
    /// `InvalidSpec` if the options do not suit the kind.
    pub fn spec(&self, kind: &str, config: SpecConfig) -> Result<TypeSpec, DictError> {
        self.build(TypeKind::from(kind), config)
    }

    pub(crate) fn custom_kind(&self, name: &str) -> Option<Arc<dyn Validator>> {
        self.kinds.get(name).cloned()
    }

    pub(crate) fn named_filter(&self, name: &str) -> Option<Arc<dyn Filter>> {
        builtin_filter(name).or_else(|| self.filters.get(name).cloned())
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        kinds.sort();
        let mut filters: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        filters.sort();
        f.debug_struct("Validators")
            .field("kinds", &kinds)
            .field("filters", &filters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FnFilter;
    use crate::spec::OPT_FILTER;
    use crate::validator::FnValidator;
    use typedict_core::Value;

    fn money() -> FnValidator<impl Fn(&Value, &SpecConfig) -> bool + Send + Sync> {
        FnValidator::new("money", |v: &Value, _: &SpecConfig| {
            v.as_str().is_some_and(|s| s.starts_with('$'))
        })
    }

    #[test]
    fn test_custom_kind() {
        let mut validators = Validators::new();
        assert!(!validators.has_kind("money"));
        validators.register_kind("money", money()).unwrap();
        assert!(validators.has_kind("money"));

        let spec = validators.spec("money", SpecConfig::new()).unwrap();
        assert_eq!(spec.kind(), &TypeKind::Custom("money".to_string()));
        assert!(spec.validate(&Value::from("$5")));
        assert!(!spec.validate(&Value::from("5")));
    }

    #[test]
    fn test_unknown_kind() {
        let err = Validators::new().spec("bar", SpecConfig::new()).unwrap_err();
        assert_eq!(err, DictError::UnknownType("bar".to_string()));
    }

    #[test]
    fn test_builtin_kind_cannot_be_shadowed() {
        let mut validators = Validators::new();
        let err = validators.register_kind("int", money()).unwrap_err();
        assert_eq!(
            err,
            DictError::InvalidSpec {
                kind: "int".to_string(),
                reason: "a built-in kind cannot be redefined".to_string(),
            }
        );
        assert!(format!("{validators:?}").contains("kinds: []"));
        let spec = validators.spec("int", SpecConfig::new()).unwrap();
        assert!(spec.validate(&Value::Int(3)));
        assert!(!spec.validate(&Value::from("$3")));
    }

    #[test]
    fn test_builtin_filter_cannot_be_shadowed() {
        let mut validators = Validators::new();
        let err = validators
            .register_filter("email", FnFilter::new("email", |_: &str| true))
            .unwrap_err();
        assert!(matches!(err, DictError::InvalidSpec { ref kind, .. } if kind == "filter"));
        assert!(err.to_string().contains("'email'"));

        let mut config = SpecConfig::new();
        config.insert(OPT_FILTER.to_string(), "email".into());
        let spec = validators.spec("filter", config).unwrap();
        assert!(!spec.validate(&Value::from("not-an-address")));
    }

    #[test]
    fn test_registrations_chain() {
        let mut validators = Validators::new();
        validators
            .register_kind("money", money())
            .and_then(|v| v.register_kind("cents", money()))
            .unwrap();
        assert!(validators.has_kind("money"));
        assert!(validators.has_kind("cents"));
    }

    #[test]
    fn test_custom_filter() {
        let mut validators = Validators::new();
        validators
            .register_filter("postcode", FnFilter::new("postcode", |s: &str| {
                s.len() == 6 && s.is_char_boundary(4)
            }))
            .unwrap();
        let mut config = SpecConfig::new();
        config.insert(OPT_FILTER.to_string(), "postcode".into());
        let spec = validators.spec("filter", config.clone()).unwrap();
        assert!(spec.validate(&Value::from("1234AB")));
        assert!(!spec.validate(&Value::from("12345")));

        // Without the registration the filter name is unknown.
        assert!(Validators::new().spec("filter", config).is_err());
    }
}

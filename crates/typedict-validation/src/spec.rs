//! # Type Specs
//!
//! A [`TypeSpec`] is the immutable descriptor of what one leaf accepts: a
//! [`TypeKind`] plus a config map. Its validator is resolved when the spec
//! is built, so an unknown kind or a malformed config fails at declaration
//! time rather than on the first write.
//!
//! Two specs are equal when their kinds and configs are equal. The resolved
//! validator does not take part in equality.

use std::fmt;
use std::sync::Arc;

use typedict_core::{DictError, Value, ValueMap};

use crate::filter::{FilterCheck, FilterValidator};
use crate::kind::TypeKind;
use crate::registry::Validators;
use crate::validator::{
    AnyValidator, ArrayValidator, BoolValidator, DateValidator, FloatValidator, IntValidator,
    ObjectValidator, ResourceValidator, StringValidator, Validator,
};

/// Per-spec options, e.g. `instanceof` or `filter`.
pub type SpecConfig = serde_json::Map<String, serde_json::Value>;

/// Class an `object` leaf requires.
pub const OPT_INSTANCEOF: &str = "instanceof";
/// Filter name a `filter` leaf applies.
pub const OPT_FILTER: &str = "filter";
/// Pattern for the `regexp` filter.
pub const OPT_REGEXP: &str = "regexp";
/// Resource type a `resource` leaf requires.
pub const OPT_RESOURCE_TYPE: &str = "resource_type";

/// Immutable descriptor of one acceptable value shape.
#[derive(Clone)]
pub struct TypeSpec {
    kind: TypeKind,
    config: SpecConfig,
    validator: Arc<dyn Validator>,
}

impl TypeSpec {
    /// Build a spec of `kind` with no options.
    ///
    /// # Errors
    ///
    /// `UnknownType` for custom kinds (build those through
    /// [`Validators::spec`]); `InvalidSpec` for kinds that need options.
    pub fn new(kind: TypeKind) -> Result<Self, DictError> {
        Self::with_config(kind, SpecConfig::new())
    }

    /// Build a spec of a built-in `kind` with options.
    pub fn with_config(kind: TypeKind, config: SpecConfig) -> Result<Self, DictError> {
        Validators::new().build(kind, config)
    }

    pub fn int() -> Self {
        Self::plain(TypeKind::Int, Arc::new(IntValidator))
    }

    pub fn float() -> Self {
        Self::plain(TypeKind::Float, Arc::new(FloatValidator))
    }

    pub fn string() -> Self {
        Self::plain(TypeKind::String, Arc::new(StringValidator))
    }

    pub fn bool() -> Self {
        Self::plain(TypeKind::Bool, Arc::new(BoolValidator))
    }

    pub fn date() -> Self {
        Self::plain(TypeKind::Date, Arc::new(DateValidator))
    }

    /// Untyped substructure.
    pub fn array() -> Self {
        Self::plain(TypeKind::Array, Arc::new(ArrayValidator))
    }

    /// The unconstrained leaf.
    pub fn any() -> Self {
        Self::plain(TypeKind::Any, Arc::new(AnyValidator))
    }

    /// Host objects that are instances of `class`.
    pub fn object(class: impl Into<String>) -> Self {
        let mut config = SpecConfig::new();
        config.insert(OPT_INSTANCEOF.to_string(), class.into().into());
        Self::from_parts(TypeKind::Object, config, Arc::new(ObjectValidator))
    }

    /// Resource handles of one resource type.
    pub fn resource(resource_type: impl Into<String>) -> Self {
        let mut config = SpecConfig::new();
        config.insert(OPT_RESOURCE_TYPE.to_string(), resource_type.into().into());
        Self::from_parts(TypeKind::Resource, config, Arc::new(ResourceValidator))
    }

    /// Strings accepted by the built-in filter `name`.
    ///
    /// # Errors
    ///
    /// `InvalidSpec` if no built-in filter has that name.
    pub fn filter(name: &str) -> Result<Self, DictError> {
        let mut config = SpecConfig::new();
        config.insert(OPT_FILTER.to_string(), name.into());
        Self::with_config(TypeKind::Filter, config)
    }

    /// Strings matching the regular expression `pattern`.
    pub fn pattern(pattern: &str) -> Result<Self, DictError> {
        let mut config = SpecConfig::new();
        config.insert(OPT_FILTER.to_string(), OPT_REGEXP.into());
        config.insert(OPT_REGEXP.to_string(), pattern.into());
        Self::with_config(TypeKind::Filter, config)
    }

    fn plain(kind: TypeKind, validator: Arc<dyn Validator>) -> Self {
        Self::from_parts(kind, SpecConfig::new(), validator)
    }

    pub(crate) fn from_parts(
        kind: TypeKind,
        config: SpecConfig,
        validator: Arc<dyn Validator>,
    ) -> Self {
        Self {
            kind,
            config,
            validator,
        }
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn config(&self) -> &SpecConfig {
        &self.config
    }

    /// A single config option.
    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.config.get(key)
    }

    /// Whether `value` is acceptable for a leaf of this spec.
    pub fn validate(&self, value: &Value) -> bool {
        self.validator.validate(value, &self.config)
    }

    /// What a leaf of this spec reads as before anything was written.
    pub fn zero_value(&self) -> Value {
        match self.kind {
            TypeKind::Int => Value::Int(0),
            TypeKind::Float => Value::Float(0.0),
            TypeKind::String => Value::String(String::new()),
            TypeKind::Bool => Value::Bool(false),
            TypeKind::Array => Value::Map(ValueMap::new()),
            _ => Value::Null,
        }
    }

    /// Descriptor form: the kind name, or an object with `$type` plus options.
    pub fn to_descriptor(&self) -> serde_json::Value {
        if self.config.is_empty() {
            return serde_json::Value::String(self.kind.name().to_string());
        }
        let mut out = serde_json::Map::new();
        out.insert(
            DESCRIPTOR_TYPE_KEY.to_string(),
            serde_json::Value::String(self.kind.name().to_string()),
        );
        for (key, value) in &self.config {
            out.insert(key.clone(), value.clone());
        }
        serde_json::Value::Object(out)
    }
}

/// Key marking a descriptor object as a leaf spec rather than a branch.
pub const DESCRIPTOR_TYPE_KEY: &str = "$type";

impl PartialEq for TypeSpec {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.config == other.config
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .finish()
    }
}

/// `float`, `object(instanceof=DateTime)`, `filter(filter=email)`.
impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if self.config.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (key, value)) in self.config.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                serde_json::Value::String(s) => write!(f, "{key}={s}")?,
                other => write!(f, "{key}={other}")?,
            }
        }
        f.write_str(")")
    }
}

impl Validators {
    /// Resolve `kind` and `config` into a spec.
    pub(crate) fn build(&self, kind: TypeKind, config: SpecConfig) -> Result<TypeSpec, DictError> {
        let validator: Arc<dyn Validator> = match &kind {
            TypeKind::Int => Arc::new(IntValidator),
            TypeKind::Float => Arc::new(FloatValidator),
            TypeKind::String => Arc::new(StringValidator),
            TypeKind::Bool => Arc::new(BoolValidator),
            TypeKind::Date => Arc::new(DateValidator),
            TypeKind::Array => Arc::new(ArrayValidator),
            TypeKind::Any => Arc::new(AnyValidator),
            TypeKind::Object => {
                match config.get(OPT_INSTANCEOF) {
                    Some(serde_json::Value::String(class)) if !class.is_empty() => {}
                    _ => {
                        return Err(invalid(&kind, "option 'instanceof' must name a class"));
                    }
                }
                Arc::new(ObjectValidator)
            }
            TypeKind::Resource => {
                match config.get(OPT_RESOURCE_TYPE) {
                    None | Some(serde_json::Value::String(_)) => {}
                    Some(_) => {
                        return Err(invalid(&kind, "option 'resource_type' must be a string"));
                    }
                }
                Arc::new(ResourceValidator)
            }
            TypeKind::Filter => {
                let check = self.filter_check(&config).map_err(|reason| invalid(&kind, &reason))?;
                Arc::new(FilterValidator::new(check))
            }
            TypeKind::Custom(name) => self
                .custom_kind(name)
                .ok_or_else(|| DictError::UnknownType(name.clone()))?,
        };
        Ok(TypeSpec::from_parts(kind, config, validator))
    }

    fn filter_check(&self, config: &SpecConfig) -> Result<FilterCheck, String> {
        let name = match config.get(OPT_FILTER) {
            Some(serde_json::Value::String(name)) => name.as_str(),
            Some(_) => return Err("option 'filter' must be a string".to_string()),
            None => return Err("option 'filter' is required".to_string()),
        };
        if name == OPT_REGEXP {
            let pattern = config
                .get(OPT_REGEXP)
                .and_then(|p| p.as_str())
                .ok_or_else(|| "option 'regexp' is required for the regexp filter".to_string())?;
            return FilterCheck::pattern(pattern).map_err(|e| format!("bad pattern: {e}"));
        }
        self.named_filter(name)
            .map(FilterCheck::Named)
            .ok_or_else(|| format!("unknown filter: {name}"))
    }
}

fn invalid(kind: &TypeKind, reason: &str) -> DictError {
    DictError::InvalidSpec {
        kind: kind.name().to_string(),
        reason: reason.to_string(),
    }
}

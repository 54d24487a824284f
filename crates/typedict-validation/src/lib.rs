//! # typedict-validation: Type Specs & Validators
//!
//! Decides whether a candidate value may be stored in a leaf.
//!
//! - [`TypeSpec`]: immutable kind + config, validator resolved at build time.
//! - [`Validator`]: the predicate capability, one per built-in kind.
//! - [`Filter`]: named string predicates used by `filter` specs.
//! - [`Validators`]: host registry for custom kinds and filters.
//!
//! ## Crate Policy
//!
//! - Validators are pure: no I/O, no interior state, no implicit parsing.
//! - Unknown kinds and malformed configs fail when the spec is built.

pub mod filter;
pub mod kind;
pub mod registry;
pub mod spec;
pub mod validator;

pub use filter::{builtin_filter, Filter, FilterCheck, FilterValidator, FnFilter};
pub use kind::TypeKind;
pub use registry::Validators;
pub use spec::{
    SpecConfig, TypeSpec, DESCRIPTOR_TYPE_KEY, OPT_FILTER, OPT_INSTANCEOF, OPT_REGEXP,
    OPT_RESOURCE_TYPE,
};
pub use validator::{
    AnyValidator, ArrayValidator, BoolValidator, DateValidator, FloatValidator, FnValidator,
    IntValidator, ObjectValidator, ResourceValidator, StringValidator, Validator,
};

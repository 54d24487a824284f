//! # typedict: Schema-Enforced Nested Dictionaries
//!
//! A [`TypedDictionary`] is a nested key-value container whose leaves are
//! declared ahead of time. Writes that do not conform to their leaf's
//! [`TypeSpec`] are rejected; reads of typed leaves only ever return
//! conforming values.
//!
//! ```
//! use typedict::{KeyPath, TypeRegistry, TypeSpec, TypedDictionary, Value};
//!
//! let types = TypeRegistry::from_declarations([
//!     (KeyPath::from(["l1", "float"]), TypeSpec::float()),
//!     (KeyPath::from(["l3", "email"]), TypeSpec::filter("email").unwrap()),
//! ])
//! .unwrap();
//! let dict = TypedDictionary::new(types);
//!
//! dict.set(["l1", "float"], 3).unwrap();
//! assert!(dict.set(["l1", "float"], "3.5").is_err());
//! assert!(dict.set(["l3", "email"], "info@example").is_err());
//!
//! // Branches read as views sharing the same storage.
//! let l1 = dict.get("l1").unwrap().into_dict().unwrap();
//! l1.set("float", 2.5).unwrap();
//! assert_eq!(dict.value(["l1", "float"]).unwrap(), Value::Float(2.5));
//! ```
//!
//! ## Crate Policy
//!
//! - Declarations are append-only; a conflicting re-declaration is an error.
//! - Writes are all-or-nothing per call.
//! - No implicit coercion: `"3.14"` is text, never a float.
//! - The library emits `tracing` events and installs no subscriber.

mod descriptor;
pub mod dictionary;
pub mod infer;
pub mod registry;

pub use dictionary::{Entry, TypedDictionary};
pub use infer::{infer, infer_spec};
pub use registry::{NodeRef, TypeBranch, TypeNode, TypeRegistry};

pub use typedict_core::{
    DictError, HostObject, KeyPath, ObjectRef, ResourceHandle, Value, ValueMap,
};
pub use typedict_validation::{
    Filter, FnFilter, FnValidator, SpecConfig, TypeKind, TypeSpec, Validator, Validators,
};

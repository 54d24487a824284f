//! # typedict-core: Foundational Types
//!
//! The leaf crate of the typedict workspace. It defines the data that flows
//! through the type registry and the dictionary façade, but none of the
//! validation rules themselves.
//!
//! ## Contents
//!
//! 1. **`Value`**: the closed set of host values a dictionary can hold:
//!    scalars, chrono date/times, opaque host objects, resource handles,
//!    and untyped nested lists/maps.
//!
//! 2. **`KeyPath`**: an owned sequence of string keys addressing a position
//!    in both the type tree and the value tree.
//!
//! 3. **`ValueTree`**: the insertion-ordered raw value store with
//!    path-addressed get/set/has/remove.
//!
//! 4. **`DictError`**: the single error enum shared by every crate in the
//!    workspace.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `typedict-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod object;
pub mod path;
pub mod render;
pub mod tree;
pub mod value;

pub use error::DictError;
pub use object::{HostObject, ObjectRef, ResourceHandle};
pub use path::KeyPath;
pub use render::{render, render_map};
pub use tree::ValueTree;
pub use value::{parse_bool_word, Value, ValueMap};

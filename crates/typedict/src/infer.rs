//! # Type Inference
//!
//! Builds registry nodes from sample data, one spec per leaf, keyed on the
//! sample's runtime category:
//!
//! | Sample | Inferred spec |
//! |---|---|
//! | `Int` / `Float` | `int` / `float` |
//! | `String`, `Bool`, `Date` | `string`, `bool`, `date` |
//! | `Object` | `object(instanceof = <class>)` |
//! | `Resource` | `resource(resource_type = <kind>)` |
//! | `List` | `array` |
//! | `Null` | `any` |
//! | `Map` | a branch, recursively |
//!
//! A null sample says nothing about the type the key will hold later, so
//! it yields the unconstrained leaf.

use typedict_core::{Value, ValueMap};
use typedict_validation::TypeSpec;

use crate::registry::{TypeBranch, TypeNode, TypeRegistry};

/// Spec for a single non-map sample value.
pub fn infer_spec(sample: &Value) -> TypeSpec {
    match sample {
        Value::Null => TypeSpec::any(),
        Value::Bool(_) => TypeSpec::bool(),
        Value::Int(_) => TypeSpec::int(),
        Value::Float(_) => TypeSpec::float(),
        Value::String(_) => TypeSpec::string(),
        Value::Date(_) => TypeSpec::date(),
        Value::Object(object) => TypeSpec::object(object.class_name()),
        Value::Resource(handle) => TypeSpec::resource(handle.kind()),
        Value::List(_) | Value::Map(_) => TypeSpec::array(),
    }
}

/// Node for a sample value: a branch for maps, a leaf otherwise.
pub fn infer(sample: &Value) -> TypeNode {
    match sample {
        Value::Map(map) => TypeNode::Branch(infer_branch(map)),
        other => TypeNode::Leaf(infer_spec(other)),
    }
}

fn infer_branch(sample: &ValueMap) -> TypeBranch {
    let mut branch = TypeBranch::new();
    for (key, value) in sample {
        branch.insert(key.clone(), infer(value));
    }
    branch
}

impl TypeRegistry {
    /// Registry whose shape and leaf types follow `sample`.
    pub fn infer(sample: &ValueMap) -> Self {
        let registry = Self::from_branch(infer_branch(sample));
        tracing::debug!(keys = registry.len(), "inferred type registry from sample");
        registry
    }
}

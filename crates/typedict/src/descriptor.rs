//! # Type Descriptors
//!
//! Loads a [`TypeRegistry`] from a declarative document and renders it back.
//!
//! ## Format
//!
//! - An object is a branch; each entry is a child.
//! - A string is a kind name: `"int"`, `"float"`, `"string"`, `"bool"`,
//!   `"date"`, `"array"`, `"object"`, `"filter"`, `"resource"`, `"any"`, or
//!   a custom kind registered on the [`Validators`] passed in.
//! - An object with a `"$type"` key is a leaf; its other keys are the
//!   spec's options.
//!
//! ```yaml
//! l1:
//!   float: float
//! l3:
//!   email: { $type: filter, filter: email }
//! ```
//!
//! JSON documents are taken as `serde_json::Value`. YAML text is converted
//! to the same tree first; YAML with no JSON form (non-scalar keys, NaN) is
//! rejected at the position where it occurs.

use serde_json::Value as Json;
use typedict_core::{DictError, KeyPath};
use typedict_validation::{SpecConfig, Validators, DESCRIPTOR_TYPE_KEY};

use crate::registry::{TypeBranch, TypeNode, TypeRegistry};

impl TypeRegistry {
    /// Build a registry from a JSON descriptor.
    ///
    /// # Errors
    ///
    /// - `UnknownType` for `null` entries (`Unknown type: NULL`), unknown
    ///   kind names and other scalars.
    /// - `InvalidSpec` for options a kind cannot work with.
    /// - `InvalidDescriptor` if the document is not an object or a `$type`
    ///   key is not a string.
    pub fn from_descriptor(document: &Json, validators: &Validators) -> Result<Self, DictError> {
        let Json::Object(entries) = document else {
            return Err(DictError::InvalidDescriptor {
                path: KeyPath::root(),
                reason: "the root of a type descriptor must be an object".to_string(),
            });
        };
        let root = branch_from_descriptor(entries, validators, &KeyPath::root())?;
        let registry = Self::from_branch(root);
        tracing::debug!(keys = registry.len(), "loaded type registry from descriptor");
        Ok(registry)
    }

    /// Build a registry from descriptor text in JSON.
    pub fn from_json_str(text: &str, validators: &Validators) -> Result<Self, DictError> {
        let document: Json = serde_json::from_str(text).map_err(|e| DictError::InvalidDescriptor {
            path: KeyPath::root(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::from_descriptor(&document, validators)
    }

    /// Build a registry from descriptor text in YAML.
    pub fn from_yaml_str(text: &str, validators: &Validators) -> Result<Self, DictError> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| DictError::InvalidDescriptor {
                path: KeyPath::root(),
                reason: format!("invalid YAML: {e}"),
            })?;
        let document = yaml_to_json(&yaml, &KeyPath::root())?;
        Self::from_descriptor(&document, validators)
    }

    /// Render the registry in descriptor form.
    pub fn to_descriptor(&self) -> Json {
        branch_to_descriptor(self.root())
    }
}

fn branch_from_descriptor(
    entries: &serde_json::Map<String, Json>,
    validators: &Validators,
    path: &KeyPath,
) -> Result<TypeBranch, DictError> {
    let mut branch = TypeBranch::new();
    for (key, entry) in entries {
        let child = path.child(key.as_str());
        let node = node_from_descriptor(entry, validators, &child)?;
        branch.insert(key.clone(), node);
    }
    Ok(branch)
}

fn node_from_descriptor(
    entry: &Json,
    validators: &Validators,
    path: &KeyPath,
) -> Result<TypeNode, DictError> {
    match entry {
        Json::Object(map) => match map.get(DESCRIPTOR_TYPE_KEY) {
            Some(Json::String(kind)) => {
                let config: SpecConfig = map
                    .iter()
                    .filter(|(key, _)| key.as_str() != DESCRIPTOR_TYPE_KEY)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                validators.spec(kind, config).map(TypeNode::Leaf)
            }
            Some(_) => Err(DictError::InvalidDescriptor {
                path: path.clone(),
                reason: format!("'{DESCRIPTOR_TYPE_KEY}' must be a kind name"),
            }),
            None => branch_from_descriptor(map, validators, path).map(TypeNode::Branch),
        },
        Json::String(kind) => validators.spec(kind, SpecConfig::new()).map(TypeNode::Leaf),
        Json::Null => Err(DictError::UnknownType("NULL".to_string())),
        other => Err(DictError::UnknownType(other.to_string())),
    }
}

fn branch_to_descriptor(branch: &TypeBranch) -> Json {
    let map = branch
        .iter()
        .map(|(key, node)| {
            let value = match node {
                TypeNode::Leaf(spec) => spec.to_descriptor(),
                TypeNode::Branch(child) => branch_to_descriptor(child),
            };
            (key.to_string(), value)
        })
        .collect();
    Json::Object(map)
}

/// The JSON form of a YAML descriptor node at `path`.
///
/// Scalar map keys become strings and tags are dropped. Anything without a
/// JSON form is reported at the position where it occurs.
fn yaml_to_json(yaml: &serde_yaml::Value, path: &KeyPath) -> Result<Json, DictError> {
    use serde_yaml::Value as Yaml;

    let invalid = |reason: String| DictError::InvalidDescriptor {
        path: path.clone(),
        reason,
    };
    match yaml {
        Yaml::Null => Ok(Json::Null),
        Yaml::Bool(b) => Ok(Json::Bool(*b)),
        Yaml::Number(n) => n
            .as_i64()
            .map(Json::from)
            .or_else(|| n.as_u64().map(Json::from))
            .or_else(|| n.as_f64().and_then(serde_json::Number::from_f64).map(Json::Number))
            .ok_or_else(|| invalid(format!("number {n} has no JSON form"))),
        Yaml::String(text) => Ok(Json::String(text.clone())),
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| yaml_to_json(item, &path.child(i.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        Yaml::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, entry) in entries {
                let key = match key {
                    Yaml::String(text) => text.clone(),
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    _ => return Err(invalid("map keys must be scalars".to_string())),
                };
                let value = yaml_to_json(entry, &path.child(key.as_str()))?;
                object.insert(key, value);
            }
            Ok(Json::Object(object))
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value, path),
    }
}

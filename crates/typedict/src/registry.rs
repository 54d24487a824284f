//! # Type Registry
//!
//! A tree mirroring the shape of the data. Every node is either a
//! [`TypeNode::Leaf`] holding exactly one [`TypeSpec`], or a
//! [`TypeNode::Branch`] holding named children and no spec of its own.
//!
//! ## Invariants
//!
//! - Declarations are append-only. Re-declaring a leaf with an equal spec
//!   is a no-op; with a different spec it is a `DuplicateKey` error.
//! - A path can never branch through a leaf. The one exception is reading
//!   and writing *below* an `array` leaf, whose nested data is untyped.
//! - A failed declaration leaves the registry unchanged.

use std::fmt;

use indexmap::IndexMap;
use typedict_core::{render, DictError, KeyPath, Value, ValueMap};
use typedict_validation::{TypeKind, TypeSpec};

/// One node of the registry tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Leaf(TypeSpec),
    Branch(TypeBranch),
}

impl TypeNode {
    pub fn as_spec(&self) -> Option<&TypeSpec> {
        match self {
            TypeNode::Leaf(spec) => Some(spec),
            TypeNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&TypeBranch> {
        match self {
            TypeNode::Branch(branch) => Some(branch),
            TypeNode::Leaf(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeNode::Leaf(_))
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, TypeNode::Branch(_))
    }
}

/// Named children of a branch, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeBranch {
    children: IndexMap<String, TypeNode>,
}

impl TypeBranch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&TypeNode> {
        self.children.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn insert(&mut self, key: String, node: TypeNode) {
        self.children.insert(key, node);
    }

    /// Diagnostic form: each leaf rendered as its spec text.
    pub fn describe(&self) -> Value {
        let map: ValueMap = self
            .children
            .iter()
            .map(|(key, node)| {
                let value = match node {
                    TypeNode::Leaf(spec) => Value::String(spec.to_string()),
                    TypeNode::Branch(branch) => branch.describe(),
                };
                (key.clone(), value)
            })
            .collect();
        Value::Map(map)
    }
}

/// Borrowed view of a resolved registry node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Leaf(&'a TypeSpec),
    Branch(&'a TypeBranch),
}

/// Where a path lands in the registry, for dictionary reads and writes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Location<'a> {
    Branch(&'a TypeBranch),
    Leaf(&'a TypeSpec),
    /// Below an `array` leaf: untyped nested data.
    Untyped,
}

/// The tree of type declarations behind a typed dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    root: TypeBranch,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_branch(root: TypeBranch) -> Self {
        Self { root }
    }

    /// Build a registry from `(path, spec)` declarations, in order.
    ///
    /// # Errors
    ///
    /// The first error any [`TypeRegistry::declare`] call reports.
    pub fn from_declarations<I, P>(declarations: I) -> Result<Self, DictError>
    where
        I: IntoIterator<Item = (P, TypeSpec)>,
        P: Into<KeyPath>,
    {
        let mut registry = Self::new();
        for (path, spec) in declarations {
            registry.declare(path, spec)?;
        }
        Ok(registry)
    }

    pub fn root(&self) -> &TypeBranch {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Declare a leaf at `path`, creating branches for the segments before it.
    ///
    /// # Errors
    ///
    /// - `UndefinedKey` if an intermediate segment is already a leaf.
    /// - `DuplicateKey` if the final segment exists with a different spec,
    ///   exists as a branch, or `path` is empty.
    pub fn declare(&mut self, path: impl Into<KeyPath>, spec: TypeSpec) -> Result<(), DictError> {
        let path = path.into();
        let Some(last) = path.last() else {
            return Err(DictError::DuplicateKey(path));
        };
        let parent = self.branch_for_insert(&path, path.len() - 1)?;
        match parent.children.get(last) {
            Some(TypeNode::Leaf(existing)) if *existing == spec => Ok(()),
            Some(_) => Err(DictError::DuplicateKey(path)),
            None => {
                tracing::debug!(path = %path, kind = %spec, "declared leaf type");
                parent.insert(last.to_string(), TypeNode::Leaf(spec));
                Ok(())
            }
        }
    }

    /// Declare an (initially empty) branch at `path`. Idempotent for branches.
    ///
    /// # Errors
    ///
    /// - `UndefinedKey` if an intermediate segment is a leaf.
    /// - `DuplicateKey` if the final segment is already a leaf.
    pub fn declare_branch(&mut self, path: impl Into<KeyPath>) -> Result<(), DictError> {
        let path = path.into();
        let Some(last) = path.last() else {
            return Ok(());
        };
        let parent = self.branch_for_insert(&path, path.len() - 1)?;
        match parent.children.get(last) {
            Some(TypeNode::Branch(_)) => Ok(()),
            Some(TypeNode::Leaf(_)) => Err(DictError::DuplicateKey(path)),
            None => {
                tracing::debug!(path = %path, "declared branch");
                parent.insert(last.to_string(), TypeNode::Branch(TypeBranch::new()));
                Ok(())
            }
        }
    }

    /// Walk the first `depth` segments of `path`, creating missing branches.
    ///
    /// Only fails on an existing leaf, and every segment before an existing
    /// leaf already existed, so a failure never leaves new branches behind.
    fn branch_for_insert(
        &mut self,
        path: &KeyPath,
        depth: usize,
    ) -> Result<&mut TypeBranch, DictError> {
        let mut current = &mut self.root;
        for key in &path.segments()[..depth] {
            let node = current
                .children
                .entry(key.clone())
                .or_insert_with(|| TypeNode::Branch(TypeBranch::new()));
            current = match node {
                TypeNode::Branch(branch) => branch,
                TypeNode::Leaf(_) => return Err(DictError::UndefinedKey(path.clone())),
            };
        }
        Ok(current)
    }

    /// Resolve `path` to a declared node. The empty path is the root branch.
    ///
    /// # Errors
    ///
    /// `UndefinedKey` if any segment is absent or lies below a leaf.
    pub fn resolve(&self, path: &KeyPath) -> Result<NodeRef<'_>, DictError> {
        match self.locate(path)? {
            Location::Branch(branch) => Ok(NodeRef::Branch(branch)),
            Location::Leaf(spec) => Ok(NodeRef::Leaf(spec)),
            Location::Untyped => Err(DictError::UndefinedKey(path.clone())),
        }
    }

    /// Like [`TypeRegistry::resolve`], but paths continuing below an
    /// `array` leaf land in [`Location::Untyped`].
    pub(crate) fn locate(&self, path: &KeyPath) -> Result<Location<'_>, DictError> {
        let segments = path.segments();
        let mut current = &self.root;
        for (i, key) in segments.iter().enumerate() {
            match current.children.get(key) {
                Some(TypeNode::Branch(branch)) => current = branch,
                Some(TypeNode::Leaf(spec)) if i + 1 == segments.len() => {
                    return Ok(Location::Leaf(spec));
                }
                Some(TypeNode::Leaf(spec)) if *spec.kind() == TypeKind::Array => {
                    return Ok(Location::Untyped);
                }
                Some(TypeNode::Leaf(_)) | None => {
                    return Err(DictError::UndefinedKey(path.clone()));
                }
            }
        }
        Ok(Location::Branch(current))
    }

    /// The branch at `path`, if `path` names one.
    pub fn branch_at(&self, path: &KeyPath) -> Option<&TypeBranch> {
        match self.resolve(path) {
            Ok(NodeRef::Branch(branch)) => Some(branch),
            _ => None,
        }
    }

    /// Diagnostic form of the whole registry.
    pub fn describe(&self) -> Value {
        self.root.describe()
    }
}

impl fmt::Display for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.describe()))
    }
}

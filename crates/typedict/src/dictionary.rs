//! # Typed Dictionary
//!
//! [`TypedDictionary`] pairs a [`TypeRegistry`] with a [`ValueTree`] of the
//! same shape. Every write is checked against the leaf it lands on; reads of
//! typed leaves therefore only ever return conforming values.
//!
//! ## Views
//!
//! Reading a branch path yields another `TypedDictionary` scoped to that
//! subtree. Views share storage with the dictionary they came from: a write
//! through any view is visible through all of them. `Clone` produces one
//! more such view, never a deep copy. Use [`TypedDictionary::to_value`] for
//! a detached copy of the data.
//!
//! Reading a leaf returns an owned copy of the stored value.
//!
//! ## Writes
//!
//! `set` is all-or-nothing. Writing a map to a branch validates every entry
//! first and only then commits, so a rejected entry anywhere in the map
//! leaves the stored data untouched.
//!
//! ## Threading
//!
//! Views share storage through `Rc<RefCell<_>>`, so a dictionary and its
//! views are confined to one thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use typedict_core::{render, render_map, DictError, KeyPath, Value, ValueMap, ValueTree};
use typedict_validation::{TypeSpec, Validators};

use crate::registry::{Location, NodeRef, TypeNode, TypeRegistry};

#[derive(Debug, Default)]
struct Storage {
    types: TypeRegistry,
    values: ValueTree,
}

/// A nested dictionary whose leaves only accept values of their declared type.
#[derive(Clone)]
pub struct TypedDictionary {
    storage: Rc<RefCell<Storage>>,
    scope: KeyPath,
}

/// What a read produced: a view for branches, a copied value for leaves.
#[derive(Debug, Clone)]
pub enum Entry {
    Branch(TypedDictionary),
    Leaf(Value),
}

impl Entry {
    pub fn is_branch(&self) -> bool {
        matches!(self, Entry::Branch(_))
    }

    pub fn as_dict(&self) -> Option<&TypedDictionary> {
        match self {
            Entry::Branch(dict) => Some(dict),
            Entry::Leaf(_) => None,
        }
    }

    pub fn into_dict(self) -> Option<TypedDictionary> {
        match self {
            Entry::Branch(dict) => Some(dict),
            Entry::Leaf(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Leaf(value) => Some(value),
            Entry::Branch(_) => None,
        }
    }

    /// The leaf value, or a copy of the branch's data.
    pub fn into_value(self) -> Value {
        match self {
            Entry::Leaf(value) => value,
            Entry::Branch(dict) => dict.to_value(),
        }
    }
}

impl TypedDictionary {
    /// An empty dictionary over `types`.
    pub fn new(types: TypeRegistry) -> Self {
        Self::from_storage(Storage {
            types,
            values: ValueTree::new(),
        })
    }

    /// A dictionary over `types`, initialised from `values`.
    ///
    /// Keys missing from `values` read as their zero value. Present keys are
    /// checked exactly as [`TypedDictionary::set`] would check them.
    ///
    /// # Errors
    ///
    /// Whatever `set` reports for the first rejected entry.
    pub fn with_values(types: TypeRegistry, values: ValueMap) -> Result<Self, DictError> {
        let dict = Self::new(types);
        dict.set(KeyPath::root(), Value::Map(values))?;
        Ok(dict)
    }

    /// An empty dictionary over a JSON type descriptor.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::from_descriptor`].
    pub fn from_descriptor(
        document: &serde_json::Value,
        validators: &Validators,
    ) -> Result<Self, DictError> {
        TypeRegistry::from_descriptor(document, validators).map(Self::new)
    }

    /// Schema-ize `sample`: infer a registry from it and keep its values.
    ///
    /// Null samples become unconstrained leaves.
    pub fn wrap(sample: ValueMap) -> Self {
        let types = TypeRegistry::infer(&sample);
        Self::from_storage(Storage {
            types,
            values: ValueTree::from(sample),
        })
    }

    fn from_storage(storage: Storage) -> Self {
        Self {
            storage: Rc::new(RefCell::new(storage)),
            scope: KeyPath::root(),
        }
    }

    fn view(&self, scope: KeyPath) -> Self {
        tracing::trace!(scope = %scope, "created sub-view");
        Self {
            storage: Rc::clone(&self.storage),
            scope,
        }
    }

    /// Path of this view relative to the root dictionary.
    pub fn scope(&self) -> &KeyPath {
        &self.scope
    }

    /// Whether `other` reads and writes the same storage as `self`.
    pub fn shares_storage_with(&self, other: &TypedDictionary) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    /// Read `path`.
    ///
    /// A branch yields a view sharing this dictionary's storage. A leaf
    /// yields a copy of its value, or the zero value of its kind if it was
    /// never written. Paths below an `array` leaf read the untyped data.
    ///
    /// # Errors
    ///
    /// `UndefinedKey` if `path` is not declared, or is below an `array`
    /// leaf and holds no value.
    pub fn get(&self, path: impl Into<KeyPath>) -> Result<Entry, DictError> {
        let full = self.scope.join(&path.into());
        let storage = self.storage.borrow();
        let entry = match storage.types.locate(&full)? {
            Location::Branch(_) => Entry::Branch(self.view(full)),
            Location::Leaf(spec) => Entry::Leaf(
                storage
                    .values
                    .get(&full)
                    .cloned()
                    .unwrap_or_else(|| spec.zero_value()),
            ),
            Location::Untyped => match storage.values.get(&full) {
                Some(value) => Entry::Leaf(value.clone()),
                None => return Err(DictError::UndefinedKey(full)),
            },
        };
        Ok(entry)
    }

    /// [`TypedDictionary::get`], flattened to a value.
    pub fn value(&self, path: impl Into<KeyPath>) -> Result<Value, DictError> {
        self.get(path).map(Entry::into_value)
    }

    /// Read `path`, falling back to `default` when no value is stored there.
    ///
    /// Only the value may be missing: the path must still be declared.
    ///
    /// # Errors
    ///
    /// `UndefinedKey` if `path` is not declared.
    pub fn dget(
        &self,
        path: impl Into<KeyPath>,
        default: impl Into<Value>,
    ) -> Result<Entry, DictError> {
        let full = self.scope.join(&path.into());
        let storage = self.storage.borrow();
        let entry = match storage.types.locate(&full)? {
            Location::Branch(_) => Entry::Branch(self.view(full)),
            Location::Leaf(_) | Location::Untyped => Entry::Leaf(
                storage
                    .values
                    .get(&full)
                    .cloned()
                    .unwrap_or_else(|| default.into()),
            ),
        };
        Ok(entry)
    }

    /// Write `value` at `path`.
    ///
    /// A leaf checks `value` against its spec. A branch requires a map and
    /// writes each entry to the matching child. Below an `array` leaf the
    /// value is stored unchecked.
    ///
    /// # Errors
    ///
    /// - `UndefinedKey` if `path`, or a key of a map written to a branch,
    ///   is not declared.
    /// - `TypeMismatch` if a leaf rejects its value.
    /// - `ValueMustBeArray` if a branch is given anything but a map, or an
    ///   untyped path runs through a stored scalar.
    /// - `UndefinedKey` if an untyped path indexes past the end of a stored
    ///   list.
    ///
    /// On error nothing is written.
    pub fn set(&self, path: impl Into<KeyPath>, value: impl Into<Value>) -> Result<(), DictError> {
        let full = self.scope.join(&path.into());
        let mut writes = Vec::new();
        {
            let storage = self.storage.borrow();
            plan_write(&storage.types, &storage.values, full, value.into(), &mut writes)?;
        }
        let mut storage = self.storage.borrow_mut();
        for (path, value) in writes {
            tracing::trace!(path = %path, "stored value");
            storage.values.set(&path, value)?;
        }
        Ok(())
    }

    /// Declare the type of the direct child `key`.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if `key` is already declared with a different spec.
    pub fn set_type(&self, key: impl Into<String>, spec: TypeSpec) -> Result<(), DictError> {
        self.declare(KeyPath::from(key.into()), spec)
    }

    /// Declare the type of a leaf anywhere below this view.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::declare`].
    pub fn declare(&self, path: impl Into<KeyPath>, spec: TypeSpec) -> Result<(), DictError> {
        let full = self.scope.join(&path.into());
        self.storage.borrow_mut().types.declare(full, spec)
    }

    /// Whether a value is stored at `path`.
    pub fn has(&self, path: impl Into<KeyPath>) -> bool {
        let full = self.scope.join(&path.into());
        self.storage.borrow().values.has(&full)
    }

    /// A copy of the registry node declared at `path`.
    ///
    /// # Errors
    ///
    /// `UndefinedKey` if `path` is not declared.
    pub fn type_at(&self, path: impl Into<KeyPath>) -> Result<TypeNode, DictError> {
        let full = self.scope.join(&path.into());
        let storage = self.storage.borrow();
        let node = match storage.types.resolve(&full)? {
            NodeRef::Leaf(spec) => TypeNode::Leaf(spec.clone()),
            NodeRef::Branch(branch) => TypeNode::Branch(branch.clone()),
        };
        Ok(node)
    }

    /// A copy of the registry for this view's subtree.
    pub fn registry(&self) -> TypeRegistry {
        let storage = self.storage.borrow();
        storage
            .types
            .branch_at(&self.scope)
            .cloned()
            .map(TypeRegistry::from_branch)
            .unwrap_or_default()
    }

    /// A detached copy of the data in this view.
    pub fn to_value(&self) -> Value {
        Value::Map(self.stored_map())
    }

    /// Keys with a stored value, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        let storage = self.storage.borrow();
        storage
            .values
            .map_at(&self.scope)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of keys with a stored value.
    pub fn len(&self) -> usize {
        let storage = self.storage.borrow();
        storage.values.map_at(&self.scope).map_or(0, |map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unsupported: keys are declared by name, not by position.
    pub fn append(&self, _value: impl Into<Value>) -> Result<(), DictError> {
        Err(DictError::UnsupportedOperation { op: "append" })
    }

    /// Unsupported: keys are declared by name, not by position.
    pub fn push(&self, _value: impl Into<Value>) -> Result<(), DictError> {
        Err(DictError::UnsupportedOperation { op: "push" })
    }

    /// Unsupported: keys are declared by name, not by position.
    pub fn unshift(&self, _value: impl Into<Value>) -> Result<(), DictError> {
        Err(DictError::UnsupportedOperation { op: "unshift" })
    }

    /// Unsupported: keys are declared by name, not by position.
    pub fn shift(&self) -> Result<Value, DictError> {
        Err(DictError::UnsupportedOperation { op: "shift" })
    }

    /// Unsupported: keys are declared by name, not by position.
    pub fn pop(&self) -> Result<Value, DictError> {
        Err(DictError::UnsupportedOperation { op: "pop" })
    }

    fn stored_map(&self) -> ValueMap {
        let storage = self.storage.borrow();
        storage.values.map_at(&self.scope).cloned().unwrap_or_default()
    }
}

/// Collect the writes `value` at `path` expands to, validating each one.
fn plan_write(
    types: &TypeRegistry,
    values: &ValueTree,
    path: KeyPath,
    value: Value,
    writes: &mut Vec<(KeyPath, Value)>,
) -> Result<(), DictError> {
    match types.locate(&path)? {
        Location::Leaf(spec) => {
            if !spec.validate(&value) {
                tracing::debug!(
                    path = %path,
                    kind = %spec,
                    actual = value.category(),
                    "rejected value"
                );
                return Err(DictError::TypeMismatch {
                    path,
                    expected: spec.to_string(),
                    actual: value.category(),
                });
            }
            values.check_set(&path, &value)?;
            writes.push((path, value));
        }
        Location::Untyped => {
            values.check_set(&path, &value)?;
            writes.push((path, value));
        }
        Location::Branch(_) => {
            let Value::Map(entries) = value else {
                tracing::debug!(
                    path = %path,
                    actual = value.category(),
                    "rejected scalar for branch"
                );
                return Err(DictError::ValueMustBeArray(path));
            };
            for (key, entry) in entries {
                let child = path.child(key);
                plan_write(types, values, child, entry, writes)?;
            }
        }
    }
    Ok(())
}

impl From<TypeRegistry> for TypedDictionary {
    fn from(types: TypeRegistry) -> Self {
        Self::new(types)
    }
}

impl fmt::Debug for TypedDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedDictionary")
            .field("scope", &self.scope)
            .field("values", &self.stored_map())
            .finish()
    }
}

/// `<values> (Type: <types>)`
impl fmt::Display for TypedDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = render_map(&self.stored_map());
        let types = render(&self.registry().describe());
        write!(f, "{values} (Type: {types})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn nested() -> TypedDictionary {
        let types = TypeRegistry::from_declarations([
            (KeyPath::from(["l1", "float"]), TypeSpec::float()),
            (KeyPath::from(["l2", "date"]), TypeSpec::date()),
            (KeyPath::from(["l3", "email"]), TypeSpec::filter("email").unwrap()),
        ])
        .unwrap();
        TypedDictionary::new(types)
    }

    fn map(entries: &[(&str, Value)]) -> ValueMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_leaf_round_trip() {
        let dict = nested();
        dict.set(["l1", "float"], 2.75).unwrap();
        assert_eq!(dict.value(["l1", "float"]).unwrap(), Value::Float(2.75));
    }

    #[test]
    fn test_unset_leaf_reads_zero_value() {
        let dict = nested();
        assert_eq!(dict.value(["l1", "float"]).unwrap(), Value::Float(0.0));
        assert_eq!(dict.value(["l2", "date"]).unwrap(), Value::Null);
        assert!(!dict.has(["l1", "float"]));
    }

    #[test]
    fn test_rejected_write_keeps_prior_value() {
        let dict = nested();
        dict.set(["l1", "float"], 1.5).unwrap();
        let err = dict.set(["l1", "float"], "3.14").unwrap_err();
        assert!(err.is_type_mismatch());
        assert!(err.to_string().starts_with("Field required"));
        assert_eq!(dict.value(["l1", "float"]).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn test_branch_write_is_all_or_nothing() {
        let types = TypeRegistry::from_declarations([
            (KeyPath::from(["l1", "a"]), TypeSpec::int()),
            (KeyPath::from(["l1", "b"]), TypeSpec::string()),
        ])
        .unwrap();
        let dict = TypedDictionary::new(types);
        let bad = map(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        assert!(dict.set("l1", bad).is_err());
        assert!(!dict.has(["l1", "a"]));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_scalar_for_branch() {
        let dict = nested();
        let err = dict.set("l1", "foo").unwrap_err();
        assert_eq!(err, DictError::ValueMustBeArray(KeyPath::from("l1")));
    }

    #[test]
    fn test_view_shares_storage() {
        let dict = nested();
        let view = dict.get("l1").unwrap().into_dict().unwrap();
        assert!(view.shares_storage_with(&dict));
        view.set("float", 4.5).unwrap();
        assert_eq!(dict.value(["l1", "float"]).unwrap(), Value::Float(4.5));

        dict.set(["l1", "float"], 1.0).unwrap();
        assert_eq!(view.value("float").unwrap(), Value::Float(1.0));
        assert!(view.set("float", "4.5").is_err());
    }

    #[test]
    fn test_view_sees_declarations() {
        let dict = nested();
        let view = dict.get("l1").unwrap().into_dict().unwrap();
        view.set_type("count", TypeSpec::int()).unwrap();
        dict.set(["l1", "count"], 3).unwrap();
        assert_eq!(view.value("count").unwrap(), Value::Int(3));
        assert_eq!(view.registry().len(), 2);
    }

    #[test]
    fn test_undeclared_path() {
        let dict = TypedDictionary::new(TypeRegistry::new());
        let err = dict.set(["foo", "bar"], true).unwrap_err();
        assert_eq!(err.to_string(), "Undefined key: foo.bar");
        assert!(dict.get("foo").is_err());
    }

    #[test]
    fn test_dget() {
        let dict = nested();
        assert_eq!(
            dict.dget(["l1", "float"], 5.0).unwrap().into_value(),
            Value::Float(5.0)
        );
        dict.set(["l1", "float"], 1.0).unwrap();
        assert_eq!(
            dict.dget(["l1", "float"], Value::Null).unwrap().into_value(),
            Value::Float(1.0)
        );
        assert!(dict.dget("l1", Value::Null).unwrap().is_branch());
        assert!(dict.dget(["l4", "float"], 5.0).is_err());
    }

    #[test]
    fn test_untyped_descent() {
        let mut types = TypeRegistry::new();
        types.declare("list", TypeSpec::array()).unwrap();
        let dict = TypedDictionary::new(types);
        dict.set(["list", "ipsum"], "lorem").unwrap();
        dict.set(["list", "when"], Utc::now()).unwrap();
        assert_eq!(dict.value(["list", "ipsum"]).unwrap(), Value::from("lorem"));
        assert!(dict.get(["list", "missing"]).is_err());
        assert_eq!(dict.value("list").unwrap().as_map().map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_untyped_list_element_written_in_place() {
        let mut types = TypeRegistry::new();
        types.declare("list", TypeSpec::array()).unwrap();
        let dict = TypedDictionary::new(types);
        dict.set("list", Value::List(vec![Value::Int(1), Value::Int(2)]))
            .unwrap();
        dict.set(["list", "1"], "two").unwrap();
        assert_eq!(
            dict.value("list").unwrap(),
            Value::List(vec![Value::Int(1), Value::from("two")])
        );
        let err = dict.set(["list", "2"], 3).unwrap_err();
        assert_eq!(err, DictError::UndefinedKey(KeyPath::from(["list", "2"])));
    }

    #[test]
    fn test_untyped_write_through_scalar_is_rejected() {
        let mut types = TypeRegistry::new();
        types.declare("list", TypeSpec::array()).unwrap();
        let dict = TypedDictionary::new(types);
        dict.set(["list", "name"], "lorem").unwrap();
        let err = dict.set(["list", "name", "first"], 1).unwrap_err();
        assert_eq!(err, DictError::ValueMustBeArray(KeyPath::from(["list", "name"])));
        assert_eq!(dict.value(["list", "name"]).unwrap(), Value::from("lorem"));
    }

    #[test]
    fn test_stack_operations_rejected() {
        let dict = TypedDictionary::new(TypeRegistry::new());
        for err in [
            dict.append(1).unwrap_err(),
            dict.push(1).unwrap_err(),
            dict.unshift(1).unwrap_err(),
            dict.shift().unwrap_err(),
            dict.pop().unwrap_err(),
        ] {
            assert!(err
                .to_string()
                .contains("TypedDictionary cannot be used as a stack"));
        }
    }

    #[test]
    fn test_keys_follow_insertion_order() {
        let dict = nested();
        dict.set(["l3", "email"], "info@example.com").unwrap();
        dict.set(["l1", "float"], 1.0).unwrap();
        assert_eq!(dict.keys(), ["l3", "l1"]);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_type_at() {
        let dict = nested();
        assert_eq!(
            dict.type_at(["l1", "float"]).unwrap().as_spec(),
            Some(&TypeSpec::float())
        );
        assert!(dict.type_at("l1").unwrap().is_branch());
    }

    #[test]
    fn test_display() {
        let types = TypeRegistry::from_declarations([
            ("a", TypeSpec::string()),
            ("b", TypeSpec::int()),
        ])
        .unwrap();
        let values = map(&[("a", Value::from("foo")), ("b", Value::Int(3))]);
        let dict = TypedDictionary::with_values(types, values).unwrap();
        assert_eq!(
            dict.to_string(),
            "['a' => foo, 'b' => 3] (Type: ['a' => string, 'b' => int])"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn read_leaf_is_a_copy(n in any::<i64>(), m in any::<i64>()) {
                let types = TypeRegistry::from_declarations([
                    ("n", TypeSpec::int()),
                    ("items", TypeSpec::array()),
                ])
                .unwrap();
                let dict = TypedDictionary::new(types);
                dict.set("n", n).unwrap();

                let mut number = dict.value("n").unwrap();
                if let Value::Int(stored) = &mut number {
                    *stored = stored.wrapping_add(m).wrapping_add(1);
                }
                let mut items = dict.value("items").unwrap();
                if let Some(entries) = items.as_map_mut() {
                    entries.insert("x".to_string(), Value::Int(m));
                }

                prop_assert_eq!(dict.value("n").unwrap(), Value::Int(n));
                prop_assert!(dict.value("items").unwrap().as_map().is_some_and(|e| e.is_empty()));
            }

            #[test]
            fn float_leaf_accepts_numbers_not_text(x in -1.0e12f64..1.0e12, n in any::<i32>()) {
                let types = TypeRegistry::from_declarations([("f", TypeSpec::float())]).unwrap();
                let dict = TypedDictionary::new(types);
                prop_assert!(dict.set("f", x).is_ok());
                prop_assert!(dict.set("f", n).is_ok());
                prop_assert!(dict.set("f", x.to_string()).is_err());
                prop_assert_eq!(dict.value("f").unwrap(), Value::Int(i64::from(n)));
            }
        }
    }
}

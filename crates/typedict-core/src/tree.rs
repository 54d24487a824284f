//! # Ordered Value Tree
//!
//! The raw storage behind a typed dictionary: an insertion-ordered map whose
//! nested maps are addressed by [`KeyPath`]. The tree itself knows nothing
//! about types. Writes only fail when a path runs through a scalar or past
//! the end of a list; existing data is never reshaped.

use crate::error::DictError;
use crate::path::KeyPath;
use crate::value::{Value, ValueMap};

/// Insertion-ordered nested map with path-addressed access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTree {
    root: ValueMap,
}

impl ValueTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value at `path`.
    ///
    /// Descends through maps by key and through lists by decimal index.
    /// The root itself is not a `Value`; use [`ValueTree::map_at`] for it.
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.root.get(first)?;
        for key in rest {
            current = match current {
                Value::Map(map) => map.get(key)?,
                Value::List(items) => items.get(list_index(key)?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// The map stored at `path`; the root map for the empty path.
    pub fn map_at(&self, path: &KeyPath) -> Option<&ValueMap> {
        if path.is_empty() {
            return Some(&self.root);
        }
        self.get(path).and_then(Value::as_map)
    }

    pub fn has(&self, path: &KeyPath) -> bool {
        self.get(path).is_some()
    }

    /// Check that [`ValueTree::set`] would accept `value` at `path`,
    /// without writing anything.
    ///
    /// # Errors
    ///
    /// - `ValueMustBeArray` if a position along `path` holds a scalar, or
    ///   `value` is not a map and `path` is empty.
    /// - `UndefinedKey` if `path` indexes past the end of a list.
    pub fn check_set(&self, path: &KeyPath, value: &Value) -> Result<(), DictError> {
        let Some((last, parents)) = path.segments().split_last() else {
            return match value {
                Value::Map(_) => Ok(()),
                _ => Err(DictError::ValueMustBeArray(path.clone())),
            };
        };
        let Some((first, rest)) = parents.split_first() else {
            return Ok(());
        };
        let mut current = self.root.get(first);
        for (depth, key) in rest.iter().enumerate() {
            current = match current {
                None => None,
                Some(Value::Map(map)) => map.get(key),
                Some(Value::List(items)) => Some(
                    list_index(key)
                        .and_then(|i| items.get(i))
                        .ok_or_else(|| DictError::UndefinedKey(path.prefix(depth + 2)))?,
                ),
                Some(_) => return Err(DictError::ValueMustBeArray(path.prefix(depth + 1))),
            };
        }
        match current {
            None | Some(Value::Map(_)) => Ok(()),
            Some(Value::List(items)) if list_index(last).is_some_and(|i| i < items.len()) => Ok(()),
            Some(Value::List(_)) => Err(DictError::UndefinedKey(path.clone())),
            Some(_) => Err(DictError::ValueMustBeArray(path.prefix(parents.len()))),
        }
    }

    /// Write `value` at `path`, creating missing intermediate maps.
    ///
    /// Lists along the way are entered by decimal index and updated in
    /// place. A `Map` written to the empty path replaces the root.
    ///
    /// # Errors
    ///
    /// As [`ValueTree::check_set`]. Nothing is written on error.
    pub fn set(&mut self, path: &KeyPath, value: Value) -> Result<(), DictError> {
        self.check_set(path, &value)?;
        let Some((last, parents)) = path.segments().split_last() else {
            if let Value::Map(map) = value {
                self.root = map;
            }
            return Ok(());
        };
        let Some((first, rest)) = parents.split_first() else {
            self.root.insert(last.clone(), value);
            return Ok(());
        };
        let mut slot = self
            .root
            .entry(first.clone())
            .or_insert_with(|| Value::Map(ValueMap::new()));
        for (depth, key) in rest.iter().enumerate() {
            slot = child_mut(slot, key)
                .ok_or_else(|| DictError::UndefinedKey(path.prefix(depth + 2)))?;
        }
        match slot {
            Value::Map(map) => {
                map.insert(last.clone(), value);
            }
            Value::List(items) => {
                let item = list_index(last)
                    .and_then(|i| items.get_mut(i))
                    .ok_or_else(|| DictError::UndefinedKey(path.clone()))?;
                *item = value;
            }
            _ => return Err(DictError::ValueMustBeArray(path.prefix(parents.len()))),
        }
        Ok(())
    }

    /// Remove and return the value at `path`, keeping sibling order.
    pub fn remove(&mut self, path: &KeyPath) -> Option<Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = &mut self.root;
        for key in parents {
            current = current.get_mut(key)?.as_map_mut()?;
        }
        current.shift_remove(last)
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.root
    }

    pub fn into_map(self) -> ValueMap {
        self.root
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl From<ValueMap> for ValueTree {
    fn from(root: ValueMap) -> Self {
        Self { root }
    }
}

fn list_index(key: &str) -> Option<usize> {
    key.parse::<usize>().ok()
}

/// The child of a container, creating an empty map under a missing map key.
fn child_mut<'a>(container: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match container {
        Value::Map(map) => Some(
            map.entry(key.to_string())
                .or_insert_with(|| Value::Map(ValueMap::new())),
        ),
        Value::List(items) => items.get_mut(list_index(key)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Value {
        Value::List(vec![Value::from("a"), Value::from("b"), Value::from("c")])
    }

    #[test]
    fn test_set_creates_intermediate_maps() {
        let mut tree = ValueTree::new();
        tree.set(&KeyPath::from(["l1", "l2", "x"]), Value::Int(1)).unwrap();
        assert_eq!(tree.get(&KeyPath::from(["l1", "l2", "x"])), Some(&Value::Int(1)));
        assert!(tree.get(&KeyPath::from(["l1", "l2"])).unwrap().is_map());
        assert!(tree.has(&KeyPath::from("l1")));
        assert!(!tree.has(&KeyPath::from("l2")));
    }

    #[test]
    fn test_set_through_scalar_is_rejected() {
        let mut tree = ValueTree::new();
        tree.set(&KeyPath::from("a"), Value::Int(1)).unwrap();
        let err = tree.set(&KeyPath::from(["a", "b"]), Value::Int(2)).unwrap_err();
        assert_eq!(err, DictError::ValueMustBeArray(KeyPath::from("a")));
        assert_eq!(tree.get(&KeyPath::from("a")), Some(&Value::Int(1)));

        tree.set(&KeyPath::from(["m", "s"]), Value::from("text")).unwrap();
        let err = tree.set(&KeyPath::from(["m", "s", "x", "y"]), Value::Null).unwrap_err();
        assert_eq!(err, DictError::ValueMustBeArray(KeyPath::from(["m", "s"])));
        assert_eq!(tree.get(&KeyPath::from(["m", "s"])), Some(&Value::from("text")));
    }

    #[test]
    fn test_set_updates_list_element_in_place() {
        let mut tree = ValueTree::new();
        tree.set(&KeyPath::from("items"), letters()).unwrap();
        tree.set(&KeyPath::from(["items", "0"]), Value::from("z")).unwrap();
        assert_eq!(
            tree.get(&KeyPath::from("items")),
            Some(&Value::List(vec![Value::from("z"), Value::from("b"), Value::from("c")]))
        );
    }

    #[test]
    fn test_set_descends_lists_to_nested_maps() {
        let mut tree = ValueTree::new();
        let mut row = ValueMap::new();
        row.insert("name".to_string(), Value::from("first"));
        tree.set(&KeyPath::from("rows"), Value::List(vec![Value::Map(row)]))
            .unwrap();
        tree.set(&KeyPath::from(["rows", "0", "name"]), Value::from("renamed"))
            .unwrap();
        tree.set(&KeyPath::from(["rows", "0", "extra", "deep"]), Value::Int(7))
            .unwrap();
        assert_eq!(
            tree.get(&KeyPath::from(["rows", "0", "name"])),
            Some(&Value::from("renamed"))
        );
        assert_eq!(
            tree.get(&KeyPath::from(["rows", "0", "extra", "deep"])),
            Some(&Value::Int(7))
        );
    }

    #[test]
    fn test_set_past_list_end_is_rejected() {
        let mut tree = ValueTree::new();
        tree.set(&KeyPath::from("items"), letters()).unwrap();
        let path = KeyPath::from(["items", "3"]);
        assert_eq!(
            tree.set(&path, Value::from("d")).unwrap_err(),
            DictError::UndefinedKey(path)
        );
        let err = tree
            .set(&KeyPath::from(["items", "x", "y"]), Value::Null)
            .unwrap_err();
        assert_eq!(err, DictError::UndefinedKey(KeyPath::from(["items", "x"])));
        assert_eq!(tree.get(&KeyPath::from("items")), Some(&letters()));
    }

    #[test]
    fn test_check_set_does_not_write() {
        let mut tree = ValueTree::new();
        tree.set(&KeyPath::from("items"), letters()).unwrap();
        assert!(tree
            .check_set(&KeyPath::from(["items", "2"]), &Value::Null)
            .is_ok());
        assert!(tree
            .check_set(&KeyPath::from(["fresh", "a", "b"]), &Value::Null)
            .is_ok());
        assert!(!tree.has(&KeyPath::from("fresh")));
        assert_eq!(tree.get(&KeyPath::from("items")), Some(&letters()));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut tree = ValueTree::new();
        for key in ["z", "a", "m"] {
            tree.set(&KeyPath::from(key), Value::Null).unwrap();
        }
        let keys: Vec<&str> = tree.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        tree.remove(&KeyPath::from("a"));
        let keys: Vec<&str> = tree.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "m"]);
    }

    #[test]
    fn test_get_descends_lists_by_index() {
        let mut tree = ValueTree::new();
        tree.set(
            &KeyPath::from("items"),
            Value::List(vec![Value::from("a"), Value::from("b")]),
        )
        .unwrap();
        assert_eq!(tree.get(&KeyPath::from(["items", "1"])), Some(&Value::from("b")));
        assert_eq!(tree.get(&KeyPath::from(["items", "2"])), None);
        assert_eq!(tree.get(&KeyPath::from(["items", "x"])), None);
    }

    #[test]
    fn test_root_path() {
        let mut tree = ValueTree::new();
        assert!(tree.get(&KeyPath::root()).is_none());
        assert!(tree.map_at(&KeyPath::root()).is_some());
        let mut map = ValueMap::new();
        map.insert("k".to_string(), Value::Bool(true));
        tree.set(&KeyPath::root(), Value::Map(map)).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.set(&KeyPath::root(), Value::Int(3)).unwrap_err(),
            DictError::ValueMustBeArray(KeyPath::root())
        );
        assert_eq!(tree.len(), 1);
    }
}

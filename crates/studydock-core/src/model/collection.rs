use serde::de::DeserializeOwned;
use serde::Serialize;

/// An entity with a collection-unique string id.
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;
}

/// Ordered, id-unique set of records in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build from a stored list, keeping the first record for any repeated id.
    pub fn from_vec(items: Vec<T>) -> Self {
        let mut collection = Self::new();
        for item in items {
            collection.insert(item);
        }
        collection
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns `false` if a record with the same id already exists.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let idx = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

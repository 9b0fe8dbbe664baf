use crate::objects::{Name, Object, ObjectId};
use indexmap::IndexMap;

/// A PDF dictionary. Entries keep their insertion order, which is the order
/// they are written in.
#[derive(Debug, PartialEq, Default)]
pub struct Dictionary {
    entries: IndexMap<Name, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces an entry. A replaced entry keeps its position.
    pub fn set(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    pub fn get_dict_mut(&mut self, key: &str) -> Option<&mut Dictionary> {
        self.get_mut(key).and_then(Object::as_dict_mut)
    }

    pub(crate) fn for_each_reference(&self, visit: &mut dyn FnMut(ObjectId)) {
        for value in self.entries.values() {
            value.for_each_reference(visit);
        }
    }
}

impl<K: Into<Name>> FromIterator<(K, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (K, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

//! Argument containers and lookup-capable collections.
//!
//! These are deliberately small reference-counted containers: the dispatcher
//! only needs ordered rest lists, and the lookup invocables (maps, sets,
//! keywords) only need key lookup. Cloning any of them is O(1).

use std::sync::Arc;

use super::object::Object;

// =============================================================================
// List - Rest Collections
// =============================================================================

/// Ordered, immutable sequence used as the packed rest argument.
#[derive(Debug, Clone, Default)]
pub struct List(Arc<Vec<Object>>);

impl List {
    /// Create a list that takes ownership of `items`
    pub fn new(items: Vec<Object>) -> Self {
        List(Arc::new(items))
    }

    /// The empty list
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Object] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.0.iter()
    }

    /// First element, if any
    pub fn first(&self) -> Option<&Object> {
        self.0.first()
    }
}

impl From<Vec<Object>> for List {
    fn from(items: Vec<Object>) -> Self {
        List::new(items)
    }
}

impl FromIterator<Object> for List {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        List::new(iter.into_iter().collect())
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

// =============================================================================
// Vector
// =============================================================================

/// Indexed, immutable sequence.
#[derive(Debug, Clone, Default)]
pub struct Vector(Arc<Vec<Object>>);

impl Vector {
    pub fn new(items: Vec<Object>) -> Self {
        Vector(Arc::new(items))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Object] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.0.iter()
    }

    /// Element at `index`, if in bounds
    pub fn nth(&self, index: usize) -> Option<&Object> {
        self.0.get(index)
    }
}

impl From<Vec<Object>> for Vector {
    fn from(items: Vec<Object>) -> Self {
        Vector::new(items)
    }
}

impl FromIterator<Object> for Vector {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Vector::new(iter.into_iter().collect())
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

// =============================================================================
// Map - Array Map
// =============================================================================

/// Small associative collection with linear key lookup.
///
/// Keys are unique; a later pair replaces an earlier one with an equal key.
#[derive(Debug, Clone, Default)]
pub struct Map(Arc<Vec<(Object, Object)>>);

impl Map {
    /// Build a map from key/value pairs
    pub fn from_pairs<I: IntoIterator<Item = (Object, Object)>>(pairs: I) -> Self {
        let mut entries: Vec<(Object, Object)> = Vec::new();
        for (key, value) in pairs {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Map(Arc::new(entries))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &Object) -> Option<&Object> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Object) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Object, Object)> {
        self.0.iter()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

// =============================================================================
// Set
// =============================================================================

/// Small set with linear membership checks.
#[derive(Debug, Clone, Default)]
pub struct Set(Arc<Vec<Object>>);

impl Set {
    /// Build a set, dropping duplicate elements
    pub fn from_items<I: IntoIterator<Item = Object>>(items: I) -> Self {
        let mut unique: Vec<Object> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Set(Arc::new(unique))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The stored element equal to `item`
    pub fn get(&self, item: &Object) -> Option<&Object> {
        self.0.iter().find(|v| *v == item)
    }

    pub fn contains(&self, item: &Object) -> bool {
        self.get(item).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.0.iter()
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.len() == other.len() && self.iter().all(|v| other.contains(v)))
    }
}

// =============================================================================
// Keyword
// =============================================================================

/// Self-evaluating symbolic key, callable as a map accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword(Arc<str>);

impl Keyword {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Keyword(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Seq - Fresh Iteration
// =============================================================================

/// A fresh, by-value iteration over a seqable object.
///
/// Map entries are produced as two-element vectors.
#[derive(Debug, Clone)]
pub enum Seq<'a> {
    /// `nil` and other empty sources
    Empty,
    /// Lists, vectors and sets
    Items(std::slice::Iter<'a, Object>),
    /// Map entries
    Entries(std::slice::Iter<'a, (Object, Object)>),
}

impl Iterator for Seq<'_> {
    type Item = Object;

    fn next(&mut self) -> Option<Object> {
        match self {
            Seq::Empty => None,
            Seq::Items(items) => items.next().cloned(),
            Seq::Entries(entries) => entries
                .next()
                .map(|(k, v)| Object::Vector(Vector::new(vec![k.clone(), v.clone()]))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Seq::Empty => (0, Some(0)),
            Seq::Items(items) => items.size_hint(),
            Seq::Entries(entries) => entries.size_hint(),
        }
    }
}

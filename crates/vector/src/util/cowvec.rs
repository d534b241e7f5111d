// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;
use std::ops::{Deref, Index};
use std::sync::Arc;

/// Copy-on-write vector. Cloning is an `Arc` bump; mutation of a shared
/// instance copies the elements first.
#[derive(Clone, Debug, PartialEq)]
pub struct CowVec<T> {
    inner: Arc<Vec<T>>,
}

impl<T: Clone> CowVec<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { inner: Arc::new(data) }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: Arc::new(Vec::with_capacity(capacity)) }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    pub fn make_mut(&mut self) -> &mut Vec<T> {
        Arc::make_mut(&mut self.inner)
    }

    pub fn push(&mut self, value: T) {
        self.make_mut().push(value);
    }

    pub fn resize(&mut self, len: usize, value: T) {
        self.make_mut().resize(len, value);
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = T>) {
        self.make_mut().extend(values);
    }

    pub fn take(&self, n: usize) -> Self {
        Self::new(self.inner.iter().take(n).cloned().collect())
    }

    pub fn is_owned(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }
}

impl<T: Clone + Default> CowVec<T> {
    pub fn filled(len: usize) -> Self {
        Self::new(vec![T::default(); len])
    }
}

impl<T: Clone> Default for CowVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Deref for CowVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.inner.as_slice()
    }
}

impl<T> Index<usize> for CowVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[index]
    }
}

impl<T: Clone> From<Vec<T>> for CowVec<T> {
    fn from(value: Vec<T>) -> Self {
        Self::new(value)
    }
}

impl<T: Clone> FromIterator<T> for CowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for CowVec<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Clone> Deserialize<'de> for CowVec<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(CowVec::new(Vec::deserialize(deserializer)?))
    }
}

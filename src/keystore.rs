// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! The insertion-ordered key store.
//!
//! Backed by [`std::borrow::Cow`]: an owned variant for maps built
//! incrementally or from a plain iterable, and a borrowed variant for maps
//! built over a typed array's buffer. `Cow` already gives us exactly the
//! "owned or borrowed, promote-on-write" shape this needs, without
//! hand-rolling the same split.

use std::borrow::Cow;

#[derive(Debug, Clone)]
pub(crate) struct KeyStore<'a, K: Clone> {
    data: Cow<'a, [K]>,
}

impl<'a, K: Clone> KeyStore<'a, K> {
    pub(crate) fn owned(keys: Vec<K>) -> Self {
        Self {
            data: Cow::Owned(keys),
        }
    }

    pub(crate) fn borrowed(keys: &'a [K]) -> Self {
        Self {
            data: Cow::Borrowed(keys),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn get(&self, position: usize) -> Option<&K> {
        self.data.get(position)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, K> {
        self.data.iter()
    }

    pub(crate) fn as_slice(&self) -> &[K] {
        &self.data
    }

    /// Append a key. Only called by the mutable facade and by the generic
    /// inserter; a frozen map constructed over a borrowed typed array never
    /// appends (it is closed after construction). `Cow::to_mut` would
    /// silently clone a borrowed buffer into an owned one rather than
    /// mutating the source, which would violate the borrowed buffer's
    /// immutability if this were ever called on a borrowed store — but by
    /// construction it never is.
    pub(crate) fn push(&mut self, key: K) {
        self.data.to_mut().push(key);
    }

    pub(crate) fn to_owned_vec(&self) -> Vec<K> {
        self.data.to_vec()
    }
}

impl<'a, K: Clone + PartialEq> KeyStore<'a, K> {
    /// Element-wise equality with another sequence, independent of whether
    /// either side is owned or borrowed.
    pub(crate) fn sequence_eq(&self, other: &[K]) -> bool {
        self.data.as_ref() == other
    }
}

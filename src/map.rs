// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! The map facade: the mutable and frozen variants that expose lookup,
//! iteration, equality, hashing, and serialization over the table and key
//! store beneath them.
//!
//! Frozen and mutable are two concrete facades over the same table/key
//! store machinery, not one type with a runtime mutability flag — the
//! same split a datastore wrapper draws between a plain store and a
//! synchronized one.

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::category::{Category, Lookup, MapKey};
use crate::error::{BuildError, MapError};
use crate::generic;
use crate::keystore::KeyStore;
use crate::table::{Probe, Table};
use crate::typed_array::{build_from_array, ArrayView, PrimitiveElement};

/// Common read-only surface shared by [`MutableMap`] and [`FrozenMap`],
/// used by [`MutableMap::union_extend`] to accept either variant as the
/// source of new keys.
pub trait MapLike<K: MapKey> {
    /// The map's keys, in insertion order.
    fn ordered_keys(&self) -> &[K];
}

fn lookup_position<K, Q>(table: &Table, keys: &KeyStore<'_, K>, query: &Q) -> Option<usize>
where
    K: MapKey,
    Q: Lookup<K> + ?Sized,
{
    match table.probe(query.lookup_hash(), |p| {
        query.lookup_eq(keys.get(p).expect("occupied slot points within key store"))
    }) {
        Probe::Found(position) => Some(position),
        Probe::Vacant(_) => None,
    }
}

/// `keys().zip(0..len())`, the concrete type behind [`MutableMap::items`]
/// and [`FrozenMap::items`].
pub type Items<'m, K> = std::iter::Zip<std::slice::Iter<'m, K>, std::ops::Range<usize>>;

macro_rules! impl_read_surface {
    ($ty:ident $(< $lt:lifetime >)?) => {
        impl<$($lt,)? K: MapKey> $ty<$($lt,)? K> {
            /// Number of distinct keys.
            pub fn len(&self) -> usize {
                self.table.len()
            }

            /// Whether the map has no keys.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// The fixed category of this map's keys.
            pub fn category(&self) -> Category {
                K::category()
            }

            /// Lookup-style access: the key's position, or `None` if absent.
            /// Never raises on a non-matching but hashable key.
            pub fn get<Q: Lookup<K> + ?Sized>(&self, key: &Q) -> Option<usize> {
                lookup_position(&self.table, &self.keys, key)
            }

            /// `get`, defaulted.
            pub fn get_or<Q: Lookup<K> + ?Sized>(&self, key: &Q, default: usize) -> usize {
                self.get(key).unwrap_or(default)
            }

            /// Subscript-style access: panics with a key-missing message if
            /// `key` is absent.
            pub fn position<Q: Lookup<K> + ?Sized>(&self, key: &Q) -> usize {
                self.get(key).unwrap_or_else(|| panic!("{}", MapError::KeyMissing))
            }

            /// Whether `key` is present. Never raises.
            pub fn contains<Q: Lookup<K> + ?Sized>(&self, key: &Q) -> bool {
                self.get(key).is_some()
            }

            /// Keys in insertion order.
            pub fn keys(&self) -> std::slice::Iter<'_, K> {
                self.keys.iter()
            }

            /// Positions `0..len()`, the values of the mapping.
            pub fn values(&self) -> std::ops::Range<usize> {
                0..self.len()
            }

            /// `(key, position)` pairs in insertion order.
            pub fn items(&self) -> Items<'_, K> {
                self.keys().zip(self.values())
            }
        }

        impl<$($lt,)? K: MapKey> MapLike<K> for $ty<$($lt,)? K> {
            fn ordered_keys(&self) -> &[K] {
                self.keys.as_slice()
            }
        }

        impl<'m, $($lt,)? K: MapKey> IntoIterator for &'m $ty<$($lt,)? K> {
            type Item = (&'m K, usize);
            type IntoIter = Items<'m, K>;

            fn into_iter(self) -> Self::IntoIter {
                self.items()
            }
        }

        impl<$($lt,)? K: MapKey + fmt::Debug> fmt::Debug for $ty<$($lt,)? K> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.items().map(|(k, p)| (k, p))).finish()
            }
        }
    };
}

/// Equality: two maps are equal iff their ordered key sequences are equal
/// and their lengths match; categories need not match.
fn sequence_eq<K: PartialEq>(a: &[K], b: &[K]) -> bool {
    a == b
}

/// A mutable auto-indexed map: accepts incremental `add`/`update` in
/// addition to the shared read surface.
#[derive(Clone)]
pub struct MutableMap<K: MapKey> {
    table: Table,
    keys: KeyStore<'static, K>,
}

impl<K: MapKey> Default for MutableMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MapKey> MutableMap<K> {
    /// An empty map of capacity 16.
    pub fn new() -> Self {
        Self {
            table: Table::new(),
            keys: KeyStore::owned(Vec::new()),
        }
    }

    /// An empty map sized up front for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Table::with_capacity(capacity),
            keys: KeyStore::owned(Vec::with_capacity(capacity)),
        }
    }

    /// Build from an infallible iterable, panicking on a duplicate key.
    /// The fallible sibling to `std`'s necessarily-infallible
    /// `FromIterator` contract.
    pub fn try_from_iter<I: IntoIterator<Item = K>>(iter: I) -> Result<Self, MapError> {
        let (table, keys) = generic::build_from_iter(iter)?;
        Ok(Self { table, keys })
    }

    /// Add a single key. Returns its position, or `DuplicateKey` if an
    /// equal key is already present, leaving the map unchanged.
    pub fn add(&mut self, key: K) -> Result<usize, MapError> {
        generic::insert_one(&mut self.table, &mut self.keys, key)
    }

    /// Extend from an infallible iterable, atomically: a duplicate leaves
    /// the map exactly as it was before the call.
    pub fn update<I: IntoIterator<Item = K>>(&mut self, iter: I) -> Result<(), MapError> {
        self.try_update(iter.into_iter().map(Ok::<_, std::convert::Infallible>))
            .map_err(|err| match err {
                BuildError::Map(map_err) => map_err,
                BuildError::Iteration(never) => match never {},
            })
    }

    /// Extend from a fallible iterable; an upstream error propagates
    /// unchanged, and a duplicate key is just as atomic as the infallible
    /// path.
    pub fn try_update<I, E>(&mut self, iter: I) -> Result<(), BuildError<E>>
    where
        I: IntoIterator<Item = Result<K, E>>,
        E: std::error::Error + 'static,
    {
        let (table, keys) = generic::try_extend(&self.table, &self.keys, iter)?;
        self.table = table;
        self.keys = keys;
        Ok(())
    }

    /// Append every key of `other` not yet present, atomically:
    /// mechanically this is `update` fed `other`'s ordered keys, so if
    /// `other` contains a key already present in `self` the whole
    /// extension is rejected and `self` is left untouched, exactly like
    /// `update`.
    pub fn union_extend<M: MapLike<K>>(&mut self, other: &M) -> Result<(), MapError> {
        self.update(other.ordered_keys().iter().cloned())
    }
}

impl<K: MapKey, M: MapLike<K>> std::ops::BitOrAssign<&M> for MutableMap<K> {
    /// `m |= other` as shorthand for `union_extend`. Panics on overlap
    /// rather than returning `Result`, the same infallible-operator
    /// tradeoff `FromIterator` makes below; `union_extend` is the
    /// fallible form.
    fn bitor_assign(&mut self, other: &M) {
        self.union_extend(other).unwrap_or_else(|err| panic!("{err}"));
    }
}

impl<K: MapKey> FromIterator<K> for MutableMap<K> {
    /// Panics on a duplicate key — the one place in this crate where a
    /// duplicate is a panic rather than a `Result`, forced by
    /// `FromIterator`'s infallible contract.
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::try_from_iter(iter).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl_read_surface!(MutableMap);

/// An immutable, hashable auto-indexed map. All operations are read-only.
pub struct FrozenMap<'a, K: MapKey> {
    table: Table,
    keys: KeyStore<'a, K>,
    hash_cache: OnceCell<u64>,
}

impl<'a, K: MapKey> Clone for FrozenMap<'a, K> {
    fn clone(&self) -> Self {
        // No re-hash from scratch: table and key store are plain data,
        // so cloning them reuses the already-computed positions.
        Self {
            table: self.table.clone(),
            keys: self.keys.clone(),
            hash_cache: self.hash_cache.clone(),
        }
    }
}

impl<'a, K: MapKey> FrozenMap<'a, K> {
    /// Build from an infallible iterable.
    pub fn try_from_iter<I: IntoIterator<Item = K>>(iter: I) -> Result<Self, MapError> {
        let (table, keys) = generic::build_from_iter(iter)?;
        Ok(Self {
            table,
            keys,
            hash_cache: OnceCell::new(),
        })
    }

    /// Build over the same ordered keys as an existing map of either
    /// variant, without re-hashing.
    pub fn from_map<M: MapLike<K>>(other: &M) -> Self
    where
        K: MapKey,
    {
        // Safe to `expect`: `other` already proved its keys are unique.
        Self::try_from_iter(other.ordered_keys().iter().cloned())
            .expect("source map's keys are already known to be unique")
    }
}

impl<'a, T: PrimitiveElement + MapKey> FrozenMap<'a, T> {
    /// The typed-array fast path: construct directly from a validated,
    /// immutable, contiguous one-dimensional primitive buffer. The map's
    /// category is fixed to `T`'s, and the key store borrows the array's
    /// buffer rather than copying it.
    pub fn from_array(view: ArrayView<'a, T>) -> Result<Self, MapError> {
        let (table, keys) = build_from_array(view)?;
        Ok(Self {
            table,
            keys,
            hash_cache: OnceCell::new(),
        })
    }
}

impl_read_surface!(FrozenMap<'a>);

impl<'a, K: MapKey + Hash> FrozenMap<'a, K> {
    /// A deterministic hash that is a pure function of the ordered key
    /// sequence (and not of the category, matching `PartialEq`'s own
    /// category-independence), cached after first computation.
    pub fn map_hash(&self) -> u64 {
        *self.hash_cache.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            for key in self.keys.iter() {
                key.hash(&mut hasher);
            }
            hasher.finish()
        })
    }
}

impl<'a, K: MapKey + Hash> Hash for FrozenMap<'a, K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.map_hash());
    }
}

impl<K: MapKey> PartialEq for MutableMap<K> {
    fn eq(&self, other: &Self) -> bool {
        sequence_eq(self.keys.as_slice(), other.keys.as_slice())
    }
}

impl<K: MapKey> Eq for MutableMap<K> {}

impl<'a, K: MapKey> PartialEq for FrozenMap<'a, K> {
    fn eq(&self, other: &Self) -> bool {
        sequence_eq(self.keys.as_slice(), other.keys.as_slice())
    }
}

impl<'a, K: MapKey> Eq for FrozenMap<'a, K> {}

impl<'a, K: MapKey> PartialEq<MutableMap<K>> for FrozenMap<'a, K> {
    fn eq(&self, other: &MutableMap<K>) -> bool {
        sequence_eq(self.keys.as_slice(), other.keys.as_slice())
    }
}

impl<'a, K: MapKey> PartialEq<FrozenMap<'a, K>> for MutableMap<K> {
    fn eq(&self, other: &FrozenMap<'a, K>) -> bool {
        sequence_eq(self.keys.as_slice(), other.keys.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s1_frozen_basic() {
        let m = FrozenMap::try_from_iter(["a", "b", "c"].map(String::from)).unwrap();
        assert_eq!(m.position(&"a".to_string()), 0);
        assert_eq!(m.position(&"b".to_string()), 1);
        assert_eq!(m.position(&"c".to_string()), 2);
        assert_eq!(m.len(), 3);
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        let reversed: Vec<_> = m.keys().rev().cloned().collect();
        assert_eq!(reversed, vec!["c", "b", "a"]);
    }

    #[test]
    fn scenario_s1_str_lookup_via_cross_impl() {
        let m = FrozenMap::try_from_iter(["a", "b", "c"].map(String::from)).unwrap();
        assert_eq!(m.get("a"), Some(0));
        assert_eq!(m.get("z"), None);
    }

    #[test]
    fn scenario_s4_duplicate_fails_whole_construction() {
        let err = MutableMap::try_from_iter(["a", "b", "a"].map(String::from)).unwrap_err();
        assert_eq!(err, MapError::DuplicateKey);
    }

    #[test]
    fn scenario_s5_update_atomic() {
        let mut m = MutableMap::new();
        m.add("x".to_string()).unwrap();
        m.update(["y".to_string(), "z".to_string()]).unwrap();
        assert!(m.update(["w".to_string(), "x".to_string()]).is_err());
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec!["x".to_string(), "y".to_string(), "z".to_string()]);
    }

    #[test]
    fn mutable_and_frozen_compare_equal_regardless_of_category_and_variant() {
        let mutable: MutableMap<i32> = MutableMap::try_from_iter([1, 2, 3]).unwrap();
        let frozen = FrozenMap::from_map(&mutable);
        assert_eq!(mutable, frozen);
    }

    #[test]
    fn union_extend_rejects_on_overlap_leaving_self_untouched() {
        let mut a = MutableMap::try_from_iter([1i32, 2, 3]).unwrap();
        let b = MutableMap::try_from_iter([3i32, 4]).unwrap();
        assert!(a.union_extend(&b).is_err());
        assert_eq!(a.keys().cloned().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn union_extend_appends_disjoint_keys() {
        let mut a = MutableMap::try_from_iter([1i32, 2, 3]).unwrap();
        let b = MutableMap::try_from_iter([4i32, 5]).unwrap();
        a.union_extend(&b).unwrap();
        assert_eq!(a.keys().cloned().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn bitor_assign_is_union_extend_shorthand() {
        let mut a = MutableMap::try_from_iter([1i32, 2, 3]).unwrap();
        let b = MutableMap::try_from_iter([4i32, 5]).unwrap();
        a |= &b;
        assert_eq!(a.keys().cloned().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn frozen_hash_stable_within_process() {
        let a = FrozenMap::try_from_iter([1i32, 2, 3]).unwrap();
        let b = FrozenMap::try_from_iter([1i32, 2, 3]).unwrap();
        assert_eq!(a.map_hash(), b.map_hash());
        assert_eq!(a, b);
    }
}

// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! Persisted-state encode/decode.
//!
//! Round-trips the ordered key sequence through a small snapshot type
//! rather than hand-rolling a binary format. Neither [`MutableMap`] nor
//! [`FrozenMap`] embeds the hash table itself in the wire form — it is
//! always regenerated on restore — so a snapshot is just a variant tag, a
//! category tag, and the keys in insertion order.
//!
//! The category tag is carried for documentation and cross-tooling
//! parity; within a single Rust process the key type `K` already fixes
//! the category statically, so a decoded snapshot whose tag disagrees
//! with `K::category()` cannot arise from this crate's own encoder and is
//! logged rather than treated as fatal (the keys themselves are still
//! restored faithfully).
//!
//! Primitive-category maps are not given a bespoke byte-buffer encoding:
//! `Vec<K>`'s own `serde` implementation already serializes a primitive
//! sequence compactly in binary formats (bincode, MessagePack), and
//! decoding always re-establishes an owned, immutable buffer, since the
//! borrowed view a primitive-array map was built over cannot survive a
//! round-trip through a deserializer.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::category::{Category, MapKey};
use crate::map::{FrozenMap, MutableMap};

/// Which concrete facade a snapshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// The incrementally-extensible facade.
    Mutable,
    /// The immutable, hashable facade.
    Frozen,
}

/// The on-the-wire form of a map: a variant tag, a category tag, and the
/// ordered keys. Not part of the public API beyond `Serialize`/
/// `Deserialize` on [`MutableMap`]/[`FrozenMap`] themselves.
#[derive(Serialize, Deserialize)]
struct MapSnapshot<K> {
    variant: Variant,
    category: Category,
    keys: Vec<K>,
}

impl<K: MapKey + Serialize> Serialize for MutableMap<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MapSnapshot {
            variant: Variant::Mutable,
            category: self.category(),
            keys: self.keys().cloned().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, K: MapKey + Deserialize<'de>> Deserialize<'de> for MutableMap<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = MapSnapshot::<K>::deserialize(deserializer)?;
        check_category::<K>(snapshot.category);
        MutableMap::try_from_iter(snapshot.keys).map_err(D::Error::custom)
    }
}

impl<'a, K: MapKey + Serialize> Serialize for FrozenMap<'a, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MapSnapshot {
            variant: Variant::Frozen,
            category: self.category(),
            keys: self.keys().cloned().collect(),
        }
        .serialize(serializer)
    }
}

/// Restores into an owned, `'static` frozen map: the deserialized key
/// sequence never outlives the deserializer, so the restored map cannot
/// borrow a foreign buffer and must own one.
impl<'de, K: MapKey + Deserialize<'de>> Deserialize<'de> for FrozenMap<'static, K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = MapSnapshot::<K>::deserialize(deserializer)?;
        check_category::<K>(snapshot.category);
        FrozenMap::try_from_iter(snapshot.keys).map_err(D::Error::custom)
    }
}

fn check_category<K: MapKey>(decoded: Category) {
    if decoded != K::category() {
        log::warn!(
            "deserialized map's category tag ({:?}) does not match the target type's category ({:?}); keys are restored as-is",
            decoded,
            K::category(),
        );
    }
}

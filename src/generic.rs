// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! The generic-key inserter.
//!
//! Consumes any iterable of host values through the generic-object (or any
//! other, statically-typed) category's hash/equality. Makes no assumption
//! about the input being sized and grows the table as needed. An iteration
//! error from the input (`E`) propagates unchanged, layered via
//! [`BuildError`] rather than folded into [`MapError`] itself.

use crate::category::MapKey;
use crate::error::{BuildError, MapError};
use crate::keystore::KeyStore;
use crate::table::{Probe, Table};

/// Insert a single key, growing the table first if needed. Returns the
/// key's position, or `DuplicateKey` if an equal key is already present.
pub(crate) fn insert_one<K: MapKey>(
    table: &mut Table,
    keys: &mut KeyStore<'_, K>,
    key: K,
) -> Result<usize, MapError> {
    if table.needs_growth() {
        table.grow(|position| keys.get(position).expect("position within key store").table_hash());
    }
    let hash = key.table_hash();
    match table.probe(hash, |position| keys.get(position) == Some(&key)) {
        Probe::Found(_) => Err(MapError::DuplicateKey),
        Probe::Vacant(slot_index) => {
            let position = keys.len();
            keys.push(key);
            table.occupy(slot_index, position);
            Ok(position)
        }
    }
}

/// Insert every key an iterator yields, atomically: either every key is
/// accepted, or none are. Operates on a scratch copy of the table/key
/// store so the caller's live state is untouched until success is certain.
pub(crate) fn try_extend<K, I, E>(
    table: &Table,
    keys: &KeyStore<'_, K>,
    iter: I,
) -> Result<(Table, KeyStore<'static, K>), BuildError<E>>
where
    K: MapKey,
    I: IntoIterator<Item = Result<K, E>>,
    E: std::error::Error + 'static,
{
    let mut scratch_keys: KeyStore<'static, K> = KeyStore::owned(keys.to_owned_vec());
    let mut scratch_table = table.clone();
    for item in iter {
        let key = item.map_err(BuildError::Iteration)?;
        insert_one(&mut scratch_table, &mut scratch_keys, key).map_err(BuildError::Map)?;
    }
    Ok((scratch_table, scratch_keys))
}

/// Build a fresh table and key store from an infallible iterable, the
/// common construction path.
pub(crate) fn build_from_iter<K, I>(iter: I) -> Result<(Table, KeyStore<'static, K>), MapError>
where
    K: MapKey,
    I: IntoIterator<Item = K>,
{
    let mut table = Table::new();
    let mut keys: KeyStore<'static, K> = KeyStore::owned(Vec::new());
    for key in iter {
        insert_one(&mut table, &mut keys, key)?;
    }
    Ok((table, keys))
}

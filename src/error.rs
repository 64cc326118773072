// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! Error taxonomy.

use thiserror::Error;

/// Errors signalled across the map's public surface.
///
/// `DuplicateKey` is the one variant callers are expected to match on
/// specifically. Since this crate has no host VM exception hierarchy to
/// slot into, "a distinct, user-visible error that is a subtype of the
/// host's invalid-value error" is represented by [`HostInvalidValue`], a
/// marker trait every variant of `MapError` implements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A key equal to one already present was encountered during
    /// construction, `add`, `update`/`extend`, or a bulk insert directly
    /// from a typed array's raw buffer.
    #[error("duplicate key encountered")]
    DuplicateKey,

    /// The fast path saw a typed array that is multi-dimensional,
    /// non-contiguous, writable, or not in native byte order.
    #[error("array is not a recognized contiguous immutable one-dimensional buffer")]
    UnsupportedArray,

    /// Subscript-style lookup found no entry for the key.
    #[error("key missing from map")]
    KeyMissing,
}

/// Marker for "the host's standard invalid-value error", which
/// [`MapError::DuplicateKey`] (and the other variants) is defined to be a
/// subtype of.
pub trait HostInvalidValue: std::error::Error {}

impl HostInvalidValue for MapError {}

/// Result alias used throughout the crate.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Error produced by the fallible generic-iterator construction path,
/// which layers an upstream iteration error `E` on top of the map's own
/// error taxonomy without forcing [`MapError`] itself to become generic:
/// an iteration error from the input propagates unchanged.
#[derive(Debug, Error)]
pub enum BuildError<E: std::error::Error + 'static> {
    /// A failure internal to map construction (duplicate key, etc).
    #[error(transparent)]
    Map(#[from] MapError),
    /// A failure from the caller-supplied iterator, propagated unchanged.
    #[error(transparent)]
    Iteration(E),
}

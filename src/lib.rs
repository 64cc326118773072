// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! An auto-incremented, insertion-ordered hash table: given a sequence of
//! distinct hashable keys, assigns each one a dense, zero-based integer
//! position and answers lookups in both directions (key → position,
//! position → key).
//!
//! The crate is organized leaves first:
//!
//! - [`category`] — hash/equality policy per key category.
//! - [`table`] — the open-addressed slot array.
//! - [`keystore`] — the insertion-ordered key sequence.
//! - [`generic`] — the iterable-based inserter.
//! - [`typed_array`] — the typed-array fast path.
//! - [`map`] — [`MutableMap`] and [`FrozenMap`], the public facade.
//! - [`error`] — the error taxonomy.
//! - [`serde_support`] — persisted-state encode/decode.
//!
//! ```
//! use autoindex::FrozenMap;
//!
//! let m = FrozenMap::try_from_iter(["a", "b", "c"].map(String::from)).unwrap();
//! assert_eq!(m.get("b"), Some(1));
//! assert_eq!(m.len(), 3);
//! assert_eq!(m.keys().cloned().collect::<Vec<_>>(), vec!["a", "b", "c"]);
//! ```

#![deny(missing_docs)]

pub mod category;
pub mod error;
mod generic;
mod keystore;
pub mod map;
pub mod serde_support;
mod table;
pub mod typed_array;

pub use category::{Category, Float16, Lookup, MapKey};
pub use error::{BuildError, HostInvalidValue, MapError};
pub use map::{FrozenMap, Items, MapLike, MutableMap};
pub use typed_array::{ArrayView, PrimitiveElement};

// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! The typed-array fast-path inserter.
//!
//! Recognizes a contiguous, immutable, one-dimensional buffer of a
//! primitive scalar category and inserts directly from it without lifting
//! elements into boxed values. The boundary this crate exposes for that
//! recognition step is [`ArrayView`]: a plain Rust slice already *is*
//! "one-dimensional and contiguous", and a shared borrow already *is*
//! "immutable" — so the common, in-process constructor ([`ArrayView::new`])
//! cannot fail. [`ArrayView::from_buffer`] is the richer entry point a
//! foreign-buffer boundary (NumPy's buffer protocol, an FFI struct carrying
//! stride/writable/byte-order flags) would call into, and is where
//! rejection of a malformed buffer actually happens.

use crate::category::{Category, Float16};
use crate::error::MapError;
use crate::keystore::KeyStore;
use crate::table::{Probe, Table};

/// A scalar type that may appear as the element type of a typed-array fast
/// path. Variable-width categories (byte strings, unicode strings) are not
/// covered here and always go through the generic path.
///
/// # Safety
/// Implementors must report a `CATEGORY` matching their actual in-memory
/// representation and widening rules; the fast path trusts `table_hash`
/// and `PartialEq` to be consistent with [`crate::category::MapKey`] for
/// the same underlying type.
pub unsafe trait PrimitiveElement: Copy + PartialEq + 'static {
    /// The category this scalar type represents.
    const CATEGORY: Category;
    /// Hash consistent with [`crate::category::MapKey::table_hash`] for
    /// the same value, so a raw array element and a boxed equivalent land
    /// in the same slot.
    fn table_hash(&self) -> u64;
}

macro_rules! impl_primitive_element {
    ($($t:ty => $cat:ident),* $(,)?) => {
        $(
            unsafe impl PrimitiveElement for $t {
                const CATEGORY: Category = Category::$cat;

                fn table_hash(&self) -> u64 {
                    crate::category::MapKey::table_hash(self)
                }
            }
        )*
    };
}

impl_primitive_element!(
    i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64,
    u8 => UInt8, u16 => UInt16, u32 => UInt32, u64 => UInt64,
    f32 => Float32, f64 => Float64,
);

unsafe impl PrimitiveElement for Float16 {
    const CATEGORY: Category = Category::Float16;

    fn table_hash(&self) -> u64 {
        crate::category::MapKey::table_hash(self)
    }
}

/// A validated, immutable, contiguous one-dimensional view over a
/// primitive buffer.
///
/// The map that borrows an `ArrayView` keeps it alive for as long as the
/// map exists; in this in-process rendition that is simply ordinary Rust
/// borrow-checking, since `ArrayView<'a, T>` carries the lifetime of the
/// buffer it was built from.
pub struct ArrayView<'a, T: PrimitiveElement> {
    data: &'a [T],
}

impl<'a, T: PrimitiveElement> ArrayView<'a, T> {
    /// Wrap an in-process Rust slice. Always valid: a `&[T]` is already
    /// one-dimensional, contiguous, and immutable by construction.
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    /// Validate a foreign buffer description the way a real FFI boundary
    /// would: reshaped/strided, writable, or non-native-byte-order arrays
    /// are rejected here rather than silently falling back to the generic
    /// path.
    ///
    /// # Safety
    /// `ptr` must be valid for `len` reads of `T`, and must remain valid
    /// and immutable for the lifetime `'a`.
    pub unsafe fn from_buffer(
        ptr: *const T,
        len: usize,
        element_stride: usize,
        writable: bool,
        native_byte_order: bool,
    ) -> Result<Self, MapError> {
        if writable || !native_byte_order || element_stride != std::mem::size_of::<T>() {
            log::warn!(
                "rejecting typed array for the fast path: writable={}, native_byte_order={}, element_stride={} (expected {})",
                writable,
                native_byte_order,
                element_stride,
                std::mem::size_of::<T>(),
            );
            return Err(MapError::UnsupportedArray);
        }
        Ok(Self {
            data: unsafe { std::slice::from_raw_parts(ptr, len) },
        })
    }

    /// Borrow the underlying contiguous buffer.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Build a table and borrowed key store directly from an `ArrayView`'s raw
/// buffer, hashing each element in its native representation. A repeated
/// element is a [`MapError::DuplicateKey`], the same error kind a repeated
/// key takes on any other insertion path.
///
/// Construction is atomic: on the first duplicate, no map is produced,
/// even though a prefix of the buffer was already probed into the scratch
/// table.
pub fn build_from_array<'a, T>(view: ArrayView<'a, T>) -> Result<(Table, KeyStore<'a, T>), MapError>
where
    T: PrimitiveElement + Clone,
{
    // Pre-size for the whole buffer up front rather than growing one
    // element at a time: the element count is known, so the capacity
    // that keeps the final load factor at or under the threshold can be
    // computed directly.
    let required = (view.len() as f64 / crate::table::DEFAULT_LOAD_FACTOR).ceil() as usize;
    let mut table = Table::with_capacity(required.max(1));
    for (position, element) in view.as_slice().iter().enumerate() {
        let hash = element.table_hash();
        match table.probe(hash, |p| view.as_slice()[p] == *element) {
            Probe::Found(_) => return Err(MapError::DuplicateKey),
            Probe::Vacant(slot_index) => table.occupy(slot_index, position),
        }
    }
    Ok((table, KeyStore::borrowed(view.as_slice())))
}

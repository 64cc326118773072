// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! Concrete end-to-end scenarios covering construction, lookup, duplicate
//! rejection, and array-buffer validation.

use autoindex::typed_array::ArrayView;
use autoindex::{FrozenMap, MapError, MutableMap};

#[test]
fn s1_frozen_string_map() {
    let keys = ["a", "b", "c"].map(String::from);
    let m = FrozenMap::try_from_iter(keys.clone()).unwrap();

    assert_eq!(m.get("a"), Some(0));
    assert_eq!(m.get("b"), Some(1));
    assert_eq!(m.get("c"), Some(2));
    assert_eq!(m.len(), 3);

    let forward: Vec<_> = m.keys().cloned().collect();
    assert_eq!(forward, keys.to_vec());

    let reversed: Vec<_> = m.keys().rev().cloned().collect();
    assert_eq!(reversed, vec!["c".to_string(), "b".to_string(), "a".to_string()]);
}

#[test]
fn s2_frozen_int64_array_bool_and_float_lookup() {
    let data = [10i64, 20, 30, 40];
    let view = ArrayView::new(&data);
    let m = FrozenMap::from_array(view).unwrap();

    assert_eq!(m.get(&10i64), Some(0));
    assert_eq!(m.get(&40i64), Some(3));

    // `True` (numeric value 1) is not among {10, 20, 30, 40}: absent.
    assert_eq!(m.get(&true), None);
    assert_eq!(m.get(&1.0f64), None); // 1 is not a key.
}

#[test]
fn s3_frozen_int32_array_cross_representation_lookup() {
    let data = [1i32, 100, 300, 4000];
    let view = ArrayView::new(&data);
    let m = FrozenMap::from_array(view).unwrap();

    assert_eq!(m.get(&1i32), Some(0));
    assert_eq!(m.get(&true), Some(0)); // bool `true` == 1, matches key 1.
    assert_eq!(m.get(&1.0f64), Some(0)); // 1.0 is exactly 1.
    assert_eq!(m.get(&1.1f64), None); // not exactly representable as an integer.
}

#[test]
fn s4_duplicate_key_fails_whole_construction() {
    let err = MutableMap::try_from_iter(["a", "b", "a"].map(String::from)).unwrap_err();
    assert_eq!(err, MapError::DuplicateKey);

    let err = FrozenMap::try_from_iter(["a", "b", "a"].map(String::from)).unwrap_err();
    assert_eq!(err, MapError::DuplicateKey);
}

#[test]
fn s5_mutable_add_then_update_then_failed_update_is_atomic() {
    let mut m = MutableMap::new();
    m.add("x".to_string()).unwrap();
    m.update(["y".to_string(), "z".to_string()]).unwrap();

    let err = m.update(["w".to_string(), "x".to_string()]).unwrap_err();
    assert_eq!(err, MapError::DuplicateKey);

    let keys: Vec<_> = m.keys().cloned().collect();
    assert_eq!(keys, vec!["x".to_string(), "y".to_string(), "z".to_string()]);
}

#[test]
fn s6_reshaped_array_fails_as_unsupported_not_duplicate() {
    let data = [1i32, 2, 3, 4];
    // A reshape to 2x2 reports a non-unit element stride, the same
    // rejection path a strided/non-contiguous view takes.
    let result = unsafe {
        ArrayView::from_buffer(data.as_ptr(), 2, std::mem::size_of::<i32>() * 2, false, true)
    };
    let err = result.unwrap_err();
    assert_eq!(err, MapError::UnsupportedArray);
    assert_ne!(err, MapError::DuplicateKey);
}

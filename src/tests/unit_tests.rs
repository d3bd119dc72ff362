mod open_table {
    use std::collections::{BTreeSet, HashMap};
    use std::panic::{RefUnwindSafe, UnwindSafe};

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::OpenTable;

    static_assertions::assert_impl_all!(OpenTable<String, String>: Send, Sync, UnwindSafe, RefUnwindSafe);
    static_assertions::assert_not_impl_any!(OpenTable<String, *const String>: Send, Sync);
    static_assertions::assert_not_impl_any!(OpenTable<*const String, String>: Send, Sync);

    #[test]
    fn insert_get_remove() {
        let mut table: OpenTable<u64, u32> = OpenTable::new();
        assert_eq!(table.insert(1, 10), None);
        assert_eq!(table.insert(2, 20), None);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&1), Some(&10));
        assert_eq!(table.get(&2), Some(&20));
        assert_eq!(table.get(&3), None);
        assert!(table.contains(&1));
        assert!(!table.contains(&3));
        assert_eq!(table.remove(&1), Some(10));
        assert_eq!(table.len(), 1);
        assert!(!table.contains(&1));
        assert_eq!(table.get(&2), Some(&20));
    }

    #[test]
    fn overwrite_returns_previous() {
        let mut table: OpenTable<u64, u32> = OpenTable::new();
        assert_eq!(table.insert(1, 10), None);
        assert_eq!(table.insert(1, 11), Some(10));
        assert_eq!(table.insert(1, 12), Some(11));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&1), Some(&12));
    }

    #[test]
    fn borrowed_key_lookup() {
        let mut table: OpenTable<String, u32> = OpenTable::new();
        table.insert("hello".to_string(), 1);
        assert_eq!(table.get("hello"), Some(&1));
        assert!(table.contains("hello"));
        assert_eq!(table.get_mut("hello").map(|v| *v), Some(1));
        assert_eq!(table.remove("hello"), Some(1));
        assert_eq!(table.get("hello"), None);
    }

    #[test]
    fn put_with_empty_payload_removes() {
        let mut table: OpenTable<u64, u32> = OpenTable::new();
        assert_eq!(table.put(1, Some(10)), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.put(1, None), Some(10));
        assert_eq!(table.len(), 0);
        assert!(!table.contains(&1));
        // Removing an absent key through `put` is also a no-op.
        assert_eq!(table.put(1, None), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut table: OpenTable<u64, u32> = OpenTable::new();
        for k in 0..8 {
            table.insert(k, k as u32);
        }
        let capacity = table.capacity();
        let len = table.len();
        assert_eq!(table.remove(&100), None);
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.len(), len);
        for k in 0..8 {
            assert_eq!(table.get(&k), Some(&(k as u32)));
        }
    }

    #[test]
    fn capacity_selection() {
        assert_eq!(OpenTable::<u64, u32>::with_capacity(0).capacity(), 17);
        assert_eq!(OpenTable::<u64, u32>::with_capacity(8).capacity(), 17);
        assert_eq!(OpenTable::<u64, u32>::with_capacity(9).capacity(), 37);
        assert_eq!(OpenTable::<u64, u32>::with_capacity(1000).capacity(), 2729);
        assert_eq!(
            OpenTable::<u64, u32>::with_capacity(1_000_000_000).capacity(),
            179_669_557
        );
    }

    #[test]
    fn grow_and_shrink() {
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        for k in 0..1000 {
            table.insert(k, k);
            assert!(table.load_factor() < 0.5);
        }
        assert_eq!(table.capacity(), 2729);
        assert_eq!(table.len(), 1000);

        for k in 0..1000 {
            assert_eq!(table.remove(&k), Some(k));
            assert!(table.load_factor() >= 0.125 || table.capacity() == 17);
            assert!((table.tombstones() as f32) < 0.2 * table.capacity() as f32);
        }
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 17);
    }

    #[test]
    fn tombstone_purge_keeps_capacity() {
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        for k in 0..1000 {
            table.insert(k, k);
        }
        assert_eq!(table.capacity(), 2729);

        // 545 tombstones stay below a fifth of 2729 slots; the 546th crosses the
        // density threshold and compacts the table at the same capacity.
        for k in 0..545 {
            table.remove(&k);
        }
        assert_eq!(table.tombstones(), 545);
        table.remove(&545);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.capacity(), 2729);
        assert_eq!(table.len(), 454);
        for k in 546..1000 {
            assert_eq!(table.get(&k), Some(&k));
        }
    }

    #[test]
    fn insertion_reuses_tombstones() {
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        for k in 0..400 {
            table.insert(k, k);
        }
        for k in 0..100 {
            table.remove(&k);
        }
        assert_eq!(table.tombstones(), 100);
        let capacity = table.capacity();
        for k in 0..100 {
            assert_eq!(table.insert(k, k + 1), None);
        }
        // A reinserted key probes past a tombstone on its own path before reaching an
        // empty slot, so reclamation shrinks the tombstone count instead of letting
        // removals and reinsertions accumulate garbage.
        assert!(table.tombstones() < 100);
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.len(), 400);
        for k in 0..100 {
            assert_eq!(table.get(&k), Some(&(k + 1)));
        }
    }

    #[test]
    fn string_key_scenario() {
        let mut table: OpenTable<String, usize> = OpenTable::new();
        for i in 0..=1010 {
            table.insert(i.to_string(), i);
        }
        assert_eq!(table.len(), 1011);

        for i in 0..=162 {
            assert_eq!(table.remove(i.to_string().as_str()), Some(i));
        }
        assert_eq!(table.len(), 848);
        for i in 0..=162 {
            assert_eq!(table.get(i.to_string().as_str()), None);
            assert!(!table.contains(i.to_string().as_str()));
        }
        for i in 163..=1010 {
            assert_eq!(table.get(i.to_string().as_str()), Some(&i));
        }
    }

    #[test]
    fn rebuild_preserves_entries() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        let mut model: HashMap<u64, u64> = HashMap::new();
        for _ in 0..2048 {
            let key = rng.random_range(0..4096);
            let value = rng.random();
            assert_eq!(table.insert(key, value), model.insert(key, value));
        }

        // Growth happened several times on the way up; the live multiset must match.
        let entries: HashMap<u64, u64> = table.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(entries, model);

        let keys: Vec<u64> = model.keys().copied().collect();
        for key in keys {
            assert_eq!(table.remove(&key), model.remove(&key));
            assert_eq!(table.len(), model.len());
        }
        assert!(table.is_empty());
    }

    #[test]
    fn iteration_snapshot() {
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        for k in 0..100 {
            table.insert(k, k * 2);
        }
        assert_eq!(table.iter().count(), 100);
        assert_eq!(table.iter().len(), 100);

        let keys: BTreeSet<u64> = table.keys().copied().collect();
        assert_eq!(keys, (0..100).collect());
        for (key, value) in &table {
            assert_eq!(*value, *key * 2);
        }
    }

    #[test]
    fn owned_iteration() {
        let mut table: OpenTable<String, u64> = OpenTable::new();
        for k in 0..100_u64 {
            table.insert(k.to_string(), k);
        }
        let mut entries: Vec<(String, u64)> = table.into_iter().collect();
        entries.sort_by_key(|(_, v)| *v);
        assert_eq!(entries.len(), 100);
        for (i, (key, value)) in entries.iter().enumerate() {
            assert_eq!(*value, i as u64);
            assert_eq!(*key, i.to_string());
        }
    }

    #[test]
    fn from_iterator_and_extend() {
        let mut table: OpenTable<u64, u64> = (0..100_u64).map(|k| (k, k)).collect();
        assert_eq!(table.len(), 100);
        assert!(table.load_factor() < 0.5);

        table.extend((100..200_u64).map(|k| (k, k)));
        assert_eq!(table.len(), 200);
        for k in 0..200 {
            assert_eq!(table.get(&k), Some(&k));
        }
    }

    #[test]
    fn clone_is_independent() {
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        table.insert(1, 10);
        let mut cloned = table.clone();
        cloned.insert(2, 20);
        assert_eq!(table.len(), 1);
        assert_eq!(cloned.len(), 2);
        assert_eq!(cloned.get(&1), Some(&10));
    }

    #[test]
    fn clear_resets_capacity() {
        let mut table: OpenTable<u64, u64> = OpenTable::with_capacity(1000);
        for k in 0..1000 {
            table.insert(k, k);
        }
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 17);
        assert_eq!(table.tombstones(), 0);
        table.insert(1, 1);
        assert_eq!(table.get(&1), Some(&1));
    }

    #[test]
    fn debug_format() {
        let mut table: OpenTable<u64, u64> = OpenTable::new();
        assert_eq!(format!("{table:?}"), "{}");
        table.insert(1, 10);
        assert_eq!(format!("{table:?}"), "{1: 10}");
    }

    #[test]
    fn random_workload() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut table: OpenTable<u16, u32> = OpenTable::new();
        let mut model: HashMap<u16, u32> = HashMap::new();
        for _ in 0..16_384 {
            let key = rng.random_range(0..2048);
            match rng.random_range(0..3) {
                0 => {
                    let value = rng.random();
                    assert_eq!(table.insert(key, value), model.insert(key, value));
                }
                1 => {
                    assert_eq!(table.remove(&key), model.remove(&key));
                }
                _ => {
                    assert_eq!(table.get(&key), model.get(&key));
                }
            }
            assert_eq!(table.len(), model.len());
        }
        let entries: HashMap<u16, u32> = table.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(entries, model);
    }

    proptest! {
        #[cfg_attr(miri, ignore)]
        #[test]
        fn model_check(ops in proptest::collection::vec((0_u8..3, 0_u16..512), 1..1024)) {
            let mut table: OpenTable<u16, u32> = OpenTable::new();
            let mut model: HashMap<u16, u32> = HashMap::new();
            for (op, key) in ops {
                match op {
                    0 => {
                        let value = u32::from(key) + 1;
                        prop_assert_eq!(table.insert(key, value), model.insert(key, value));
                        prop_assert!(table.load_factor() < 0.5);
                    }
                    1 => {
                        prop_assert_eq!(table.remove(&key), model.remove(&key));
                        prop_assert!(table.load_factor() >= 0.125 || table.capacity() == 17);
                    }
                    _ => {
                        prop_assert_eq!(table.get(&key), model.get(&key));
                    }
                }
                prop_assert_eq!(table.len(), model.len());
                prop_assert!((table.tombstones() as f32) < 0.2 * table.capacity() as f32);
            }
            for (key, value) in &model {
                prop_assert_eq!(table.get(key), Some(value));
            }
        }
    }
}

mod sparse_matrix {
    use std::panic::{RefUnwindSafe, UnwindSafe};

    use proptest::prelude::*;

    use crate::sparse_matrix::{decode, encode, Error};
    use crate::SparseMatrix;

    static_assertions::assert_impl_all!(SparseMatrix: Send, Sync, UnwindSafe, RefUnwindSafe);
    static_assertions::assert_impl_all!(Error: std::error::Error, Send, Sync);

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(SparseMatrix::new(0, 3).unwrap_err(), Error::InvalidDimensions);
        assert_eq!(SparseMatrix::new(3, 0).unwrap_err(), Error::InvalidDimensions);
        assert_eq!(SparseMatrix::new(0, 0).unwrap_err(), Error::InvalidDimensions);
    }

    #[test]
    fn put_get_default_zero() {
        let mut matrix = SparseMatrix::new(3, 3).unwrap();
        assert_eq!(matrix.get(0, 0), Ok(0.0));
        matrix.put(0, 0, 1.5).unwrap();
        matrix.put(2, 1, -2.0).unwrap();
        assert_eq!(matrix.get(0, 0), Ok(1.5));
        assert_eq!(matrix.get(2, 1), Ok(-2.0));
        assert_eq!(matrix.get(1, 1), Ok(0.0));
        assert_eq!(matrix.non_zero_len(), 2);
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 3);
    }

    #[test]
    fn out_of_bounds() {
        let mut matrix = SparseMatrix::new(2, 3).unwrap();
        assert_eq!(
            matrix.get(2, 0),
            Err(Error::OutOfBounds { row: 2, col: 0, rows: 2, cols: 3 })
        );
        assert_eq!(
            matrix.put(0, 3, 1.0),
            Err(Error::OutOfBounds { row: 0, col: 3, rows: 2, cols: 3 })
        );
        assert_eq!(matrix.non_zero_len(), 0);
    }

    #[test]
    fn zero_write_removes_cell() {
        let mut matrix = SparseMatrix::new(3, 3).unwrap();
        matrix.put(1, 1, 4.0).unwrap();
        assert_eq!(matrix.non_zero_len(), 1);

        matrix.put(1, 1, 0.0).unwrap();
        assert_eq!(matrix.non_zero_len(), 0);
        assert_eq!(matrix.get(1, 1), Ok(0.0));

        // A zero write to an already-zero cell is a no-op.
        matrix.put(1, 1, 0.0).unwrap();
        assert_eq!(matrix.non_zero_len(), 0);
    }

    #[test]
    fn scalar() {
        let mut matrix = SparseMatrix::new(2, 2).unwrap();
        matrix.put(0, 0, 1.0).unwrap();
        matrix.put(1, 1, -3.0).unwrap();

        let doubled = matrix.scalar(2.0);
        assert_eq!(doubled.get(0, 0), Ok(2.0));
        assert_eq!(doubled.get(1, 1), Ok(-6.0));
        assert_eq!(doubled.non_zero_len(), 2);

        assert_eq!(matrix.scalar(0.0).non_zero_len(), 0);
    }

    #[test]
    fn add() {
        let mut left = SparseMatrix::new(2, 2).unwrap();
        let mut right = SparseMatrix::new(2, 2).unwrap();
        left.put(0, 0, 1.0).unwrap();
        left.put(0, 1, 2.0).unwrap();
        right.put(0, 0, 3.0).unwrap();
        right.put(1, 1, 4.0).unwrap();

        let sum = left.add(&right).unwrap();
        assert_eq!(sum.get(0, 0), Ok(4.0));
        assert_eq!(sum.get(0, 1), Ok(2.0));
        assert_eq!(sum.get(1, 1), Ok(4.0));
        assert_eq!(sum.non_zero_len(), 3);
    }

    #[test]
    fn add_cancellation_is_not_stored() {
        let mut left = SparseMatrix::new(2, 2).unwrap();
        let mut right = SparseMatrix::new(2, 2).unwrap();
        left.put(0, 0, 1.5).unwrap();
        right.put(0, 0, -1.5).unwrap();

        let sum = left.add(&right).unwrap();
        assert_eq!(sum.get(0, 0), Ok(0.0));
        assert_eq!(sum.non_zero_len(), 0);
    }

    #[test]
    fn add_dimension_mismatch() {
        let left = SparseMatrix::new(2, 2).unwrap();
        let right = SparseMatrix::new(2, 3).unwrap();
        assert_eq!(
            left.add(&right).unwrap_err(),
            Error::DimensionMismatch {
                left_rows: 2,
                left_cols: 2,
                right_rows: 2,
                right_cols: 3,
            }
        );
    }

    #[test]
    fn multiply() {
        // | 1 2 0 |   | 0 1 |   |  8 1 |
        // | 0 3 0 | * | 4 0 | = | 12 0 |
        //             | 0 0 |
        let mut left = SparseMatrix::new(2, 3).unwrap();
        let mut right = SparseMatrix::new(3, 2).unwrap();
        left.put(0, 0, 1.0).unwrap();
        left.put(0, 1, 2.0).unwrap();
        left.put(1, 1, 3.0).unwrap();
        right.put(0, 1, 1.0).unwrap();
        right.put(1, 0, 4.0).unwrap();

        let product = left.multiply(&right).unwrap();
        assert_eq!(product.rows(), 2);
        assert_eq!(product.cols(), 2);
        assert_eq!(
            product.to_dense(),
            vec![vec![8.0, 1.0], vec![12.0, 0.0]]
        );
        assert_eq!(product.non_zero_len(), 3);
    }

    #[test]
    fn multiply_dimension_mismatch() {
        let left = SparseMatrix::new(2, 3).unwrap();
        let right = SparseMatrix::new(2, 3).unwrap();
        assert!(left.multiply(&right).is_err());
    }

    #[test]
    fn non_zero_values() {
        let mut matrix = SparseMatrix::new(4, 4).unwrap();
        matrix.put(0, 0, 1.0).unwrap();
        matrix.put(1, 2, 2.0).unwrap();
        matrix.put(3, 3, 3.0).unwrap();

        let mut values = matrix.non_zero_values();
        values.sort_by(f32::total_cmp);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn large_coordinates() {
        let mut matrix = SparseMatrix::new(u32::MAX, u32::MAX).unwrap();
        matrix.put(u32::MAX - 1, 0, 1.0).unwrap();
        matrix.put(0, u32::MAX - 1, 2.0).unwrap();
        assert_eq!(matrix.get(u32::MAX - 1, 0), Ok(1.0));
        assert_eq!(matrix.get(0, u32::MAX - 1), Ok(2.0));
        assert_eq!(matrix.non_zero_len(), 2);
    }

    proptest! {
        #[cfg_attr(miri, ignore)]
        #[test]
        fn codec_round_trip(row in any::<u32>(), col in any::<u32>()) {
            prop_assert_eq!(decode(encode(row, col)), (row, col));
        }
    }
}

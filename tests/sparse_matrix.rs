//! Tests for the row-compressed sparse matrix: capacity ceilings, row zeroing,
//! compaction, and batched block access.

use rand::Rng;
use seqblas::{BlasError, ElementalMatrix, MatShape, SparseRowMatrix};

/// Random entries set within each row's capacity read back exactly.
#[test]
fn set_then_get_within_capacity() {
    let (n, cap) = (20, 4);
    let mut rng = rand::thread_rng();
    let mut a = SparseRowMatrix::new(n, n, cap);
    let mut expected = vec![vec![0.0; n]; n];
    for r in 0..n {
        let mut cols: Vec<usize> = Vec::new();
        while cols.len() < cap {
            let c = rng.gen_range(0..n);
            if !cols.contains(&c) {
                cols.push(c);
            }
        }
        for c in cols {
            let v: f64 = rng.r#gen::<f64>() + 0.5;
            a.set(r, c, v).unwrap();
            expected[r][c] = v;
        }
    }
    for r in 0..n {
        for c in 0..n {
            assert_eq!(a.get(r, c).unwrap(), expected[r][c]);
        }
        let cols = a.row_entries(r).unwrap().0;
        assert!(cols.windows(2).all(|w| w[0] < w[1]));
    }
    assert_eq!(a.nnz(), n * cap);
}

/// A full row rejects a new column with OutOfRange and the other rows keep
/// their data.
#[test]
fn capacity_is_a_hard_ceiling() {
    let mut a = SparseRowMatrix::new(3, 5, 2);
    a.set(0, 0, 1.0).unwrap();
    a.set(1, 1, 2.0).unwrap();
    a.set(1, 3, 3.0).unwrap();
    a.set(2, 4, 4.0).unwrap();
    let before = a.clone();
    let err = a.add(1, 2, 9.0).unwrap_err();
    assert!(matches!(err, BlasError::OutOfRange(_)));
    assert_eq!(a, before);
    // an existing column of the full row can still be updated
    a.add(1, 3, 1.0).unwrap();
    assert_eq!(a.get(1, 3).unwrap(), 4.0);
}

/// `zero_rows` leaves only the diagonal in each listed row.
#[test]
fn zero_rows_imposes_boundary_rows() {
    let n = 5;
    let mut a = SparseRowMatrix::new(n, n, 3);
    for i in 0..n {
        for j in i.saturating_sub(1)..(i + 2).min(n) {
            a.set(i, j, if i == j { 2.0 } else { -1.0 }).unwrap();
        }
    }
    a.zero_rows(&[0, n - 1], 1.0).unwrap();
    for &r in &[0, n - 1] {
        assert_eq!(a.get(r, r).unwrap(), 1.0);
        for c in (0..n).filter(|&c| c != r) {
            assert_eq!(a.get(r, c).unwrap(), 0.0);
        }
    }
    assert_eq!(a.get(2, 1).unwrap(), -1.0);
    assert!(a.zero_rows(&[n], 1.0).is_err());
}

/// Compaction keeps every value and exports tight offsets; the export agrees
/// with per-row access.
#[test]
fn compressed_export_matches_rows() {
    let mut a = SparseRowMatrix::with_row_capacities(3, 4, &[3, 1, 2]).unwrap();
    a.set(0, 3, 1.0).unwrap();
    a.set(0, 0, 2.0).unwrap();
    a.set(2, 1, 3.0).unwrap();
    let rows = a.compressed();
    assert_eq!(rows.offsets, vec![0, 2, 2, 3]);
    for r in 0..a.nrows() {
        assert_eq!(rows.row(r).unwrap(), a.row(r).unwrap());
    }
    assert_eq!(a.get(0, 3).unwrap(), 1.0);
    assert_eq!(a.ncols(), 4);
}

/// Batched block access is row-major over `rows × cols`.
#[test]
fn batched_block_access() {
    let mut a = SparseRowMatrix::new(3, 3, 3);
    a.set_values(&[0, 2], &[1, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    a.add_values(&[0], &[1], &[0.5]).unwrap();
    let block = a.get_values(&[0, 2], &[1, 2]).unwrap();
    assert_eq!(block, vec![1.5, 2.0, 3.0, 4.0]);
    assert!(matches!(
        a.set_values(&[0], &[0, 1], &[1.0]),
        Err(BlasError::InvalidArgument(_))
    ));
}

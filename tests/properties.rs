//! Property tests for representation round trips, arithmetic identities and
//! the pool capacity contract

mod common;

use common::{assert_allclose_f64, diagonally_dominant, seeded_rng};
use matx::dense::DenseMatrix;
use matx::pool::Pool;
use matx::sparse::SparseMatrix;
use proptest::prelude::*;

/// (rows, cols, row-major data) with roughly half the entries zero
fn sparse_ish_matrix(max_dim: usize) -> impl Strategy<Value = (usize, usize, Vec<f64>)> {
    (0..=max_dim, 0..=max_dim).prop_flat_map(|(rows, cols)| {
        let values = prop::collection::vec(
            prop_oneof![Just(0.0), -100.0f64..100.0],
            rows * cols,
        );
        (Just(rows), Just(cols), values)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sparse_round_trip((rows, cols, data) in sparse_ish_matrix(8)) {
        let pool = Pool::new();
        let dense = DenseMatrix::from_slice(&pool, rows, cols, &data).unwrap();
        let back = SparseMatrix::from_dense(&dense).to_dense();
        prop_assert_eq!(back, dense);
    }

    #[test]
    fn prop_transpose_involution((rows, cols, data) in sparse_ish_matrix(8)) {
        let pool = Pool::new();
        let dense = DenseMatrix::from_slice(&pool, rows, cols, &data).unwrap();
        prop_assert_eq!(dense.t().t(), dense.clone());

        let sparse = SparseMatrix::from_dense(&dense);
        prop_assert_eq!(sparse.t().t(), sparse.clone());
        prop_assert_eq!(sparse.t().to_dense(), dense.t());
    }

    #[test]
    fn prop_additive_inverse(
        (rows, cols, a) in sparse_ish_matrix(6),
        seed in 0u64..1000,
    ) {
        let pool = Pool::new();
        let mut rng = seeded_rng(seed);
        let a = DenseMatrix::from_slice(&pool, rows, cols, &a).unwrap();
        let b = DenseMatrix::random_uniform(&pool, rows, cols, -100.0, 100.0, &mut rng).unwrap();
        let back = a.add(&b).unwrap().sub(&b).unwrap();
        assert_allclose_f64(&back.to_vec(), &a.to_vec(), 0.0, 1e-6, "(a + b) - b");
    }

    #[test]
    fn prop_pool_capacity(rows in 0usize..40, cols in 0usize..40, dirty in any::<bool>()) {
        let pool = Pool::<f32>::new();
        if dirty {
            pool.release(DenseMatrix::filled(&pool, rows, cols, 7.0).unwrap()).unwrap();
        }
        let n = rows * cols;
        let m = pool.acquire(rows, cols);
        prop_assert_eq!(m.to_vec().len(), n);
        let cap = m.capacity();
        prop_assert!(cap >= n);
        prop_assert!((cap + 1).is_power_of_two());
        prop_assert!(n == 0 || cap / 2 < n, "capacity {} is not the smallest for {}", cap, n);
        drop(m);

        let zeroed = pool.acquire_empty(rows, cols);
        prop_assert!(zeroed.to_vec().iter().all(|&v| v == 0.0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_sparse_dense_equivalence(
        seed in 0u64..10_000,
        density_idx in 0usize..3,
        rows in 1usize..12,
        cols in 1usize..12,
    ) {
        let density = [0.05, 0.3, 0.8][density_idx];
        let pool = Pool::new();
        let mut rng = seeded_rng(seed);
        let a = SparseMatrix::random(&pool, rows, cols, density, &mut rng);
        let b = SparseMatrix::random(&pool, rows, cols, density, &mut rng);
        let (da, db) = (a.to_dense(), b.to_dense());

        let pairs = [
            (a.add(&b).unwrap(), da.add(&db).unwrap()),
            (a.sub(&b).unwrap(), da.sub(&db).unwrap()),
            (a.prod(&b).unwrap(), da.prod(&db).unwrap()),
            (a.maximum(&b).unwrap(), da.maximum(&db).unwrap()),
            (a.minimum(&b).unwrap(), da.minimum(&db).unwrap()),
        ];
        for (sparse, dense) in pairs {
            assert_allclose_f64(&sparse.to_vec(), &dense.to_vec(), 0.0, 1e-6, "sparse vs dense");
        }
    }

    #[test]
    fn prop_lu_and_inverse(seed in 0u64..10_000, n_idx in 0usize..3) {
        let n = [1, 3, 10][n_idx];
        let pool = Pool::new();
        let mut rng = seeded_rng(seed);
        let a = diagonally_dominant(&pool, n, &mut rng);

        let lu = a.lu().unwrap();
        let pa = lu.p.mul(&a).unwrap();
        let l_u = lu.l.mul(&lu.u).unwrap();
        assert_allclose_f64(&pa.to_vec(), &l_u.to_vec(), 0.0, 1e-5, "PA = LU");

        let product = a.mul(&a.inverse().unwrap()).unwrap();
        assert_allclose_f64(
            &product.to_vec(),
            &DenseMatrix::identity(&pool, n).unwrap().to_vec(),
            0.0,
            1e-4,
            "A A^-1 = I",
        );
    }
}

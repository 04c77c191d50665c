//! Common test utilities
#![allow(dead_code)]

use matx::dense::DenseMatrix;
use matx::pool::Pool;
use matx::sparse::SparseMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create a fresh f64 pool for a test
pub fn create_pool() -> Pool<f64> {
    Pool::new()
}

/// Deterministic RNG for fixtures
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Random dense matrix with a boosted diagonal, so it is well conditioned
pub fn diagonally_dominant(pool: &Pool<f64>, n: usize, rng: &mut StdRng) -> DenseMatrix<f64> {
    let mut data: Vec<f64> = (0..n * n).map(|_| rng.random_range(-1.0..1.0)).collect();
    for i in 0..n {
        data[i * n + i] += n as f64 + 1.0;
    }
    DenseMatrix::from_slice(pool, n, n, &data).unwrap()
}

/// The 7x6 CSR fixture with ten non-zeros
pub fn fixture_7x6(pool: &Pool<f64>) -> SparseMatrix<f64> {
    let mut data = vec![0.0; 42];
    for &(r, c, v) in &[
        (0, 0, 10.0),
        (0, 1, 20.0),
        (1, 1, 30.0),
        (1, 3, 4.0),
        (2, 2, 50.0),
        (2, 3, 60.0),
        (2, 4, 70.0),
        (3, 5, 80.0),
        (5, 2, 90.0),
        (6, 2, 100.0),
    ] {
        data[r * 6 + c] = v;
    }
    SparseMatrix::from_slice(pool, 7, 6, &data).unwrap()
}

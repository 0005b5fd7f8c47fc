//! Exact integer linear algebra (determinants, cofactors, adjugates).
//!
//! Cofactors of graph Laplacians grow combinatorially with the size of the
//! graph, so everything here is computed over arbitrary-precision integers
//! with fraction-free Gaussian elimination [1]. No floating-point values are
//! involved at any stage.
//!
//! # References
//! [1]  Bareiss, Erwin H. "Sylvester's identity and multistep
//!      integer-preserving Gaussian elimination." Mathematics of
//!      Computation 22.103 (1968): 565-578.
use ndarray::Array2;
use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Lifts an integer matrix to arbitrary precision.
pub fn to_bigint(m: &Array2<i64>) -> Array2<BigInt> {
    m.mapv(|x| BigInt::from(x))
}

/// Computes the determinant of a square matrix exactly using the Bareiss
/// algorithm. The determinant of a 0x0 matrix is 1.
pub fn determinant(m: &Array2<BigInt>) -> BigInt {
    let n = m.nrows();
    assert_eq!(n, m.ncols(), "determinant of a non-square matrix");
    if n == 0 {
        return BigInt::one();
    }

    let mut a = m.clone();
    let mut negate = false;
    let mut prev_pivot = BigInt::one();
    for k in 0..(n - 1) {
        if a[[k, k]].is_zero() {
            // Pivot: swap in a lower row with a nonzero entry in column k.
            match ((k + 1)..n).find(|&r| !a[[r, k]].is_zero()) {
                Some(r) => {
                    swap_rows(&mut a, k, r);
                    negate = !negate;
                }
                None => return BigInt::zero(),
            }
        }
        for i in (k + 1)..n {
            for j in (k + 1)..n {
                // Division is exact (Sylvester's identity).
                let num = &a[[i, j]] * &a[[k, k]] - &a[[i, k]] * &a[[k, j]];
                a[[i, j]] = num / &prev_pivot;
            }
        }
        prev_pivot = a[[k, k]].clone();
    }

    let det = a[[n - 1, n - 1]].clone();
    if negate {
        -det
    } else {
        det
    }
}

fn swap_rows(a: &mut Array2<BigInt>, r1: usize, r2: usize) {
    for j in 0..a.ncols() {
        let tmp = std::mem::take(&mut a[[r1, j]]);
        a[[r1, j]] = std::mem::replace(&mut a[[r2, j]], tmp);
    }
}

/// Returns the submatrix of `m` with row `row` and column `col` removed.
pub fn minor(m: &Array2<BigInt>, row: usize, col: usize) -> Array2<BigInt> {
    let (rows, cols) = m.dim();
    Array2::from_shape_fn((rows - 1, cols - 1), |(r, c)| {
        let src_r = if r >= row { r + 1 } else { r };
        let src_c = if c >= col { c + 1 } else { c };
        m[[src_r, src_c]].clone()
    })
}

/// The signed `(row, col)` cofactor of a square matrix.
pub fn cofactor(m: &Array2<BigInt>, row: usize, col: usize) -> BigInt {
    let det = determinant(&minor(m, row, col));
    if (row + col) % 2 == 0 {
        det
    } else {
        -det
    }
}

/// The classical adjugate (transpose of the cofactor matrix).
pub fn adjugate(m: &Array2<BigInt>) -> Array2<BigInt> {
    let n = m.nrows();
    assert_eq!(n, m.ncols(), "adjugate of a non-square matrix");
    if n == 1 {
        return Array2::from_elem((1, 1), BigInt::one());
    }
    Array2::from_shape_fn((n, n), |(i, j)| cofactor(m, j, i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn big(m: Array2<i64>) -> Array2<BigInt> {
        to_bigint(&m)
    }

    #[test]
    fn determinant_small() {
        assert_eq!(determinant(&Array2::<BigInt>::zeros((0, 0))), BigInt::one());
        assert_eq!(determinant(&big(arr2(&[[7]]))), BigInt::from(7));
        assert_eq!(determinant(&big(arr2(&[[1, 2], [3, 4]]))), BigInt::from(-2));
        assert_eq!(
            determinant(&big(arr2(&[[2, 0, 1], [1, 3, 2], [1, 1, 1]]))),
            BigInt::from(0)
        );
        assert_eq!(
            determinant(&big(arr2(&[[6, 1, 1], [4, -2, 5], [2, 8, 7]]))),
            BigInt::from(-306)
        );
    }

    #[test]
    fn determinant_needs_pivot() {
        // Leading zero forces a row swap (and a sign flip).
        assert_eq!(determinant(&big(arr2(&[[0, 1], [1, 0]]))), BigInt::from(-1));
        assert_eq!(
            determinant(&big(arr2(&[[0, 2, 1], [3, 0, 0], [0, 1, 4]]))),
            BigInt::from(-21)
        );
    }

    #[test]
    fn determinant_singular_column() {
        assert_eq!(
            determinant(&big(arr2(&[[0, 1, 2], [0, 3, 4], [0, 5, 6]]))),
            BigInt::zero()
        );
    }

    #[test]
    fn determinant_exceeds_i64() {
        // diag(2^40, 2^40) has determinant 2^80.
        let p = 1i64 << 40;
        let det = determinant(&big(arr2(&[[p, 0], [0, p]])));
        assert_eq!(det, BigInt::one() << 80);
    }

    #[test]
    fn minor_removes_row_and_col() {
        let m = big(arr2(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]));
        assert_eq!(minor(&m, 1, 0), big(arr2(&[[2, 3], [8, 9]])));
        assert_eq!(minor(&m, 2, 2), big(arr2(&[[1, 2], [4, 5]])));
    }

    #[test]
    fn adjugate_2x2() {
        let m = big(arr2(&[[1, 2], [3, 4]]));
        assert_eq!(adjugate(&m), big(arr2(&[[4, -2], [-3, 1]])));
    }

    #[test]
    fn adjugate_times_matrix_is_det_identity() {
        let m = big(arr2(&[[6, 1, 1], [4, -2, 5], [2, 8, 7]]));
        let adj = adjugate(&m);
        let det = determinant(&m);
        for i in 0..3 {
            for j in 0..3 {
                let entry: BigInt = (0..3).map(|k| &adj[[i, k]] * &m[[k, j]]).sum();
                let expected = if i == j { det.clone() } else { BigInt::zero() };
                assert_eq!(entry, expected);
            }
        }
    }

    #[test]
    fn adjugate_1x1() {
        assert_eq!(adjugate(&big(arr2(&[[0]]))), big(arr2(&[[1]])));
    }
}

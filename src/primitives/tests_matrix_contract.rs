// Algebraic identities the least-squares solver relies on.
//
// References:
//   - Golub & Van Loan (2013) "Matrix Computations"

use super::*;

/// Transpose involution: (A^T)^T = A
#[test]
fn contract_transpose_involution() {
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let att = a.transpose().transpose();
    assert_eq!(att, a, "(A^T)^T != A");
}

/// Gram matrix X^T X is symmetric.
#[test]
fn contract_gram_matrix_symmetric() {
    let x = Matrix::from_vec(4, 3, vec![1.0, 0.0, 2.0, 1.0, 1.0, 0.5, 1.0, 0.0, -1.0, 1.0, 1.0, 3.0])
        .expect("valid");
    let g = x.transpose().matmul(&x).expect("compatible dims");
    for i in 0..3 {
        for j in 0..3 {
            assert!(
                (g.get(i, j) - g.get(j, i)).abs() < 1e-12,
                "X^T X not symmetric at [{i},{j}]"
            );
        }
    }
}

/// Solving A x = A v recovers v for a positive definite A.
#[test]
fn contract_cholesky_recovers_solution() {
    let x = Matrix::from_vec(5, 2, vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0])
        .expect("valid");
    let g = x.transpose().matmul(&x).expect("compatible dims");
    let v = [2.5, -0.75];
    let b = g.matvec(&v).expect("compatible dims");
    let solved = g.cholesky_solve(&b).expect("Gram matrix of full-rank X is SPD");
    assert!((solved[0] - v[0]).abs() < 1e-10);
    assert!((solved[1] - v[1]).abs() < 1e-10);
}

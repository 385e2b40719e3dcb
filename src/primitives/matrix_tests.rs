pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_from_rows() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
        .expect("rows have equal length");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row(2), &[5.0, 6.0]);
}

#[test]
fn test_from_rows_ragged() {
    let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    assert!(result.is_err());
}

#[test]
fn test_zeros_and_set() {
    let mut m = Matrix::zeros(2, 2);
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
    m.set(1, 0, 7.5);
    assert!((m.get(1, 0) - 7.5).abs() < 1e-12);
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 1) - 4.0).abs() < 1e-12);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-12);
}

#[test]
fn test_matmul() {
    let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("2x2");
    let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).expect("2x2");
    let c = a.matmul(&b).expect("compatible dims");
    assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_matvec() {
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2x3");
    let y = a.matvec(&[1.0, 0.0, -1.0]).expect("compatible dims");
    assert_eq!(y, vec![-2.0, -2.0]);
    assert!(a.matvec(&[1.0]).is_err());
}

#[test]
fn test_cholesky_solve() {
    // [4 2; 2 3] x = [2; 1]  =>  x = [0.5, 0]
    let a = Matrix::from_vec(2, 2, vec![4.0, 2.0, 2.0, 3.0]).expect("2x2");
    let x = a.cholesky_solve(&[2.0, 1.0]).expect("positive definite");
    assert!((x[0] - 0.5).abs() < 1e-12);
    assert!(x[1].abs() < 1e-12);
}

#[test]
fn test_cholesky_solve_3x3() {
    let a = Matrix::from_vec(3, 3, vec![4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0])
        .expect("3x3");
    let expected = [1.0, -2.0, 3.0];
    let b = a.matvec(&expected).expect("compatible dims");
    let x = a.cholesky_solve(&b).expect("positive definite");
    for (got, want) in x.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn test_cholesky_rejects_singular() {
    // Rank-one matrix
    let a = Matrix::from_vec(2, 2, vec![1.0, 1.0, 1.0, 1.0]).expect("2x2");
    assert_eq!(
        a.cholesky_solve(&[1.0, 1.0]),
        Err("Matrix is not positive definite")
    );
}

#[test]
fn test_cholesky_rejects_non_square() {
    let a = Matrix::zeros(2, 3);
    assert!(a.cholesky_solve(&[1.0, 1.0]).is_err());
}

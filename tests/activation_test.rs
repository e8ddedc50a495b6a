use digit_mlp::activation_functions::{ActivationFunction, ReLU, Softmax};
use digit_mlp::tensor::Tensor;
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn tensor(data: Vec<f64>, rows: usize, cols: usize) -> Tensor {
    Tensor::new(data, rows, cols).unwrap()
}

#[test]
fn test_relu_has_no_negative_entries() {
    let mut rng = Pcg64::seed_from_u64(1);
    let z = Tensor::random_normal(20, 30, 3.0, &mut rng);
    let a = ReLU.activate(&z);

    assert!(a.data().iter().all(|&x| x >= 0.0));
    for (&x, &y) in z.data().iter().zip(a.data()) {
        assert_eq!(y, x.max(0.0));
    }
}

#[test]
fn test_relu_derivative_is_one_exactly_where_positive() {
    let z = tensor(vec![-2.0, -1e-12, 0.0, 1e-12, 3.0, -0.0], 2, 3);
    let d = ReLU.derivative(&z);
    assert_eq!(d.data(), &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
}

#[test]
fn test_softmax_rows_are_distributions() {
    let mut rng = Pcg64::seed_from_u64(2);
    let z = Tensor::random_normal(25, 10, 5.0, &mut rng);
    let a = Softmax.activate(&z);

    assert_eq!(a.dims(), (25, 10));
    for row in a.iter_rows() {
        let sum: f64 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
}

#[test]
fn test_softmax_is_stable_for_large_scores() {
    let z = tensor(vec![1000.0, 1001.0, 1002.0, -1000.0, 0.0, 1000.0], 2, 3);
    let a = Softmax.activate(&z);

    assert!(a.data().iter().all(|p| p.is_finite()));
    // shifting a row doesn't change its softmax
    let shifted = Softmax.activate(&tensor(vec![0.0, 1.0, 2.0], 1, 3));
    for (x, y) in a.row(0).iter().zip(shifted.row(0)) {
        assert!((x - y).abs() < 1e-12);
    }
    assert!((a.get(1, 2).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_softmax_uniform_row() {
    let a = Softmax.activate(&Tensor::zeros(1, 4));
    assert_eq!(a.data(), &[0.25, 0.25, 0.25, 0.25]);
}

#[test]
fn test_softmax_derivative_diagonal() {
    let a = Softmax.derivative(&Tensor::zeros(1, 2));
    assert_eq!(a.data(), &[0.25, 0.25]);
}

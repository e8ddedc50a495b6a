use digit_mlp::helpers::accuracy;
use digit_mlp::mnist_data::one_hot;
use digit_mlp::tensor::Tensor;

#[test]
fn test_accuracy_two_of_three() {
    let targets = one_hot(&[3, 1, 5], 10).unwrap();
    let accuracy = accuracy(&[3, 1, 4], &targets).unwrap();
    assert!((accuracy - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_accuracy_bounds() {
    let targets = one_hot(&[0, 1], 2).unwrap();
    assert_eq!(accuracy(&[0, 1], &targets).unwrap(), 1.0);
    assert_eq!(accuracy(&[1, 0], &targets).unwrap(), 0.0);
    assert_eq!(accuracy(&[], &Tensor::zeros(0, 10)).unwrap(), 0.0);
}

#[test]
fn test_accuracy_length_mismatch() {
    let targets = one_hot(&[0, 1], 2).unwrap();
    assert!(accuracy(&[0], &targets).is_err());
}

/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Keeps log() finite when a predicted probability underflows to zero.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// L = -sum(expected[i] * log(predicted[i] + eps))
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Gradient of softmax + cross-entropy w.r.t. the logits: `predicted - expected`.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}

/// One-hot encodes a class index into a vector of length `n_classes`.
pub fn one_hot(label: usize, n_classes: usize) -> Vec<f64> {
    let mut v = vec![0.0; n_classes];
    if let Some(slot) = v.get_mut(label) {
        *slot = 1.0;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_prediction_has_low_loss() {
        let good = CrossEntropyLoss::loss(&[0.98, 0.01, 0.01], &one_hot(0, 3));
        let bad = CrossEntropyLoss::loss(&[0.01, 0.98, 0.01], &one_hot(0, 3));
        assert!(good < bad);
        assert!(good > 0.0);
    }

    #[test]
    fn derivative_is_prediction_minus_target() {
        let g = CrossEntropyLoss::derivative(&[0.2, 0.5, 0.3], &one_hot(1, 3));
        assert_eq!(g, vec![0.2, -0.5, 0.3]);
    }
}

use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// No activation; the layer is a plain affine map.
    Identity,
    #[serde(rename = "relu")]
    ReLU,
    Sigmoid,
    Tanh,
    /// Vector-valued; applied across the whole row by `apply`.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. Softmax has no element-wise form and never
    /// reaches here: `apply` routes it to `softmax`.
    pub(crate) fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax has no element-wise form; call apply()")
            }
        }
    }

    /// Element-wise derivative at the pre-activation value.
    ///
    /// Softmax is only ever paired with cross-entropy, whose gradient is
    /// already taken w.r.t. the logits, so it passes the delta through.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::Softmax => 1.0,
        }
    }

    /// Applies the activation to every row of `z`.
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => Matrix {
                rows: z.rows,
                cols: z.cols,
                data: z.data.iter().map(|row| softmax(row)).collect(),
            },
            other => z.map(|x| other.function(x)),
        }
    }

    /// Whether weights feeding this activation should use He init.
    pub fn prefers_he_init(&self) -> bool {
        matches!(self, ActivationFunction::ReLU)
    }
}

/// Numerically stable softmax (shifted by the row maximum).
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_is_a_distribution() {
        let p = softmax(&[1000.0, 1001.0, -5.0]);
        assert!(p.iter().all(|&x| x >= 0.0));
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[1] > p[0]);
    }

    #[test]
    fn apply_routes_softmax_over_each_row() {
        let z = Matrix::from_data(vec![vec![0.0, 0.0], vec![2.0, 0.0]]);
        let a = ActivationFunction::Softmax.apply(&z);
        assert_eq!(a.data[0], vec![0.5, 0.5]);
        assert!(a.data[1][0] > a.data[1][1]);
        assert!((a.data[1].iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn relu_derivative_is_a_step() {
        let relu = ActivationFunction::ReLU;
        assert_eq!(relu.derivative(-0.5), 0.0);
        assert_eq!(relu.derivative(0.5), 1.0);
    }

    #[test]
    fn identity_round_trips_through_yaml_name() {
        let parsed: ActivationFunction = serde_json::from_str("\"identity\"").unwrap();
        assert_eq!(parsed, ActivationFunction::Identity);
    }
}

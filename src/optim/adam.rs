use crate::{math::matrix::Matrix, layers::dense::Layer};

/// Adam with bias-corrected first and second moment estimates.
///
/// Moment buffers are allocated lazily on the first step, one pair per layer,
/// so the same optimizer value can be compiled before the network is trained.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    // (weights, biases) moments per layer
    m: Vec<(Matrix, Matrix)>,
    v: Vec<(Matrix, Matrix)>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Advances the shared timestep. Call once per mini-batch, before the
    /// per-layer `step` calls of that batch.
    pub fn begin_step(&mut self) {
        self.t += 1;
    }

    pub fn step(&mut self, index: usize, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) {
        while self.m.len() <= index {
            let (w, b) = (&layer.weights, &layer.biases);
            self.m.push((Matrix::zeros(w.rows, w.cols), Matrix::zeros(b.rows, b.cols)));
            self.v.push((Matrix::zeros(w.rows, w.cols), Matrix::zeros(b.rows, b.cols)));
        }

        let t = self.t.max(1);
        let (m_w, m_b) = &mut self.m[index];
        let (v_w, v_b) = &mut self.v[index];
        let hp = Hyper {
            lr: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
            correction1: 1.0 - self.beta1.powi(t),
            correction2: 1.0 - self.beta2.powi(t),
        };

        hp.update(&mut layer.weights, weights_grad, m_w, v_w);
        hp.update(&mut layer.biases, biases_grad, m_b, v_b);
    }
}

struct Hyper {
    lr: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    correction1: f64,
    correction2: f64,
}

impl Hyper {
    fn update(&self, param: &mut Matrix, grad: &Matrix, m: &mut Matrix, v: &mut Matrix) {
        for i in 0..param.rows {
            for j in 0..param.cols {
                let g = grad.data[i][j];
                m.data[i][j] = self.beta1 * m.data[i][j] + (1.0 - self.beta1) * g;
                v.data[i][j] = self.beta2 * v.data[i][j] + (1.0 - self.beta2) * g * g;
                let m_hat = m.data[i][j] / self.correction1;
                let v_hat = v.data[i][j] / self.correction2;
                param.data[i][j] -= self.lr * m_hat / (v_hat.sqrt() + self.epsilon);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_step_moves_each_weight_by_learning_rate() {
        let mut layer = Layer::new(2, 1, ActivationFunction::Identity, &mut StdRng::seed_from_u64(3));
        let before = layer.weights.clone();
        let mut adam = Adam::new(0.01);
        adam.begin_step();
        adam.step(0, &mut layer, &Matrix::row(vec![4.0, -0.5]), &Matrix::row(vec![1.0, 1.0]));

        // With bias correction the first update is lr * sign(g).
        assert!((before.data[0][0] - layer.weights.data[0][0] - 0.01).abs() < 1e-6);
        assert!((before.data[0][1] - layer.weights.data[0][1] + 0.01).abs() < 1e-6);
    }
}

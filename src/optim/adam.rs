use crate::{math::matrix::Matrix, layers::dense::Layer, optim::Optimizer};

/// First and second moment estimates for one layer.
struct Moments {
    step: i32,
    m_w: Matrix,
    v_w: Matrix,
    m_b: Matrix,
    v_b: Matrix,
}

impl Moments {
    fn for_layer(layer: &Layer) -> Moments {
        let (wr, wc) = (layer.weights.rows, layer.weights.cols);
        let (br, bc) = (layer.biases.rows, layer.biases.cols);
        Moments {
            step: 0,
            m_w: Matrix::zeros(wr, wc),
            v_w: Matrix::zeros(wr, wc),
            m_b: Matrix::zeros(br, bc),
            v_b: Matrix::zeros(br, bc),
        }
    }
}

/// Adam with bias correction folded into the step size.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    moments: Vec<Option<Moments>>,
}

impl Adam {
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Adam {
        Adam { learning_rate, beta1, beta2, epsilon, moments: Vec::new() }
    }

    fn update(beta1: f64, beta2: f64, m: &mut Matrix, v: &mut Matrix, grad: &Matrix) {
        *m = &m.scale(beta1) + &grad.scale(1.0 - beta1);
        *v = &v.scale(beta2) + &grad.map(|g| g * g).scale(1.0 - beta2);
    }
}

impl Optimizer for Adam {
    fn step(&mut self, index: usize, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) {
        if self.moments.len() <= index {
            self.moments.resize_with(index + 1, || None);
        }
        let state = self.moments[index].get_or_insert_with(|| Moments::for_layer(layer));
        state.step += 1;

        Adam::update(self.beta1, self.beta2, &mut state.m_w, &mut state.v_w, weights_grad);
        Adam::update(self.beta1, self.beta2, &mut state.m_b, &mut state.v_b, biases_grad);

        let correction = (1.0 - self.beta2.powi(state.step)).sqrt() / (1.0 - self.beta1.powi(state.step));
        let lr_t = self.learning_rate * correction;
        let eps = self.epsilon;

        let step_of = |m: &Matrix, v: &Matrix| {
            let denom = v.map(|x| 1.0 / (x.sqrt() + eps));
            m.hadamard(&denom).scale(lr_t)
        };
        let w_step = step_of(&state.m_w, &state.v_w);
        let b_step = step_of(&state.m_b, &state.v_b);
        layer.apply_update(&w_step, &b_step);
    }
}

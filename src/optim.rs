//! Adam optimizer.
//!
//! Moment estimates live outside the model; the training loop owns the
//! `Adam` state and reuses it across steps without allocating.

use crate::{Error, Gradients, Mlp, Result};

/// Adam hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub eps: f32,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-7,
        }
    }
}

impl AdamConfig {
    pub fn validate(&self) -> Result<()> {
        let Self {
            learning_rate,
            beta1,
            beta2,
            eps,
        } = *self;

        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {learning_rate}"
            )));
        }
        if !(beta1.is_finite() && (0.0..1.0).contains(&beta1)) {
            return Err(Error::InvalidConfig(format!(
                "adam beta1 must be finite and in [0,1), got {beta1}"
            )));
        }
        if !(beta2.is_finite() && (0.0..1.0).contains(&beta2)) {
            return Err(Error::InvalidConfig(format!(
                "adam beta2 must be finite and in [0,1), got {beta2}"
            )));
        }
        if !(eps.is_finite() && eps > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "adam eps must be finite and > 0, got {eps}"
            )));
        }
        Ok(())
    }
}

/// Bias-corrected Adam state for one model.
#[derive(Debug, Clone)]
pub struct Adam {
    cfg: AdamConfig,
    t: u64,
    beta1_pow: f32,
    beta2_pow: f32,
    m_weights: Vec<Vec<f32>>,
    m_biases: Vec<Vec<f32>>,
    v_weights: Vec<Vec<f32>>,
    v_biases: Vec<Vec<f32>>,
}

impl Adam {
    /// Allocate zeroed moment buffers shaped like `model`'s parameters.
    pub fn new(cfg: AdamConfig, model: &Mlp) -> Result<Self> {
        cfg.validate()?;

        let (m_weights, m_biases) = zeros_like_params(model);
        let (v_weights, v_biases) = zeros_like_params(model);
        Ok(Self {
            cfg,
            t: 0,
            beta1_pow: 1.0,
            beta2_pow: 1.0,
            m_weights,
            m_biases,
            v_weights,
            v_biases,
        })
    }

    /// Number of steps taken so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.t
    }

    /// Apply one optimizer step.
    ///
    /// `grads` is overwritten with the Adam update direction.
    pub fn step(&mut self, model: &mut Mlp, grads: &mut Gradients) {
        let AdamConfig {
            learning_rate,
            beta1,
            beta2,
            eps,
        } = self.cfg;

        self.t += 1;
        self.beta1_pow *= beta1;
        self.beta2_pow *= beta2;

        let corr1 = 1.0 - self.beta1_pow;
        let corr2 = 1.0 - self.beta2_pow;

        for layer_idx in 0..model.num_layers() {
            adam_update(
                grads.d_weights_mut(layer_idx),
                &mut self.m_weights[layer_idx],
                &mut self.v_weights[layer_idx],
                beta1,
                beta2,
                eps,
                corr1,
                corr2,
            );
            adam_update(
                grads.d_biases_mut(layer_idx),
                &mut self.m_biases[layer_idx],
                &mut self.v_biases[layer_idx],
                beta1,
                beta2,
                eps,
                corr1,
                corr2,
            );
        }

        model.apply_update(grads, learning_rate);
    }
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn adam_update(
    grads: &mut [f32],
    m: &mut [f32],
    v: &mut [f32],
    beta1: f32,
    beta2: f32,
    eps: f32,
    corr1: f32,
    corr2: f32,
) {
    debug_assert_eq!(grads.len(), m.len());
    debug_assert_eq!(grads.len(), v.len());

    for i in 0..grads.len() {
        let g = grads[i];
        m[i] = beta1 * m[i] + (1.0 - beta1) * g;
        v[i] = beta2 * v[i] + (1.0 - beta2) * (g * g);

        let m_hat = m[i] / corr1;
        let v_hat = v[i] / corr2;
        grads[i] = m_hat / (v_hat.sqrt() + eps);
    }
}

fn zeros_like_params(model: &Mlp) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
    let ws = model.layers().iter().map(|l| vec![0.0; l.weights().len()]).collect();
    let bs = model.layers().iter().map(|l| vec![0.0; l.biases().len()]).collect();
    (ws, bs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Activation, Layer};

    fn unit_model() -> Mlp {
        let layer = Layer::from_parts(1, 1, Activation::Identity, vec![1.0], vec![1.0]).unwrap();
        Mlp::from_layers(vec![layer]).unwrap()
    }

    #[test]
    fn validation_rejects_bad_hyperparams() {
        let base = AdamConfig::default();
        assert!(base.validate().is_ok());
        assert!(
            AdamConfig {
                learning_rate: 0.0,
                ..base
            }
            .validate()
            .is_err()
        );
        assert!(AdamConfig { beta1: 1.0, ..base }.validate().is_err());
        assert!(AdamConfig { beta2: -0.1, ..base }.validate().is_err());
        assert!(AdamConfig { eps: 0.0, ..base }.validate().is_err());
    }

    #[test]
    fn first_step_matches_expected_direction_for_unit_grad() {
        let mut mlp = unit_model();
        let mut grads = mlp.gradients();
        grads.d_weights_mut(0)[0] = 1.0;
        grads.d_biases_mut(0)[0] = 1.0;

        let mut opt = Adam::new(
            AdamConfig {
                learning_rate: 0.1,
                beta1: 0.9,
                beta2: 0.999,
                eps: 1.0,
            },
            &mlp,
        )
        .unwrap();
        opt.step(&mut mlp, &mut grads);

        // With eps=1.0 and unit grad, the first bias-corrected step is 1/(1+eps) = 0.5.
        let layer = mlp.layer(0).unwrap();
        assert!((layer.weights()[0] - (1.0 - 0.1 * 0.5)).abs() < 1e-6);
        assert!((layer.biases()[0] - (1.0 - 0.1 * 0.5)).abs() < 1e-6);
        assert_eq!(opt.steps(), 1);
    }

    #[test]
    fn step_size_is_scale_invariant() {
        let mut small = unit_model();
        let mut large = unit_model();

        let mut g_small = small.gradients();
        g_small.d_weights_mut(0)[0] = 1e-3;
        let mut g_large = large.gradients();
        g_large.d_weights_mut(0)[0] = 1e3;

        let cfg = AdamConfig::default();
        Adam::new(cfg, &small).unwrap().step(&mut small, &mut g_small);
        Adam::new(cfg, &large).unwrap().step(&mut large, &mut g_large);

        let dw_small = 1.0 - small.layer(0).unwrap().weights()[0];
        let dw_large = 1.0 - large.layer(0).unwrap().weights()[0];
        assert!((dw_small - dw_large).abs() < 1e-5);
    }
}

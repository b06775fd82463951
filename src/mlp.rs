use crate::{Error, Layer, Result};

/// A dense feed-forward network.
#[derive(Debug, Clone)]
pub struct Mlp {
    layers: Vec<Layer>,
}

/// Reusable buffers for `Mlp::forward`.
///
/// The output of the most recent forward pass lives inside `Scratch`.
#[derive(Debug, Clone)]
pub struct Scratch {
    layer_outputs: Vec<Vec<f32>>,
}

/// Parameter gradients for an `Mlp`.
///
/// `Mlp::backward` overwrites them per sample; `accumulate_scaled` sums them
/// across a batch.
#[derive(Debug, Clone)]
pub struct Gradients {
    d_weights: Vec<Vec<f32>>,
    d_biases: Vec<Vec<f32>>,

    // Gradient w.r.t each layer output, including the final output.
    // The loss writes into the last entry; backprop walks the rest.
    d_layer_outputs: Vec<Vec<f32>>,

    d_input: Vec<f32>,
}

impl Mlp {
    /// Assemble a model from layers.
    ///
    /// Fails if there are no layers or adjacent dimensions do not chain.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::InvalidConfig(
                "mlp must have at least one layer".to_owned(),
            ));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].out_dim() != pair[1].in_dim() {
                return Err(Error::InvalidConfig(format!(
                    "layer {} in_dim {} does not match previous out_dim {}",
                    i + 1,
                    pair[1].in_dim(),
                    pair[0].out_dim()
                )));
            }
        }
        Ok(Self { layers })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers[0].in_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].out_dim()
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    pub fn scratch(&self) -> Scratch {
        Scratch::new(self)
    }

    pub fn gradients(&self) -> Gradients {
        Gradients::new(self)
    }

    /// Forward pass for a single sample.
    ///
    /// Writes intermediate activations into `scratch` and returns the final output slice.
    ///
    /// Panics if `input.len() != self.input_dim()` or `scratch` was built for a
    /// different model.
    pub fn forward<'a>(&self, input: &[f32], scratch: &'a mut Scratch) -> &'a [f32] {
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match model input_dim {}",
            input.len(),
            self.input_dim()
        );
        assert_eq!(
            scratch.layer_outputs.len(),
            self.layers.len(),
            "scratch has {} layer outputs, model has {} layers",
            scratch.layer_outputs.len(),
            self.layers.len()
        );

        for (idx, layer) in self.layers.iter().enumerate() {
            if idx == 0 {
                let out = &mut scratch.layer_outputs[0];
                assert_eq!(out.len(), layer.out_dim());
                layer.forward(input, out);
            } else {
                // Borrow the previous output immutably and the current output mutably.
                let (left, right) = scratch.layer_outputs.split_at_mut(idx);
                let prev = &left[idx - 1];
                let out = &mut right[0];
                assert_eq!(
                    out.len(),
                    layer.out_dim(),
                    "scratch layer {idx} output len {} does not match layer out_dim {}",
                    out.len(),
                    layer.out_dim()
                );
                layer.forward(prev, out);
            }
        }

        scratch.output()
    }

    /// Backward pass for a single sample.
    ///
    /// Call `forward` first with the same `input` and `scratch`, then write
    /// `dL/d(output)` into `grads.d_output_mut()`.
    ///
    /// Returns dL/d(input).
    pub fn backward<'a>(
        &self,
        input: &[f32],
        scratch: &Scratch,
        grads: &'a mut Gradients,
    ) -> &'a [f32] {
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match model input_dim {}",
            input.len(),
            self.input_dim()
        );
        assert_eq!(
            grads.d_weights.len(),
            self.layers.len(),
            "grads has {} d_weights entries, model has {} layers",
            grads.d_weights.len(),
            self.layers.len()
        );
        assert_eq!(scratch.layer_outputs.len(), self.layers.len());

        for idx in (0..self.layers.len()).rev() {
            let layer = &self.layers[idx];

            let layer_input: &[f32] = if idx == 0 {
                input
            } else {
                &scratch.layer_outputs[idx - 1]
            };
            let layer_output: &[f32] = &scratch.layer_outputs[idx];

            if idx == 0 {
                let d_outputs = &grads.d_layer_outputs[0];
                layer.backward(
                    layer_input,
                    layer_output,
                    d_outputs,
                    &mut grads.d_input,
                    &mut grads.d_weights[0],
                    &mut grads.d_biases[0],
                );
            } else {
                // The current layer's d_inputs become the previous layer's d_outputs.
                let (left, right) = grads.d_layer_outputs.split_at_mut(idx);
                let d_inputs_prev = &mut left[idx - 1];
                let d_outputs = &right[0];
                layer.backward(
                    layer_input,
                    layer_output,
                    d_outputs,
                    d_inputs_prev,
                    &mut grads.d_weights[idx],
                    &mut grads.d_biases[idx],
                );
            }
        }

        &grads.d_input
    }

    /// Applies `param -= lr * grad` to all layers.
    #[inline]
    pub fn apply_update(&mut self, grads: &Gradients, lr: f32) {
        assert_eq!(self.layers.len(), grads.d_weights.len());
        assert_eq!(self.layers.len(), grads.d_biases.len());

        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.apply_update(&grads.d_weights[i], &grads.d_biases[i], lr);
        }
    }

    /// Shape-checked, non-allocating single-sample inference.
    pub fn predict_one_into(
        &self,
        input: &[f32],
        scratch: &mut Scratch,
        out: &mut [f32],
    ) -> Result<()> {
        if input.len() != self.input_dim() {
            return Err(Error::InvalidShape(format!(
                "input len {} does not match model input_dim {}",
                input.len(),
                self.input_dim()
            )));
        }
        if out.len() != self.output_dim() {
            return Err(Error::InvalidShape(format!(
                "output len {} does not match model output_dim {}",
                out.len(),
                self.output_dim()
            )));
        }
        if !scratch.fits(self) {
            return Err(Error::InvalidConfig(
                "scratch was not built for this model".to_owned(),
            ));
        }

        let y = self.forward(input, scratch);
        out.copy_from_slice(y);
        Ok(())
    }
}

impl Scratch {
    pub fn new(mlp: &Mlp) -> Self {
        let layer_outputs = mlp
            .layers
            .iter()
            .map(|layer| vec![0.0; layer.out_dim()])
            .collect();
        Self { layer_outputs }
    }

    #[inline]
    pub fn output(&self) -> &[f32] {
        // `Mlp::from_layers` rejects empty models, so there is always a last layer.
        &self.layer_outputs[self.layer_outputs.len() - 1]
    }

    fn fits(&self, mlp: &Mlp) -> bool {
        self.layer_outputs.len() == mlp.layers.len()
            && self
                .layer_outputs
                .iter()
                .zip(&mlp.layers)
                .all(|(out, layer)| out.len() == layer.out_dim())
    }
}

impl Gradients {
    pub fn new(mlp: &Mlp) -> Self {
        let mut d_weights = Vec::with_capacity(mlp.layers.len());
        let mut d_biases = Vec::with_capacity(mlp.layers.len());
        let mut d_layer_outputs = Vec::with_capacity(mlp.layers.len());

        for layer in &mlp.layers {
            d_weights.push(vec![0.0; layer.in_dim() * layer.out_dim()]);
            d_biases.push(vec![0.0; layer.out_dim()]);
            d_layer_outputs.push(vec![0.0; layer.out_dim()]);
        }

        Self {
            d_weights,
            d_biases,
            d_layer_outputs,
            d_input: vec![0.0; mlp.input_dim()],
        }
    }

    /// Mutable view of the upstream gradient buffer for the final model output.
    #[inline]
    pub fn d_output_mut(&mut self) -> &mut [f32] {
        let last = self.d_layer_outputs.len() - 1;
        &mut self.d_layer_outputs[last]
    }

    #[inline]
    pub fn d_weights(&self, layer_idx: usize) -> &[f32] {
        &self.d_weights[layer_idx]
    }

    #[inline]
    pub fn d_biases(&self, layer_idx: usize) -> &[f32] {
        &self.d_biases[layer_idx]
    }

    #[inline]
    pub(crate) fn d_weights_mut(&mut self, layer_idx: usize) -> &mut [f32] {
        &mut self.d_weights[layer_idx]
    }

    #[inline]
    pub(crate) fn d_biases_mut(&mut self, layer_idx: usize) -> &mut [f32] {
        &mut self.d_biases[layer_idx]
    }

    /// Zero all parameter gradients.
    pub fn clear(&mut self) {
        for w in &mut self.d_weights {
            w.fill(0.0);
        }
        for b in &mut self.d_biases {
            b.fill(0.0);
        }
    }

    /// `self += scale * other` over parameter gradients.
    pub fn accumulate_scaled(&mut self, other: &Gradients, scale: f32) {
        debug_assert_eq!(self.d_weights.len(), other.d_weights.len());

        for (dst, src) in self.d_weights.iter_mut().zip(&other.d_weights) {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.mul_add(scale, *d);
            }
        }
        for (dst, src) in self.d_biases.iter_mut().zip(&other.d_biases) {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.mul_add(scale, *d);
            }
        }
    }
}

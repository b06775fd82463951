//! Contiguous training set.
//!
//! The training loop operates on slices to avoid per-step allocations. `Dataset`
//! stores feature/target matrices in validated, row-major buffers.

use crate::encode::EncodedSales;
use crate::{Error, FeatureVector, Result};

/// A supervised dataset: inputs (X) and targets (Y).
///
/// Stored as contiguous buffers with row-major layout:
/// - `inputs.len() == len * input_dim`
/// - `targets.len() == len * target_dim`
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Vec<f32>,
    targets: Vec<f32>,
    len: usize,
    input_dim: usize,
    target_dim: usize,
}

impl Dataset {
    /// Build a dataset from flat buffers.
    ///
    /// `inputs` is `(len, input_dim)` and `targets` is `(len, target_dim)`.
    pub fn from_flat(
        inputs: Vec<f32>,
        targets: Vec<f32>,
        input_dim: usize,
        target_dim: usize,
    ) -> Result<Self> {
        if input_dim == 0 || target_dim == 0 {
            return Err(Error::InvalidTrainingData(format!(
                "input_dim and target_dim must be > 0, got {input_dim} and {target_dim}"
            )));
        }
        if inputs.len() % input_dim != 0 {
            return Err(Error::InvalidTrainingData(format!(
                "inputs length {} is not divisible by input_dim {input_dim}",
                inputs.len()
            )));
        }

        let len = inputs.len() / input_dim;
        if targets.len() != len * target_dim {
            return Err(Error::InvalidTrainingData(format!(
                "targets length {} does not match len * target_dim ({len} * {target_dim})",
                targets.len()
            )));
        }

        Ok(Self {
            inputs,
            targets,
            len,
            input_dim,
            target_dim,
        })
    }

    /// Build the `(month, product_index) -> quantity` regression set.
    pub fn from_encoded(encoded: &EncodedSales) -> Result<Self> {
        let mut inputs = Vec::with_capacity(encoded.len() * FeatureVector::DIM);
        for feature in encoded.features() {
            inputs.extend_from_slice(&feature.to_input());
        }
        Self::from_flat(inputs, encoded.targets().to_vec(), FeatureVector::DIM, 1)
    }

    #[inline]
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    #[inline]
    /// Returns the `idx`-th input row.
    ///
    /// Panics if `idx >= len`.
    pub fn input(&self, idx: usize) -> &[f32] {
        let start = idx * self.input_dim;
        &self.inputs[start..start + self.input_dim]
    }

    #[inline]
    /// Returns the `idx`-th target row.
    ///
    /// Panics if `idx >= len`.
    pub fn target(&self, idx: usize) -> &[f32] {
        let start = idx * self.target_dim;
        &self.targets[start..start + self.target_dim]
    }
}

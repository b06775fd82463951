//! Model builder.
//!
//! `MlpBuilder` makes model structure explicit (layer sizes + activations) and
//! picks a default weight initializer per activation:
//!
//! - `identity`: Xavier/Glorot
//! - `relu`: He/Kaiming

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Activation, Error, Init, Layer, Mlp, Result};

#[derive(Debug, Clone, Copy)]
struct LayerSpec {
    out_dim: usize,
    activation: Activation,
}

/// Builder for an `Mlp`.
///
/// ```rust
/// use sales_forecast::{Activation, MlpBuilder};
///
/// # fn main() -> sales_forecast::Result<()> {
/// let mlp = MlpBuilder::new(2)?
///     .add_layer(10, Activation::ReLU)?
///     .add_layer(1, Activation::Identity)?
///     .build_with_seed(0)?;
/// assert_eq!(mlp.output_dim(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MlpBuilder {
    input_dim: usize,
    layers: Vec<LayerSpec>,
}

impl MlpBuilder {
    /// Start building an MLP that accepts inputs of length `input_dim`.
    pub fn new(input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidConfig("input_dim must be > 0".to_owned()));
        }
        Ok(Self {
            input_dim,
            layers: Vec::new(),
        })
    }

    /// Add a dense layer with `out_dim` outputs.
    pub fn add_layer(mut self, out_dim: usize, activation: Activation) -> Result<Self> {
        if out_dim == 0 {
            return Err(Error::InvalidConfig("layer out_dim must be > 0".to_owned()));
        }
        self.layers.push(LayerSpec {
            out_dim,
            activation,
        });
        Ok(self)
    }

    /// Build using a deterministic seed.
    pub fn build_with_seed(self, seed: u64) -> Result<Mlp> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build using the provided RNG.
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Mlp> {
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig(
                "mlp must have at least one layer".to_owned(),
            ));
        }

        let mut layers = Vec::with_capacity(self.layers.len());
        let mut in_dim = self.input_dim;
        for spec in self.layers {
            let init = default_init_for_activation(spec.activation);
            layers.push(Layer::new_with_rng(
                in_dim,
                spec.out_dim,
                init,
                spec.activation,
                rng,
            )?);
            in_dim = spec.out_dim;
        }

        Mlp::from_layers(layers)
    }
}

#[inline]
fn default_init_for_activation(act: Activation) -> Init {
    match act {
        Activation::Identity => Init::Xavier,
        Activation::ReLU => Init::He,
    }
}

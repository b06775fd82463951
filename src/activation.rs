//! Activation functions.
//!
//! A dense layer computes `z = W x + b` and then applies an activation element-wise:
//! `y = activation(z)`.
//!
//! Only the post-activation outputs `y` are cached in `Scratch`, so derivatives are
//! expressed in terms of `y`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Element-wise activation function.
pub enum Activation {
    /// Rectified linear unit, `max(z, 0)`.
    ReLU,
    /// Linear output, used by the regression head.
    Identity,
}

impl Activation {
    #[inline]
    pub(crate) fn forward(self, x: f32) -> f32 {
        match self {
            Activation::ReLU => x.max(0.0),
            Activation::Identity => x,
        }
    }

    /// Derivative of the activation with respect to its input, expressed in terms
    /// of the cached post-activation output `y`.
    #[inline]
    pub(crate) fn grad_from_output(self, y: f32) -> f32 {
        match self {
            Activation::ReLU => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Identity => 1.0,
        }
    }
}

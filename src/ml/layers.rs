// ============================================================
// Layer 5 — Tied-Weight Layer Stack
// ============================================================
// The network for layer widths [n_input, h1, ..., hL]:
//
//   encoder  x → σ(x·W1 + b1) → ... → σ(·WL + bL) = z
//   decoder  z → σ(z·WLᵀ + c_L) → ... → σ(·W1ᵀ + c_1) = y
//
// Only the encoder owns weight matrices. A decoder layer is a
// borrowed *view* of its paired encoder weight with a Transposed
// orientation, plus its own bias. Parameter count is therefore
// L weights + 2L biases, never 2L weights.
//
// Reference: Burn Book §3 (Building Blocks)
//            Vincent et al. (2010), tied weights

use burn::{module::Param, prelude::*};
use rand::Rng;

use crate::error::Result;
use crate::ml::config::{Activation, BiasInit, WeightInit};

#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    /// Shape [fan_in, fan_out]
    pub weight: Param<Tensor<B, 2>>,
    pub bias:   Param<Tensor<B, 1>>,
}

/// A decoder layer owns only its bias; its weight is borrowed.
#[derive(Module, Debug)]
pub struct DecoderLayer<B: Backend> {
    pub bias: Param<Tensor<B, 1>>,
}

#[derive(Module, Debug)]
pub struct TiedAutoencoder<B: Backend> {
    pub encoder: Vec<EncoderLayer<B>>,
    /// Ordered innermost first, i.e. in the order they are applied
    pub decoder: Vec<DecoderLayer<B>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Forward,
    Transposed,
}

/// One affine + activation step over a borrowed weight matrix.
pub struct TiedLayer<'a, B: Backend> {
    pub weight:      &'a Param<Tensor<B, 2>>,
    pub bias:        &'a Param<Tensor<B, 1>>,
    pub orientation: Orientation,
}

impl<B: Backend> TiedLayer<'_, B> {
    pub fn forward(&self, x: Tensor<B, 2>, activation: &Activation) -> Tensor<B, 2> {
        let weight = match self.orientation {
            Orientation::Forward    => self.weight.val(),
            Orientation::Transposed => self.weight.val().transpose(),
        };
        activation.apply(x.matmul(weight) + self.bias.val().unsqueeze::<2>())
    }
}

impl<B: Backend> TiedAutoencoder<B> {
    /// Allocate and initialise parameters for `widths = [n_input, h1, ..., hL]`.
    pub fn init<R: Rng>(
        widths:      &[usize],
        weight_init: &WeightInit,
        bias_init:   &BiasInit,
        rng:         &mut R,
        device:      &B::Device,
    ) -> Result<Self> {
        let mut encoder = Vec::with_capacity(widths.len().saturating_sub(1));
        for pair in widths.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let w = weight_init.sample(fan_in, fan_out, rng)?;
            encoder.push(EncoderLayer {
                weight: Param::from_tensor(
                    Tensor::<B, 1>::from_floats(w.as_slice(), device).reshape([fan_in, fan_out]),
                ),
                bias: bias_param(bias_init, fan_out, device),
            });
        }

        // Decoder biases are sized to the encoder widths walked backwards,
        // ending at n_input.
        let decoder = widths[..widths.len().saturating_sub(1)]
            .iter()
            .rev()
            .map(|&width| DecoderLayer { bias: bias_param(bias_init, width, device) })
            .collect();

        Ok(Self { encoder, decoder })
    }

    /// Number of encoder layers (L).
    pub fn depth(&self) -> usize {
        self.encoder.len()
    }

    pub fn encoder_layers(&self) -> impl Iterator<Item = TiedLayer<'_, B>> + '_ {
        self.encoder.iter().map(|layer| TiedLayer {
            weight:      &layer.weight,
            bias:        &layer.bias,
            orientation: Orientation::Forward,
        })
    }

    /// Decoder step i pairs with encoder layer L-1-i, transposed.
    pub fn decoder_layers(&self) -> impl Iterator<Item = TiedLayer<'_, B>> + '_ {
        self.encoder
            .iter()
            .rev()
            .zip(self.decoder.iter())
            .map(|(enc, dec)| TiedLayer {
                weight:      &enc.weight,
                bias:        &dec.bias,
                orientation: Orientation::Transposed,
            })
    }

    pub fn encode(&self, x: Tensor<B, 2>, activation: &Activation) -> Tensor<B, 2> {
        self.encoder_layers().fold(x, |h, layer| layer.forward(h, activation))
    }

    pub fn decode(&self, z: Tensor<B, 2>, activation: &Activation) -> Tensor<B, 2> {
        self.decoder_layers().fold(z, |h, layer| layer.forward(h, activation))
    }

    /// Run the full stack, returning `(latent, reconstruction)`.
    pub fn forward(&self, x: Tensor<B, 2>, activation: &Activation) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let z = self.encode(x, activation);
        let y = self.decode(z.clone(), activation);
        (z, y)
    }
}

fn bias_param<B: Backend>(init: &BiasInit, n: usize, device: &B::Device) -> Param<Tensor<B, 1>> {
    Param::from_tensor(Tensor::<B, 1>::from_floats(init.values(n).as_slice(), device))
}

// ============================================================
// Layer 3 — Corruption Domain Types
// ============================================================
// Two types describe how training input gets corrupted:
//
//   CorruptionType — the configured *name* of a noise model.
//                    Unknown names are kept in an explicit
//                    fallback variant rather than rejected.
//
//   Corruption     — the resolved noise model with its
//                    parameters, ready to be applied.
//
// Resolution rule: an unrecognised name behaves exactly like
// salt-and-pepper noise with the configured rate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The configured corruption scheme.
///
/// Serialised as its bare name, so an unknown name in a saved config
/// loads as `Unrecognized` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CorruptionType {
    SaltAndPepper,
    Masking,
    Gaussian,
    /// Any other name; corrupts like `SaltAndPepper`
    Unrecognized(String),
}

impl From<&str> for CorruptionType {
    fn from(name: &str) -> Self {
        match name {
            "salt_and_pepper" => Self::SaltAndPepper,
            "masking"         => Self::Masking,
            "gaussian"        => Self::Gaussian,
            other             => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for CorruptionType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<CorruptionType> for String {
    fn from(kind: CorruptionType) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for CorruptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SaltAndPepper      => f.write_str("salt_and_pepper"),
            Self::Masking            => f.write_str("masking"),
            Self::Gaussian           => f.write_str("gaussian"),
            Self::Unrecognized(name) => f.write_str(name),
        }
    }
}

/// A fully parameterised noise model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Corruption {
    /// Each element is replaced with probability `rate` by a fair 0/1 coin
    SaltAndPepper { rate: f64 },
    /// Each element is zeroed with probability `rate`
    Masking { rate: f64 },
    /// `(x + N(0, std)) * mix_prob + x * (1 - mix_prob)`, applied uniformly
    Gaussian { std: f64, mix_prob: f64 },
}

impl Corruption {
    /// Pick the noise model for a configured type.
    ///
    /// `prob` is the corruption rate for the Bernoulli schemes and the
    /// mixing weight for the Gaussian scheme.
    pub fn resolve(kind: &CorruptionType, prob: f64, std: f64) -> Self {
        match kind {
            CorruptionType::SaltAndPepper => Self::SaltAndPepper { rate: prob },
            CorruptionType::Masking       => Self::Masking { rate: prob },
            CorruptionType::Gaussian      => Self::Gaussian { std, mix_prob: prob },
            CorruptionType::Unrecognized(name) => {
                tracing::debug!(
                    "Unknown corruption type '{}', using salt_and_pepper",
                    name
                );
                Self::SaltAndPepper { rate: prob }
            }
        }
    }
}

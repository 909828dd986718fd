//! Experiment seed: deterministic randomness for reproducible runs.

use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic data generation and weight initialization.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator driving an experiment. Using the same seed reproduces the same
/// inputs, the same initial weights, and therefore the same recovered weight
/// vectors, enabling:
///
/// - Reproducible experiments for debugging
/// - Recording a seed alongside saved results so a run can be replayed
/// - Deterministic testing
///
/// Seeds serialize as 32-character hex strings and parse back from the same
/// format.
///
/// # Example
///
/// ```
/// use choquetry_data::ExperimentSeed;
/// use rand::Rng as _;
///
/// // Generate a random seed, then derive two identical generators from it.
/// let seed: ExperimentSeed = rand::rng().random();
/// let mut a = seed.rng();
/// let mut b = seed.rng();
/// assert_eq!(a.random_range(0.0..1.0), b.random_range(0.0..1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentSeed([u8; 16]);

/// A seed string is not 32 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex characters")]
pub struct SeedParseError {
    /// The rejected input string.
    pub input: String,
}

impl ExperimentSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates the random number generator for this seed.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

/// Seeds render as 32-character lowercase hex, matching the serde format.
impl fmt::Display for ExperimentSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for ExperimentSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| SeedParseError {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ExperimentSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExperimentSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str
            .parse()
            .map_err(|e: SeedParseError| serde::de::Error::custom(e.to_string()))
    }
}

/// Allows generating random `ExperimentSeed` values with `rng.random()`.
impl Distribution<ExperimentSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ExperimentSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ExperimentSeed(seed)
    }
}

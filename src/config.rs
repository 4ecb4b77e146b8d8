//! Predictor configuration.
//!
//! A [PredictorConfig] selects one [Strategy] and sizes its tables. It is
//! validated once, when the predictor is built, and never changes for the
//! lifetime of the predictor.

use clap::ValueEnum;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::predictor::{ Predictor, SaturatingCounter };

/// Default values used when a field is omitted.
pub mod defaults {
    /// Global history width (16K-entry PHT).
    pub const GHISTORY_BITS: usize = 14;

    /// Local history width (1K-entry local pattern table).
    pub const LHISTORY_BITS: usize = 10;

    /// Per-address index width (1K-entry local history table).
    pub const PC_INDEX_BITS: usize = 10;

    /// Number of perceptrons; the largest power of two that fits 28 weights
    /// and a bias per entry into a 64Kib budget.
    pub const NUM_PERCEPTRONS: usize = 256;

    /// Number of weights (and global history bits) per perceptron.
    pub const NUM_WEIGHTS: usize = 28;

    /// Perceptron training threshold.
    pub const THRESHOLD: i32 = 256;
}

/// Upper bound on any table index or history width.
pub const MAX_TABLE_BITS: usize = 24;

/// Upper bound on the number of weights per perceptron.
pub const MAX_PERCEPTRON_WEIGHTS: usize = 64;

/// Upper bound on the number of perceptrons.
pub const MAX_PERCEPTRONS: usize = 1 << 20;

/// Storage bits for each perceptron weight and bias.
pub const PERCEPTRON_WEIGHT_BITS: usize = 8;

/// Branch prediction strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Always predict taken.
    #[default]
    Static,

    /// Global history XOR'ed with the program counter.
    Gshare,

    /// Per-address local history.
    Local,

    /// Chooser between global and local history.
    Tournament,

    /// Perceptrons over global history.
    #[serde(alias = "custom")]
    #[value(alias = "custom")]
    Perceptron,
}
impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Gshare => "Gshare",
            Self::Local => "Local",
            Self::Tournament => "Tournament",
            Self::Perceptron => "Perceptron",
        }
    }
}
impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl FromStr for Strategy {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "gshare" => Ok(Self::Gshare),
            "local" => Ok(Self::Local),
            "tournament" => Ok(Self::Tournament),
            "perceptron" | "custom" => Ok(Self::Perceptron),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Perceptron predictor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PerceptronConfig {
    /// Number of perceptrons (must be a power of two)
    #[serde(default = "PerceptronConfig::default_num_perceptrons")]
    pub num_perceptrons: usize,

    /// Number of weights per perceptron, and the width of global history
    #[serde(default = "PerceptronConfig::default_num_weights")]
    pub num_weights: usize,

    /// Keep training while the magnitude of the output is below this
    #[serde(default = "PerceptronConfig::default_threshold")]
    pub threshold: i32,
}
impl Default for PerceptronConfig {
    fn default() -> Self {
        Self {
            num_perceptrons: defaults::NUM_PERCEPTRONS,
            num_weights: defaults::NUM_WEIGHTS,
            threshold: defaults::THRESHOLD,
        }
    }
}
impl PerceptronConfig {
    fn default_num_perceptrons() -> usize { defaults::NUM_PERCEPTRONS }
    fn default_num_weights() -> usize { defaults::NUM_WEIGHTS }
    fn default_threshold() -> i32 { defaults::THRESHOLD }

    /// The threshold suggested in "Dynamic Branch Prediction with
    /// Perceptrons" (Jiménez and Lin, 2001) for a history of 'num_weights'.
    pub fn scaled_threshold(num_weights: usize) -> i32 {
        ((1.93f64 * (num_weights as f64)) + 14.0f64) as i32
    }

    /// Replace the threshold with [PerceptronConfig::scaled_threshold].
    pub fn with_scaled_threshold(mut self) -> Self {
        self.threshold = Self::scaled_threshold(self.num_weights);
        self
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let entry = (self.num_weights + 1) * PERCEPTRON_WEIGHT_BITS;
        self.num_perceptrons * entry + self.num_weights
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.num_perceptrons;
        if !n.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo { name: "num_perceptrons", value: n });
        }
        if n > MAX_PERCEPTRONS {
            return Err(ConfigError::TooLarge {
                name: "num_perceptrons", value: n, max: MAX_PERCEPTRONS
            });
        }
        check_width("num_weights", self.num_weights, MAX_PERCEPTRON_WEIGHTS)?;
        if self.threshold < 0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Configuration for building a [Predictor].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PredictorConfig {
    /// Which strategy to use
    #[serde(default)]
    pub strategy: Strategy,

    /// Width of the global history register
    #[serde(default = "PredictorConfig::default_ghistory_bits")]
    pub ghistory_bits: usize,

    /// Width of the local history used to index the local pattern table
    #[serde(default = "PredictorConfig::default_lhistory_bits")]
    pub lhistory_bits: usize,

    /// Width of the per-address index
    #[serde(default = "PredictorConfig::default_pc_index_bits")]
    pub pc_index_bits: usize,

    /// Perceptron parameters
    #[serde(default)]
    pub perceptron: PerceptronConfig,
}
impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            ghistory_bits: defaults::GHISTORY_BITS,
            lhistory_bits: defaults::LHISTORY_BITS,
            pc_index_bits: defaults::PC_INDEX_BITS,
            perceptron: PerceptronConfig::default(),
        }
    }
}
impl PredictorConfig {
    fn default_ghistory_bits() -> usize { defaults::GHISTORY_BITS }
    fn default_lhistory_bits() -> usize { defaults::LHISTORY_BITS }
    fn default_pc_index_bits() -> usize { defaults::PC_INDEX_BITS }

    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, ..Self::default() }
    }

    pub fn static_taken() -> Self {
        Self::new(Strategy::Static)
    }

    pub fn gshare(ghistory_bits: usize) -> Self {
        Self { ghistory_bits, ..Self::new(Strategy::Gshare) }
    }

    pub fn local(lhistory_bits: usize, pc_index_bits: usize) -> Self {
        Self { lhistory_bits, pc_index_bits, ..Self::new(Strategy::Local) }
    }

    pub fn tournament(ghistory_bits: usize, lhistory_bits: usize,
        pc_index_bits: usize) -> Self
    {
        Self {
            ghistory_bits,
            lhistory_bits,
            pc_index_bits,
            ..Self::new(Strategy::Tournament)
        }
    }

    pub fn perceptron(perceptron: PerceptronConfig) -> Self {
        Self { perceptron, ..Self::new(Strategy::Perceptron) }
    }

    /// Parse and validate a configuration from JSON.
    /// Omitted fields take their default values.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the parameters used by the selected strategy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.strategy {
            Strategy::Static => Ok(()),
            Strategy::Gshare => {
                check_width("ghistory_bits", self.ghistory_bits, MAX_TABLE_BITS)
            },
            Strategy::Local => {
                check_width("lhistory_bits", self.lhistory_bits, MAX_TABLE_BITS)?;
                check_width("pc_index_bits", self.pc_index_bits, MAX_TABLE_BITS)
            },
            Strategy::Tournament => {
                check_width("ghistory_bits", self.ghistory_bits, MAX_TABLE_BITS)?;
                check_width("lhistory_bits", self.lhistory_bits, MAX_TABLE_BITS)?;
                check_width("pc_index_bits", self.pc_index_bits, MAX_TABLE_BITS)
            },
            Strategy::Perceptron => self.perceptron.validate(),
        }
    }

    /// Get the [approximate] number of storage bits used by the selected
    /// strategy.
    pub fn storage_bits(&self) -> usize {
        let ctr = SaturatingCounter::STORAGE_BITS;
        let gshare = || (ctr << self.ghistory_bits) + self.ghistory_bits;
        let local = || (self.lhistory_bits << self.pc_index_bits)
            + (ctr << self.lhistory_bits);
        match self.strategy {
            Strategy::Static => 0,
            Strategy::Gshare => gshare(),
            Strategy::Local => local(),
            Strategy::Tournament => gshare() + local() + (ctr << self.pc_index_bits),
            Strategy::Perceptron => self.perceptron.storage_bits(),
        }
    }

    /// Use this configuration to create a new [Predictor].
    pub fn build(&self) -> Result<Predictor, ConfigError> {
        Predictor::configure(self)
    }
}

fn check_width(name: &'static str, bits: usize, max: usize)
    -> Result<(), ConfigError>
{
    if bits == 0 || bits > max {
        return Err(ConfigError::InvalidWidth { name, bits, max });
    }
    Ok(())
}

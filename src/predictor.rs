//! Implementations of different branch predictors.

pub mod counter;
pub mod simple;
pub mod gshare;
pub mod local;
pub mod tournament;
pub mod perceptron;

pub use counter::*;
pub use simple::*;
pub use gshare::*;
pub use local::*;
pub use tournament::*;
pub use perceptron::*;

use crate::Outcome;
use crate::config::*;
use crate::error::ConfigError;

/// Interface to a predictor for the direction of conditional branches.
///
/// Drivers call [BranchPredictor::predict] for a branch, and then call
/// [BranchPredictor::train] with the correct outcome for the same branch
/// before moving on to the next one.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for the branch at 'pc'.
    fn predict(&mut self, pc: u32) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn train(&mut self, pc: u32, outcome: Outcome);

    /// Reset the internal state of the predictor.
    fn reset(&mut self);
}

/// Returns a mask covering the low 'bits' bits.
pub(crate) fn mask(bits: usize) -> u32 {
    if bits >= u32::BITS as usize { u32::MAX } else { (1 << bits) - 1 }
}

/// One of the available predictors, selected by a [PredictorConfig].
#[derive(Clone, Debug)]
pub enum Predictor {
    Static(StaticPredictor),
    Gshare(GsharePredictor),
    Local(LocalPredictor),
    Tournament(TournamentPredictor),
    Perceptron(PerceptronPredictor),
}
impl Predictor {
    /// Validate 'cfg' and allocate the tables for the selected strategy.
    pub fn configure(cfg: &PredictorConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let res = match cfg.strategy {
            Strategy::Static => Self::Static(StaticPredictor::default()),
            Strategy::Gshare => {
                Self::Gshare(GsharePredictor::new(cfg.ghistory_bits))
            },
            Strategy::Local => Self::Local(
                LocalPredictor::new(cfg.lhistory_bits, cfg.pc_index_bits)
            ),
            Strategy::Tournament => Self::Tournament(TournamentPredictor::new(
                cfg.ghistory_bits, cfg.lhistory_bits, cfg.pc_index_bits
            )),
            Strategy::Perceptron => {
                let p = &cfg.perceptron;
                log::info!("perceptrons: {}, weights: {}, threshold: {}",
                    p.num_perceptrons, p.num_weights, p.threshold
                );
                Self::Perceptron(PerceptronPredictor::new(
                    p.num_perceptrons, p.num_weights, p.threshold
                ))
            },
        };
        log::info!("configured {} predictor ({:.2} Kib of state)",
            res.name(), cfg.storage_bits() as f64 / 1024.0
        );
        Ok(res)
    }

    /// The strategy implemented by this predictor.
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Static(_) => Strategy::Static,
            Self::Gshare(_) => Strategy::Gshare,
            Self::Local(_) => Strategy::Local,
            Self::Tournament(_) => Strategy::Tournament,
            Self::Perceptron(_) => Strategy::Perceptron,
        }
    }

    fn inner(&self) -> &dyn BranchPredictor {
        match self {
            Self::Static(p) => p,
            Self::Gshare(p) => p,
            Self::Local(p) => p,
            Self::Tournament(p) => p,
            Self::Perceptron(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn BranchPredictor {
        match self {
            Self::Static(p) => p,
            Self::Gshare(p) => p,
            Self::Local(p) => p,
            Self::Tournament(p) => p,
            Self::Perceptron(p) => p,
        }
    }
}

impl BranchPredictor for Predictor {
    fn name(&self) -> &'static str { self.inner().name() }
    fn predict(&mut self, pc: u32) -> Outcome { self.inner_mut().predict(pc) }
    fn train(&mut self, pc: u32, outcome: Outcome) {
        self.inner_mut().train(pc, outcome)
    }
    fn reset(&mut self) { self.inner_mut().reset() }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn mask_widths() {
        assert_eq!(mask(1), 0b1);
        assert_eq!(mask(4), 0b1111);
        assert_eq!(mask(32), u32::MAX);
    }

    #[test]
    fn configure_selects_strategy() {
        for strategy in Strategy::value_variants() {
            let p = Predictor::configure(&PredictorConfig::new(*strategy)).unwrap();
            assert_eq!(p.strategy(), *strategy);
            assert_eq!(p.name(), strategy.name());
        }
    }

    #[test]
    fn configure_rejects_bad_sizes() {
        let cfg = PredictorConfig::gshare(0);
        assert!(matches!(Predictor::configure(&cfg), Err(ConfigError::InvalidWidth { .. })));
        let cfg = PredictorConfig::gshare(MAX_TABLE_BITS + 1);
        assert!(Predictor::configure(&cfg).is_err());
    }

    #[test]
    fn static_predicts_taken() {
        let mut p = PredictorConfig::static_taken().build().unwrap();
        for pc in [0, 0x4, 0xffff_fffc] {
            assert_eq!(p.predict(pc), Outcome::T);
            p.train(pc, Outcome::N);
        }
    }

    #[test]
    fn dispatch_matches_component() {
        let mut facade = PredictorConfig::tournament(6, 5, 4).build().unwrap();
        let mut direct = TournamentPredictor::new(6, 5, 4);
        let pattern = [true, true, false, true, false, false, true];
        for (i, taken) in pattern.iter().cycle().take(200).enumerate() {
            let pc = (i as u32 % 7) << 2;
            assert_eq!(facade.predict(pc), direct.predict(pc));
            facade.train(pc, Outcome::from(*taken));
            direct.train(pc, Outcome::from(*taken));
        }
    }
}

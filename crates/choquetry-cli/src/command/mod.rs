use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::Rng;

use choquetry_evaluator::{ChoquetFunction, pairing};
use choquetry_training::weights;

use self::{
    generate_data::GenerateDataArg, run_many::RunManyArg, run_once::RunOnceArg,
};

mod generate_data;
mod run_many;
mod run_once;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a single weight-recovery experiment
    RunOnce(#[clap(flatten)] RunOnceArg),
    /// Run repeated weight-recovery experiments and aggregate the results
    RunMany(#[clap(flatten)] RunManyArg),
    /// Generate a labeled synthetic dataset and save it as JSON
    GenerateData(#[clap(flatten)] GenerateDataArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::RunOnce(arg) => run_once::run(&arg)?,
        Mode::RunMany(arg) => run_many::run(&arg)?,
        Mode::GenerateData(arg) => generate_data::run(&arg)?,
    }
    Ok(())
}

/// Ground-truth Choquet function selection, shared by all subcommands.
///
/// The function comes from one of three places, in priority order: a JSON
/// file (`--truth-file`), explicit weight vectors (`--weights`, with
/// `--w-min`/`--w-max` defaulting to zeros), or a random L1-normalized
/// additive function of `--dimension` components drawn from the experiment
/// seed.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GroundTruthArg {
    /// Input dimension when generating a random ground truth
    #[arg(long, default_value_t = 2)]
    dimension: usize,
    /// Ground-truth component weights, comma separated
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    weights: Option<Vec<f64>>,
    /// Pair-minimum weights, comma separated (default: zeros)
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    w_min: Option<Vec<f64>>,
    /// Pair-maximum weights, comma separated (default: zeros)
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    w_max: Option<Vec<f64>>,
    /// Read the ground-truth function from a JSON file
    #[arg(long)]
    truth_file: Option<std::path::PathBuf>,
}

impl GroundTruthArg {
    pub(crate) fn resolve<R>(&self, rng: &mut R) -> anyhow::Result<ChoquetFunction>
    where
        R: Rng + ?Sized,
    {
        if let Some(path) = &self.truth_file {
            return crate::util::read_json_file("ground truth", path);
        }
        if let Some(w) = &self.weights {
            let pairs = pairing::pair_count(w.len());
            let w_min = self.w_min.clone().unwrap_or_else(|| vec![0.0; pairs]);
            let w_max = self.w_max.clone().unwrap_or_else(|| vec![0.0; pairs]);
            return ChoquetFunction::new(w.clone(), w_min, w_max)
                .context("Invalid ground-truth weight shapes");
        }
        let mut w = weights::random(rng, 1.0, self.dimension);
        weights::normalize_l1(&mut w);
        Ok(ChoquetFunction::additive(w))
    }
}

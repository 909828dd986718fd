use std::path::PathBuf;

use rand::Rng as _;

use choquetry_data::{Dataset, ExperimentSeed, InputGenerator, sort_inputs};

use crate::{command::GroundTruthArg, schema::dataset::DatasetRecord, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateDataArg {
    #[command(flatten)]
    truth: GroundTruthArg,
    /// Number of synthetic samples to generate
    #[arg(long, default_value_t = 10_000)]
    samples: usize,
    /// Sort inputs lexicographically before labeling
    #[arg(long)]
    sort: bool,
    /// Experiment seed (32 hex characters); random when omitted
    #[arg(long)]
    seed: Option<ExperimentSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateDataArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.rng();
    let choquet = arg.truth.resolve(&mut rng)?;

    eprintln!("Seed: {seed}");

    let mut inputs = InputGenerator::default().generate(&mut rng, choquet.dimension(), arg.samples);
    if arg.sort {
        sort_inputs(&mut inputs);
    }
    let dataset = Dataset::from_function(inputs, |x| {
        choquet
            .evaluate(x)
            .expect("generated inputs match the evaluator dimension")
    });

    let record = DatasetRecord::from(&dataset);
    Output::save_json(&record, arg.output.clone())?;

    Ok(())
}

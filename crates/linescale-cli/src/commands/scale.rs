use crate::cli::ScaleArgs;
use crate::config::builder::build_config;
use crate::config::models::{AppConfig, PartitionSource};
use crate::error::{CliError, Result};
use crate::utils::progress::ScaleProgressBar;
use linescale::{
    core::io::{csv_lines::CsvLineFile, traits::LineListFile},
    core::molecules::hitran::HitranMolecules,
    core::partition::{
        provider::PartitionFunctionProvider, summation::LevelSumPartitionFunction,
        tabulated::TabulatedPartitionFunction,
    },
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::info;

pub fn run(args: ScaleArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args)?;
    let progress = ScaleProgressBar::stderr();
    let result = execute(&config, ProgressReporter::with_callback(progress.callback()));
    progress.finish();
    result
}

pub(crate) fn execute(config: &AppConfig, reporter: ProgressReporter) -> Result<()> {
    let provider = load_provider(config)?;

    info!("Loading line list from {:?}", &config.input_path);
    let table = CsvLineFile::read_from_path(&config.input_path, &config.columns).map_err(|e| {
        CliError::FileParsing {
            path: config.input_path.clone(),
            source: e.into(),
        }
    })?;
    info!(
        "Loaded {} line(s) with {} passthrough column(s).",
        table.len(),
        table.passthrough_columns(&config.columns).len()
    );

    println!(
        "Scaling {} line(s) from {} K to {} K...",
        table.len(),
        config.scaling.reference_temperature,
        config.scaling.gas_temperature
    );
    let result = workflows::scale::run(
        table.lines(),
        &config.scaling,
        HitranMolecules::new(),
        provider,
        &reporter,
    )?;

    for summary in &result.molecules {
        let isotopologues = summary
            .isotopologues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<8} {:>8} line(s)  isotopologues: {}",
            summary.molecule, summary.line_count, isotopologues
        );
    }

    CsvLineFile::write_to_path(&table, &result.lines, &config.output_path).map_err(|e| {
        CliError::FileWriting {
            path: config.output_path.clone(),
            source: e.into(),
        }
    })?;
    println!(
        "✓ Scaled line list written to: {}",
        config.output_path.display()
    );

    Ok(())
}

fn load_provider(config: &AppConfig) -> Result<Box<dyn PartitionFunctionProvider>> {
    match &config.partition_source {
        PartitionSource::Table { path } => {
            info!("Loading tabulated partition functions from {:?}", path);
            let table =
                TabulatedPartitionFunction::load(path).map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?;
            Ok(Box::new(table))
        }
        PartitionSource::Levels { path, settings } => {
            info!(
                chunk_size = settings.chunk_size,
                rtol = settings.rtol,
                "Loading energy levels from {:?}",
                path
            );
            let levels = LevelSumPartitionFunction::load(path, config.scaling.constants, *settings)
                .map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?;
            Ok(Box::new(levels))
        }
    }
}

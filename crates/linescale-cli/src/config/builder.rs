use super::defaults::DefaultsConfig;
use super::file::{FileColumns, FileConfig, FilePartitionSource};
use super::models::{AppConfig, PartitionSource};
use crate::cli::ScaleArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use linescale::core::io::table::LineColumns;
use linescale::core::partition::summation::SummationSettings;
use linescale::engine::config::ScalingConfigBuilder;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub fn build_config(args: &ScaleArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let temps_file = file_config.temperatures.take().unwrap_or_default();
    let reference_temperature = args
        .reference_temperature
        .or(temps_file.reference)
        .unwrap_or(defaults.reference_temperature);
    let gas_temperature = args.gas_temperature.or(temps_file.gas).ok_or_else(|| {
        CliError::Config(
            "A gas temperature is required, either via --tgas or `temperatures.gas` in the config file."
                .to_string(),
        )
    })?;

    let c2 = args
        .c2
        .or(file_config.physics.take().and_then(|p| p.c2))
        .unwrap_or(defaults.c2);

    let scaling = ScalingConfigBuilder::new()
        .reference_temperature(reference_temperature)
        .gas_temperature(gas_temperature)
        .c2(c2)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let partition_source = merge_partition_source(args, &mut file_config, &defaults)?;
    let columns = merge_columns(file_config.columns.take().unwrap_or_default());

    Ok(AppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        scaling,
        partition_source,
        columns,
    })
}

fn merge_partition_source(
    args: &ScaleArgs,
    file_config: &mut FileConfig,
    defaults: &DefaultsConfig,
) -> Result<PartitionSource> {
    let pf_file = file_config.partition_function.take().unwrap_or_default();

    let (kind, path) = match (&args.partition_table, &args.levels) {
        (Some(path), _) => (FilePartitionSource::Table, path.clone()),
        (None, Some(path)) => (FilePartitionSource::Levels, path.clone()),
        (None, None) => {
            let path = pf_file.path.clone().ok_or_else(|| {
                CliError::Config(
                    "A partition function source is required: pass --partition-table or --levels, or set `partition-function.path` in the config file."
                        .to_string(),
                )
            })?;
            (pf_file.source.unwrap_or(FilePartitionSource::Table), path)
        }
    };
    ensure_exists(&path)?;

    Ok(match kind {
        FilePartitionSource::Table => PartitionSource::Table { path },
        FilePartitionSource::Levels => {
            let summation = pf_file.summation.unwrap_or_default();
            let settings = SummationSettings {
                chunk_size: summation.chunk_size.unwrap_or(defaults.chunk_size),
                rtol: summation.rtol.unwrap_or(defaults.rtol),
            };
            if settings.chunk_size == 0 {
                return Err(CliError::Config(
                    "`partition-function.summation.chunk-size` must be at least 1.".to_string(),
                ));
            }
            if !(settings.rtol.is_finite() && settings.rtol >= 0.0) {
                return Err(CliError::Config(format!(
                    "`partition-function.summation.rtol` must be a non-negative number, got {}.",
                    settings.rtol
                )));
            }
            PartitionSource::Levels { path, settings }
        }
    })
}

fn merge_columns(file_val: FileColumns) -> LineColumns {
    let defaults = LineColumns::default();
    LineColumns {
        molecule: file_val.molecule.unwrap_or(defaults.molecule),
        isotopologue: file_val.isotopologue.unwrap_or(defaults.isotopologue),
        intensity: file_val.intensity.unwrap_or(defaults.intensity),
        lower_state_energy: file_val
            .lower_state_energy
            .unwrap_or(defaults.lower_state_energy),
        wavenumber: file_val.wavenumber.unwrap_or(defaults.wavenumber),
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Provided path does not exist: {}", path.display()),
        )));
    }
    Ok(())
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_assignment(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "temperatures.reference" => {
                config
                    .temperatures
                    .get_or_insert_with(Default::default)
                    .reference = Some(
                    parser::parse_temperature(value_str)
                        .map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "temperatures.gas" => {
                config.temperatures.get_or_insert_with(Default::default).gas = Some(
                    parser::parse_temperature(value_str)
                        .map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "physics.c2" => {
                config.physics.get_or_insert_with(Default::default).c2 =
                    Some(parse_value(key, value_str, "float")?);
            }
            "partition-function.source" => {
                config
                    .partition_function
                    .get_or_insert_with(Default::default)
                    .source = Some(value_str.parse().map_err(CliError::Config)?);
            }
            "partition-function.path" => {
                config
                    .partition_function
                    .get_or_insert_with(Default::default)
                    .path = Some(PathBuf::from(value_str));
            }
            "partition-function.summation.chunk-size" => {
                config
                    .partition_function
                    .get_or_insert_with(Default::default)
                    .summation
                    .get_or_insert_with(Default::default)
                    .chunk_size = Some(parse_value(key, value_str, "integer")?);
            }
            "partition-function.summation.rtol" => {
                config
                    .partition_function
                    .get_or_insert_with(Default::default)
                    .summation
                    .get_or_insert_with(Default::default)
                    .rtol = Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

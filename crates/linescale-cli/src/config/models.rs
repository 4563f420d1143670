use linescale::core::io::table::LineColumns;
use linescale::core::partition::summation::SummationSettings;
use linescale::engine::config::ScalingConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum PartitionSource {
    Table {
        path: PathBuf,
    },
    Levels {
        path: PathBuf,
        settings: SummationSettings,
    },
}

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub scaling: ScalingConfig,
    pub partition_source: PartitionSource,
    pub columns: LineColumns,
}

//! Configuration for assembly policies and table output.
//!
//! Assembly settings decide what happens at the two policy points of the
//! join pipeline (unresolvable geometry, orphaned results). Output settings
//! control how the CLI persists assembled tables.

use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with a link whose inlet or outlet has no coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingCoordinatePolicy {
    /// Abort the assembly with `MissingCoordinate` or `MissingEndpoint`
    #[default]
    Fail,
    /// Remove the row and keep going
    DropRow,
}

/// Assembly policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Handling of links with unresolvable endpoints
    pub missing_coordinates: MissingCoordinatePolicy,

    /// Keep report rows whose element is absent from the network sections
    pub retain_orphan_results: bool,
}

impl AssemblyConfig {
    pub fn with_missing_coordinates(mut self, policy: MissingCoordinatePolicy) -> Self {
        self.missing_coordinates = policy;
        self
    }

    pub fn with_orphan_results(mut self) -> Self {
        self.retain_orphan_results = true;
        self
    }
}

/// Output formats for assembled tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Print to stdout
    #[default]
    Table,
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Table => None,
            OutputFormat::Csv => Some("csv"),
            OutputFormat::Parquet => Some("parquet"),
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Where and how assembled tables are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub compression: CompressionAlgorithm,
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            compression: CompressionAlgorithm::Snappy,
            output_dir: PathBuf::from("."),
        }
    }
}

impl OutputConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Output file for a category, `None` when printing to stdout
    pub fn output_path(&self, category: &str) -> Option<PathBuf> {
        self.format
            .extension()
            .map(|ext| self.output_dir.join(format!("{}.{}", category, ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_defaults() {
        let config = AssemblyConfig::default();
        assert_eq!(config.missing_coordinates, MissingCoordinatePolicy::Fail);
        assert!(!config.retain_orphan_results);

        let config = config
            .with_missing_coordinates(MissingCoordinatePolicy::DropRow)
            .with_orphan_results();
        assert_eq!(config.missing_coordinates, MissingCoordinatePolicy::DropRow);
        assert!(config.retain_orphan_results);
    }

    #[test]
    fn test_output_paths() {
        let config = OutputConfig::default().with_output_dir("/tmp/out");
        assert_eq!(config.output_path("conduits"), None);

        let config = config.with_format(OutputFormat::Parquet);
        assert_eq!(
            config.output_path("conduits"),
            Some(PathBuf::from("/tmp/out/conduits.parquet"))
        );
    }

    #[test]
    fn test_compression_mapping() {
        assert!(matches!(
            CompressionAlgorithm::Zstd.to_polars_compression(),
            ParquetCompression::Zstd(None)
        ));
        assert!(matches!(
            CompressionAlgorithm::default().to_polars_compression(),
            ParquetCompression::Snappy
        ));
    }
}

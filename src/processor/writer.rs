//! Output writing for assembled category tables
//!
//! Parquet keeps the nested `coords` column as is; CSV cannot hold list
//! columns, so paths are rendered as WKT first.

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, SwmmError};
use crate::geometry::coords_as_wkt;

use polars::prelude::{
    CsvWriter, DataFrame, ParquetWriter as PolarsParquetWriter, SerWriter, StatisticsOptions,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one output per category according to an [`OutputConfig`]
#[derive(Debug, Clone)]
pub struct CategoryWriter {
    config: OutputConfig,
}

impl CategoryWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Write or print one category table.
    ///
    /// Returns the written path, or `None` when the table went to stdout.
    pub fn write(&self, category: &str, frame: &DataFrame) -> Result<Option<PathBuf>> {
        let Some(path) = self.config.output_path(category) else {
            println!("{}\n{}", category, frame);
            return Ok(None);
        };

        std::fs::create_dir_all(&self.config.output_dir)?;

        let written = if self.config.format == OutputFormat::Csv {
            write_csv(&path, frame)
        } else {
            self.write_parquet(&path, frame.clone())
        };
        written.map_err(|e| SwmmError::ProcessingFailed {
            category: category.to_string(),
            reason: format!("Failed to write {}: {}", path.display(), e),
        })?;

        debug!("Wrote {} rows to {}", frame.height(), path.display());
        Ok(Some(path))
    }

    fn write_parquet(&self, path: &Path, mut frame: DataFrame) -> Result<()> {
        let file = File::create(path)?;
        PolarsParquetWriter::new(file)
            .with_compression(self.config.compression.to_polars_compression())
            .with_statistics(StatisticsOptions::full())
            .finish(&mut frame)?;
        Ok(())
    }
}

fn write_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    let mut frame = coords_as_wkt(frame)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;
    Ok(())
}

//! Model processing engine.
//!
//! Assembles the requested categories of one model concurrently, then
//! writes each table through the [`CategoryWriter`].

pub mod writer;

#[cfg(test)]
pub mod tests;

use self::writer::CategoryWriter;

use crate::assembler::SectionAssembler;
use crate::config::{AssemblyConfig, OutputConfig};
use crate::error::{Result, SwmmError};
use crate::models::{AssemblyStats, Model};
use crate::registry::CategoryRegistry;

use colored::*;
use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::debug;

/// Main processor turning one SWMM model into category tables
#[derive(Debug)]
pub struct ModelProcessor {
    model: Arc<Model>,
    registry: Arc<CategoryRegistry>,
    assembly: AssemblyConfig,
    writer: CategoryWriter,
    show_progress: bool,
}

impl ModelProcessor {
    /// Open the model files and use the built-in SWMM registry
    pub fn new(inp_path: PathBuf, rpt_path: Option<PathBuf>) -> Result<Self> {
        let model = Model::open(inp_path, rpt_path)?;
        Ok(Self::from_model(model))
    }

    pub fn from_model(model: Model) -> Self {
        Self {
            model: Arc::new(model),
            registry: Arc::new(CategoryRegistry::swmm()),
            assembly: AssemblyConfig::default(),
            writer: CategoryWriter::new(OutputConfig::default()),
            show_progress: true,
        }
    }

    pub fn with_registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_assembly_config(mut self, config: AssemblyConfig) -> Self {
        self.assembly = config;
        self
    }

    pub fn with_output_config(mut self, config: OutputConfig) -> Self {
        self.writer = CategoryWriter::new(config);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Assemble categories in parallel, one blocking task each.
    ///
    /// Results keep the order of `categories`; the first failure aborts.
    pub async fn assemble_all(&self, categories: &[String]) -> Result<Vec<(String, DataFrame)>> {
        for category in categories {
            self.registry.get(category)?;
        }

        let progress_bar = if self.show_progress {
            ProgressBar::new(categories.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| SwmmError::Configuration {
                    message: format!("Invalid progress template: {}", e),
                })?
                .progress_chars("#>-"),
        );
        progress_bar.set_message("Assembling categories...");

        let tasks = categories.iter().map(|category| {
            let model = Arc::clone(&self.model);
            let registry = Arc::clone(&self.registry);
            let config = self.assembly.clone();
            let category = category.clone();
            let progress_bar = progress_bar.clone();

            async move {
                let name = category.clone();
                let frame = task::spawn_blocking(move || {
                    SectionAssembler::new(&registry)
                        .with_config(config)
                        .assemble(&model, &name)
                })
                .await
                .map_err(|e| SwmmError::ProcessingFailed {
                    category: category.clone(),
                    reason: format!("Assembly task failed: {}", e),
                })??;

                progress_bar.inc(1);
                Ok::<_, SwmmError>((category, frame))
            }
        });

        let frames = try_join_all(tasks).await;
        progress_bar.finish_and_clear();
        frames
    }

    /// Assemble and write every requested category
    pub async fn process(&self, categories: &[String]) -> Result<AssemblyStats> {
        let start_time = Instant::now();
        println!("{}", "Starting SWMM section assembly".bright_green().bold());
        println!(
            "  {} {}",
            "Model:".bright_cyan(),
            self.model.inp_path().display()
        );
        match self.model.rpt_path() {
            Some(rpt) => println!("  {} {}", "Report:".bright_cyan(), rpt.display()),
            None => println!("  {} {}", "Report:".bright_cyan(), "none".bright_black()),
        }
        println!(
            "  {} {}",
            "Categories:".bright_cyan(),
            categories.join(", ")
        );

        let frames = self.assemble_all(categories).await?;

        let mut stats = AssemblyStats::default();
        for (category, frame) in &frames {
            if frame.height() == 0 {
                debug!("Category {} has no elements", category);
                stats.categories_empty += 1;
            }
            stats.categories_assembled += 1;
            stats.total_rows += frame.height();

            if let Some(path) = self.writer.write(category, frame)? {
                stats.outputs.push(path);
            }
        }
        stats.processing_time_ms = start_time.elapsed().as_millis();

        print_summary(&stats);
        Ok(stats)
    }
}

fn print_summary(stats: &AssemblyStats) {
    println!("\n{}", "Assembly Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Categories assembled:".bright_cyan(),
        stats.categories_assembled.to_string().bright_white()
    );
    if stats.categories_empty > 0 {
        println!(
            "  {} {}",
            "Empty categories:".bright_yellow(),
            stats.categories_empty.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Total rows:".bright_cyan(),
        stats.total_rows.to_string().bright_white().bold()
    );
    for path in &stats.outputs {
        println!("  {} {}", "Wrote".bright_green(), path.display());
    }
}

//! Section assembly engine.
//!
//! Builds one table per element category by folding the category's network
//! sections together on the element identifier, left-joining the report
//! blocks when the model has a report, and reconstructing link geometry for
//! link-like categories.

pub mod join;

#[cfg(test)]
pub mod tests;

use self::join::join_on_key;

use crate::config::{AssemblyConfig, MissingCoordinatePolicy};
use crate::error::{Result, SwmmError};
use crate::geometry::{coords_series, resolve};
use crate::inp::InpReader;
use crate::models::Model;
use crate::reader::SectionReader;
use crate::registry::{CategoryConfig, CategoryRegistry, SectionJoin};
use crate::rpt::RptReader;
use crate::schema::{
    ELEMENT_ID, INLET_NODE, OUTLET_NODE, coerce_to_string, empty_section_frame, normalize_key,
};

use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Assembles category tables for models, reading network sections with `N`
/// and report blocks with `R`.
#[derive(Debug)]
pub struct SectionAssembler<'r, N = InpReader, R = RptReader> {
    registry: &'r CategoryRegistry,
    network: N,
    results: R,
    config: AssemblyConfig,
}

impl<'r> SectionAssembler<'r> {
    /// Assembler reading SWMM `.inp` and `.rpt` files
    pub fn new(registry: &'r CategoryRegistry) -> Self {
        Self::with_readers(registry, InpReader, RptReader)
    }
}

impl<'r, N, R> SectionAssembler<'r, N, R>
where
    N: SectionReader,
    R: SectionReader,
{
    pub fn with_readers(registry: &'r CategoryRegistry, network: N, results: R) -> Self {
        Self {
            registry,
            network,
            results,
            config: AssemblyConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AssemblyConfig) -> Self {
        self.config = config;
        self
    }

    /// Unified table for one registered category
    pub fn assemble(&self, model: &Model, category: &str) -> Result<DataFrame> {
        let config = self.registry.get(category)?;
        let frame = self.assemble_config(model, config)?;
        info!(
            "Assembled {} for {}: {} rows x {} columns",
            category,
            model.name(),
            frame.height(),
            frame.width()
        );
        Ok(frame)
    }

    /// Unified table for a caller-chosen list of sections.
    ///
    /// Every network section is outer-joined and no geometry is resolved.
    pub fn assemble_sections<S: AsRef<str>>(
        &self,
        model: &Model,
        network_sections: &[S],
        results_sections: &[S],
    ) -> Result<DataFrame> {
        let config = CategoryConfig::new(
            network_sections.iter().map(|s| s.as_ref().to_string()),
            results_sections.iter().map(|s| s.as_ref().to_string()),
        );
        self.assemble_config(model, &config)
    }

    /// Run the join pipeline for an explicit category configuration
    pub fn assemble_config(&self, model: &Model, config: &CategoryConfig) -> Result<DataFrame> {
        let Some((first, rest)) = config.network_sections().split_first() else {
            return Ok(empty_section_frame());
        };

        let seed = self.read_network(model, &first.name)?;
        let mut frame = rest.iter().try_fold(seed, |base, section| {
            let other = self.read_network(model, &section.name)?;
            let how = match section.join {
                SectionJoin::Outer => JoinType::Full,
                SectionJoin::Lookup => JoinType::Left,
            };
            join_on_key(base, other, how)
        })?;

        if frame.height() == 0 {
            debug!("No elements found; skipping results and geometry");
            return Ok(frame);
        }

        // Full results joins can add report-only rows; those carry no geometry
        let network_ids = if self.config.retain_orphan_results && config.is_link_like() {
            Some(element_ids(&frame)?)
        } else {
            None
        };

        if let Some(rpt_path) = model.rpt_path() {
            frame = config
                .results_sections()
                .iter()
                .try_fold(frame, |base, section| {
                    let other = normalize_key(self.results.read_section(rpt_path, section)?)?;
                    debug!("Read report block '{}': {} rows", section, other.height());
                    let how = if self.config.retain_orphan_results {
                        JoinType::Full
                    } else {
                        JoinType::Left
                    };
                    join_on_key(base, other, how)
                })?;
        }

        coerce_to_string(&mut frame, INLET_NODE)?;
        coerce_to_string(&mut frame, OUTLET_NODE)?;

        if config.is_link_like() {
            frame = self.attach_geometry(frame, model, network_ids.as_ref())?;
        }

        Ok(frame)
    }

    fn read_network(&self, model: &Model, section: &str) -> Result<DataFrame> {
        let frame = normalize_key(self.network.read_section(model.inp_path(), section)?)?;
        debug!("Read [{}]: {} rows", section, frame.height());
        Ok(frame)
    }

    /// Add the `coords` column, applying the missing-coordinate policy.
    ///
    /// Rows whose identifier is outside `network_ids` came from the report
    /// alone and get a null path.
    fn attach_geometry(
        &self,
        frame: DataFrame,
        model: &Model,
        network_ids: Option<&HashSet<String>>,
    ) -> Result<DataFrame> {
        for required in [INLET_NODE, OUTLET_NODE] {
            if frame.get_column_index(required).is_none() {
                return Err(SwmmError::Configuration {
                    message: format!("link table has no {} column", required),
                });
            }
        }

        let mut keep = Vec::with_capacity(frame.height());
        let mut paths = Vec::with_capacity(frame.height());
        {
            let ids = frame.column(ELEMENT_ID)?.as_materialized_series().str()?;
            let inlets = frame.column(INLET_NODE)?.as_materialized_series().str()?;
            let outlets = frame.column(OUTLET_NODE)?.as_materialized_series().str()?;

            for row in 0..frame.height() {
                let element = ids.get(row).unwrap_or_default();
                if network_ids.is_some_and(|known| !known.contains(element)) {
                    debug!("{} only appears in the report; no geometry", element);
                    keep.push(true);
                    paths.push(None);
                    continue;
                }

                let resolved = match (inlets.get(row), outlets.get(row)) {
                    (Some(inlet), Some(outlet)) => resolve(
                        element,
                        inlet,
                        outlet,
                        model.coordinates(),
                        model.vertices(),
                    ),
                    (inlet, _) => Err(SwmmError::MissingEndpoint {
                        element: element.to_string(),
                        column: (if inlet.is_none() { INLET_NODE } else { OUTLET_NODE })
                            .to_string(),
                    }),
                };

                match resolved {
                    Ok(path) => {
                        keep.push(true);
                        paths.push(Some(path));
                    }
                    Err(err) => match self.config.missing_coordinates {
                        MissingCoordinatePolicy::Fail => return Err(err),
                        MissingCoordinatePolicy::DropRow => {
                            warn!("Dropping {}: {}", element, err);
                            keep.push(false);
                        }
                    },
                }
            }
        }

        let mut frame = if keep.iter().all(|k| *k) {
            frame
        } else {
            let mask = BooleanChunked::from_slice("keep".into(), &keep);
            frame.filter(&mask)?
        };

        frame.with_column(coords_series(&paths)?)?;
        Ok(frame)
    }
}

fn element_ids(frame: &DataFrame) -> Result<HashSet<String>> {
    let ids = frame.column(ELEMENT_ID)?.as_materialized_series().str()?;
    Ok(ids.into_iter().flatten().map(str::to_string).collect())
}

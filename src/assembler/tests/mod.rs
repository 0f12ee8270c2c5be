//! Assembly pipeline tests
//!
//! Exercise the join pipeline against in-memory section readers so each
//! property can be checked without writing model files.


use crate::error::{Result, SwmmError};
use crate::models::{CoordinateTable, Model, VertexTable};
use crate::reader::SectionReader;
use crate::schema::empty_section_frame;
use polars::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reader serving sections from memory; unknown sections are absent
#[derive(Debug, Default)]
pub struct MemoryReader {
    sections: HashMap<String, DataFrame>,
    calls: Rc<Cell<usize>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, name: &str, frame: DataFrame) -> Self {
        self.sections.insert(name.to_string(), frame);
        self
    }

    /// Shared read counter that outlives the reader
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl SectionReader for MemoryReader {
    fn read_section(&self, _path: &Path, section: &str) -> Result<DataFrame> {
        self.calls.set(self.calls.get() + 1);
        Ok(self
            .sections
            .get(section)
            .cloned()
            .unwrap_or_else(empty_section_frame))
    }
}

/// Reader that must never be consulted
#[derive(Debug, Default)]
pub struct FailingReader;

impl SectionReader for FailingReader {
    fn read_section(&self, _path: &Path, section: &str) -> Result<DataFrame> {
        Err(SwmmError::Configuration {
            message: format!("unexpected read of '{}'", section),
        })
    }
}

pub fn model(coordinates: CoordinateTable, vertices: VertexTable) -> Model {
    Model::from_parts(
        "model.inp",
        Some(PathBuf::from("model.rpt")),
        coordinates,
        vertices,
    )
}

pub fn two_nodes() -> CoordinateTable {
    [("1", (0.0, 0.0)), ("2", (10.0, 0.0))].into_iter().collect()
}

pub fn conduits_section() -> DataFrame {
    polars::df!(
        "Name" => &["C1"],
        "InletNode" => &[1i64],
        "OutletNode" => &[2i64]
    )
    .unwrap()
}

pub fn xsections_section() -> DataFrame {
    polars::df!("Name" => &["C1"], "Shape" => &["CIRCULAR"]).unwrap()
}

pub fn link_flow_section() -> DataFrame {
    polars::df!("Name" => &["C1"], "MaxFlow" => &[12.3]).unwrap()
}

pub fn strings(frame: &DataFrame, column: &str) -> Vec<Option<String>> {
    frame
        .column(column)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

pub fn floats(frame: &DataFrame, column: &str) -> Vec<Option<f64>> {
    frame
        .column(column)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

//! SWMM Sections Library
//!
//! Assembles the section tables of a SWMM network file (`.inp`) and its
//! simulation report (`.rpt`) into one unified table per element category,
//! keyed by element name, with path geometry for link-like categories.
//!
//! This library provides tools for:
//! - Reading `.inp` sections and `.rpt` summary blocks as typed DataFrames
//! - Declaring element categories in an immutable registry
//! - Folding sections together with deterministic row order
//! - Reconstructing link paths from node coordinates and vertices
//! - Writing category tables to CSV or Parquet

pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod inp;
pub mod models;
pub mod processor;
pub mod reader;
pub mod registry;
pub mod rpt;
pub mod schema;

pub use assembler::SectionAssembler;
pub use config::{AssemblyConfig, MissingCoordinatePolicy, OutputConfig};
pub use error::{Result, SwmmError};
pub use models::{CoordinateTable, Model, Point, VertexTable};
pub use processor::ModelProcessor;
pub use reader::SectionReader;
pub use registry::{CategoryConfig, CategoryRegistry};

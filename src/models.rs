//! Core data structures for SWMM section assembly.
//!
//! Defines the model handle, spatial lookup tables and the per-run
//! statistics reported by the CLI.

use crate::error::{Result, SwmmError};
use crate::inp::{read_coordinates, read_vertices};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A planar point in model coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Node identifier to point location
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    points: HashMap<String, Point>,
}

impl CoordinateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: impl Into<String>, point: impl Into<Point>) {
        self.points.insert(node.into(), point.into());
    }

    pub fn get(&self, node: &str) -> Option<Point> {
        self.points.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<K: Into<String>, P: Into<Point>> FromIterator<(K, P)> for CoordinateTable {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (node, point) in iter {
            table.insert(node, point);
        }
        table
    }
}

/// Link identifier to its intermediate bend points, in inlet-to-outlet order.
///
/// Endpoints are not stored here; they come from the [`CoordinateTable`].
#[derive(Debug, Clone, Default)]
pub struct VertexTable {
    paths: HashMap<String, Vec<Point>>,
}

impl VertexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex to the end of a link's path
    pub fn push(&mut self, link: impl Into<String>, point: impl Into<Point>) {
        self.paths
            .entry(link.into())
            .or_default()
            .push(point.into());
    }

    /// Intermediate points for a link; empty when the link is a straight segment
    pub fn get(&self, link: &str) -> &[Point] {
        self.paths.get(link).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of links with at least one vertex
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<K: Into<String>, P: Into<Point>> FromIterator<(K, P)> for VertexTable {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (link, point) in iter {
            table.push(link, point);
        }
        table
    }
}

/// Handle on one SWMM model: its network file, optional report and
/// the spatial tables loaded from the network file.
#[derive(Debug, Clone)]
pub struct Model {
    inp_path: PathBuf,
    rpt_path: Option<PathBuf>,
    coordinates: CoordinateTable,
    vertices: VertexTable,
}

impl Model {
    /// Open a model, loading `[COORDINATES]` and `[VERTICES]` from the network file
    pub fn open(inp_path: impl Into<PathBuf>, rpt_path: Option<PathBuf>) -> Result<Self> {
        let inp_path = inp_path.into();
        if !inp_path.exists() {
            return Err(SwmmError::ModelNotFound { path: inp_path });
        }
        if let Some(rpt) = &rpt_path {
            if !rpt.exists() {
                return Err(SwmmError::ModelNotFound { path: rpt.clone() });
            }
        }

        let coordinates = read_coordinates(&inp_path)?;
        let vertices = read_vertices(&inp_path)?;

        debug!(
            "Opened model {}: {} node coordinates, {} links with vertices",
            inp_path.display(),
            coordinates.len(),
            vertices.len()
        );

        Ok(Self {
            inp_path,
            rpt_path,
            coordinates,
            vertices,
        })
    }

    /// Build a model handle from tables the caller already holds
    pub fn from_parts(
        inp_path: impl Into<PathBuf>,
        rpt_path: Option<PathBuf>,
        coordinates: CoordinateTable,
        vertices: VertexTable,
    ) -> Self {
        Self {
            inp_path: inp_path.into(),
            rpt_path,
            coordinates,
            vertices,
        }
    }

    pub fn inp_path(&self) -> &Path {
        &self.inp_path
    }

    pub fn rpt_path(&self) -> Option<&Path> {
        self.rpt_path.as_deref()
    }

    pub fn coordinates(&self) -> &CoordinateTable {
        &self.coordinates
    }

    pub fn vertices(&self) -> &VertexTable {
        &self.vertices
    }

    /// Model name derived from the network file stem
    pub fn name(&self) -> String {
        self.inp_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

/// Statistics for one CLI run
#[derive(Debug, Default)]
pub struct AssemblyStats {
    pub categories_assembled: usize,
    pub categories_empty: usize,
    pub total_rows: usize,
    pub outputs: Vec<PathBuf>,
    pub processing_time_ms: u128,
}

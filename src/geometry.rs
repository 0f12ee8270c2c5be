//! Link geometry reconstruction.
//!
//! A link's path is its inlet node's coordinate, then its stored bend points
//! in inlet-to-outlet order, then its outlet node's coordinate. Paths are
//! stored in the assembled table as a `List(List(Float64))` column where each
//! inner list is one `[x, y]` pair.

use crate::error::{Result, SwmmError};
use crate::models::{CoordinateTable, Point, VertexTable};
use crate::schema::COORDS;
use polars::prelude::*;

/// Ordered point sequence of one link.
///
/// Fails with `MissingCoordinate` when either endpoint has no coordinate.
/// A link whose inlet and outlet coincide yields a closed path; nothing is
/// deduplicated.
pub fn resolve(
    element: &str,
    inlet: &str,
    outlet: &str,
    coordinates: &CoordinateTable,
    vertices: &VertexTable,
) -> Result<Vec<Point>> {
    let endpoint = |node: &str| {
        coordinates
            .get(node)
            .ok_or_else(|| SwmmError::MissingCoordinate {
                element: element.to_string(),
                node: node.to_string(),
            })
    };

    let start = endpoint(inlet)?;
    let end = endpoint(outlet)?;
    let bends = vertices.get(element);

    let mut path = Vec::with_capacity(bends.len() + 2);
    path.push(start);
    path.extend_from_slice(bends);
    path.push(end);
    Ok(path)
}

fn coords_dtype() -> DataType {
    DataType::List(Box::new(DataType::List(Box::new(DataType::Float64))))
}

/// Build the `coords` column from per-row paths; `None` rows stay null
pub fn coords_series(paths: &[Option<Vec<Point>>]) -> Result<Series> {
    if paths.is_empty() {
        return Ok(Series::new_empty(COORDS.into(), &coords_dtype()));
    }

    let rows: Vec<Option<Series>> = paths
        .iter()
        .map(|path| {
            path.as_ref().map(|path| {
                let pairs: Vec<Series> = path
                    .iter()
                    .map(|p| Series::new(PlSmallStr::EMPTY, [p.x, p.y]))
                    .collect();
                Series::new(PlSmallStr::EMPTY, pairs)
            })
        })
        .collect();

    // all-null input carries no inner type of its own
    Ok(Series::new(COORDS.into(), rows).cast(&coords_dtype())?)
}

/// Read one row's path back out of an assembled table; a null row reads as
/// an empty path
pub fn coords_at(frame: &DataFrame, row: usize) -> Result<Vec<Point>> {
    let column = frame.column(COORDS)?;
    let paths = column.as_materialized_series().list()?;

    let Some(path) = paths.get_as_series(row) else {
        return Ok(Vec::new());
    };
    let pairs = path.list()?;

    let mut points = Vec::with_capacity(pairs.len());
    for idx in 0..pairs.len() {
        let Some(pair) = pairs.get_as_series(idx) else {
            continue;
        };
        let pair = pair.f64()?;
        if let (Some(x), Some(y)) = (pair.get(0), pair.get(1)) {
            points.push(Point::new(x, y));
        }
    }
    Ok(points)
}

/// Well-known-text rendering of a path
pub fn to_wkt(points: &[Point]) -> String {
    if points.is_empty() {
        return "LINESTRING EMPTY".to_string();
    }
    let body = points
        .iter()
        .map(|p| format!("{} {}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(", ");
    format!("LINESTRING ({})", body)
}

/// Replace the `coords` list column with its WKT text, for flat outputs like CSV
pub fn coords_as_wkt(frame: &DataFrame) -> Result<DataFrame> {
    if frame.get_column_index(COORDS).is_none() {
        return Ok(frame.clone());
    }

    let nulls = frame.column(COORDS)?.as_materialized_series().is_null();
    let wkt = (0..frame.height())
        .map(|row| {
            if nulls.get(row).unwrap_or(true) {
                Ok(None)
            } else {
                coords_at(frame, row).map(|points| Some(to_wkt(&points)))
            }
        })
        .collect::<Result<Vec<Option<String>>>>()?;

    let mut flat = frame.clone();
    flat.with_column(Series::new(COORDS.into(), wkt))?;
    Ok(flat)
}

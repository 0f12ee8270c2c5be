//! Section schemas and keyed table construction.
//!
//! Holds the column headers of the SWMM network and report sections this
//! crate knows about, and turns tokenized section records into polars
//! DataFrames keyed by the `Name` column with inferred column types.

use crate::error::{Result, SwmmError};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Key column of every section table
pub const ELEMENT_ID: &str = "Name";

pub const INLET_NODE: &str = "InletNode";
pub const OUTLET_NODE: &str = "OutletNode";

/// Column holding reconstructed link geometry
pub const COORDS: &str = "coords";

/// One tokenized data line of a section
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line number in the source file
    pub line: usize,
    pub tokens: Vec<String>,
}

impl Record {
    pub fn new(line: usize, tokens: Vec<String>) -> Self {
        Self { line, tokens }
    }
}

/// Column headers for a network (`.inp`) section. The first entry is the key.
pub fn inp_columns(section: &str) -> Option<&'static [&'static str]> {
    let columns: &'static [&'static str] = match section.to_ascii_uppercase().as_str() {
        "JUNCTIONS" => &[
            "Name",
            "InvertElev",
            "MaxDepth",
            "InitDepth",
            "SurchargeDepth",
            "PondedArea",
        ],
        "OUTFALLS" => &[
            "Name",
            "InvertElev",
            "OutfallType",
            "StageOrTimeseries",
            "TideGate",
            "RouteTo",
        ],
        "STORAGE" => &[
            "Name",
            "InvertElev",
            "MaxDepth",
            "InitDepth",
            "StorageCurve",
            "Coefficient",
            "Exponent",
            "Constant",
            "PondedArea",
            "EvapFrac",
            "SuctionHead",
            "Conductivity",
            "InitialDeficit",
        ],
        "DIVIDERS" => &[
            "Name",
            "Elevation",
            "DivertedLink",
            "DividerType",
            "Parameters",
            "MaxDepth",
            "InitDepth",
            "SurchargeDepth",
            "PondedArea",
        ],
        "CONDUITS" => &[
            "Name",
            "InletNode",
            "OutletNode",
            "Length",
            "Roughness",
            "InOffset",
            "OutOffset",
            "InitFlow",
            "MaxFlow",
        ],
        "PUMPS" => &[
            "Name",
            "InletNode",
            "OutletNode",
            "PumpCurve",
            "InitStatus",
            "Startup",
            "Shutoff",
        ],
        "ORIFICES" => &[
            "Name",
            "InletNode",
            "OutletNode",
            "OrificeType",
            "CrestHeight",
            "DischCoeff",
            "FlapGate",
            "OpenCloseTime",
        ],
        "WEIRS" => &[
            "Name",
            "InletNode",
            "OutletNode",
            "WeirType",
            "CrestHeight",
            "DischCoeff",
            "FlapGate",
            "EndCon",
            "EndCoeff",
            "Surcharge",
            "RoadWidth",
            "RoadSurf",
            "CoeffCurve",
        ],
        "OUTLETS" => &[
            "Name",
            "InletNode",
            "OutletNode",
            "OutflowHeight",
            "OutletType",
            "QCoeffOrCurve",
            "QExponent",
            "FlapGate",
        ],
        "XSECTIONS" => &[
            "Name", "Shape", "Geom1", "Geom2", "Geom3", "Geom4", "Barrels", "Culvert",
        ],
        "LOSSES" => &[
            "Name",
            "KEntry",
            "KExit",
            "KAvg",
            "LossFlapGate",
            "Seepage",
        ],
        "SUBCATCHMENTS" => &[
            "Name",
            "Raingage",
            "Outlet",
            "Area",
            "PercImperv",
            "Width",
            "PercSlope",
            "CurbLength",
            "SnowPack",
        ],
        "SUBAREAS" => &[
            "Name",
            "N-Imperv",
            "N-Perv",
            "S-Imperv",
            "S-Perv",
            "PctZero",
            "RouteTo",
            "PctRouted",
        ],
        "INFILTRATION" => &[
            "Name",
            "InfParam1",
            "InfParam2",
            "InfParam3",
            "InfParam4",
            "InfParam5",
            "InfMethod",
        ],
        "COORDINATES" => &["Name", "X", "Y"],
        "VERTICES" => &["Name", "X", "Y"],
        "POLYGONS" => &["Name", "X", "Y"],
        _ => return None,
    };
    Some(columns)
}

/// Column headers for a report (`.rpt`) summary block. The first entry is the key.
pub fn rpt_columns(section: &str) -> Option<&'static [&'static str]> {
    let columns: &'static [&'static str] = match section.to_ascii_lowercase().as_str() {
        "link flow summary" => &[
            "Name", "Type", "MaxQ", "MaxDay", "MaxHr", "MaxV", "MaxQPerc", "MaxDPerc",
        ],
        "node depth summary" => &[
            "Name",
            "Type",
            "AvgDepth",
            "MaxNodeDepth",
            "MaxHGL",
            "MaxDay_depth",
            "MaxHr_depth",
            "MaxReportedDepth",
        ],
        "node inflow summary" => &[
            "Name",
            "Type",
            "MaxLatInflow",
            "MaxTotalInflow",
            "MaxDay_inflow",
            "MaxHr_inflow",
            "LatInflowV",
            "TotalInflowV",
            "FlowBalErrorPerc",
        ],
        "node flooding summary" => &[
            "Name",
            "HoursFlooded",
            "MaxQFlooding",
            "MaxDay_flood",
            "MaxHr_flood",
            "TotalFloodVol",
            "MaximumPondDepth",
        ],
        "node surcharge summary" => &[
            "Name",
            "Type",
            "HourSurcharged",
            "MaxHeightAboveCrown",
            "MinDepthBelowRim",
        ],
        "conduit surcharge summary" => &[
            "Name",
            "HoursBothFull",
            "HoursUpstreamFull",
            "HoursDownstreamFull",
            "HoursAboveFullNormalFlow",
            "HoursCapacityLimited",
        ],
        "subcatchment runoff summary" => &[
            "Name",
            "TotalPrecip",
            "TotalRunon",
            "TotalEvap",
            "TotalInfil",
            "ImpervRunoff",
            "PervRunoff",
            "TotalRunoffIn",
            "TotalRunoffMG",
            "PeakRunoff",
            "RunoffCoeff",
        ],
        _ => return None,
    };
    Some(columns)
}

/// Columns that reference other elements by identifier and stay textual
fn is_identifier_column(name: &str) -> bool {
    matches!(
        name,
        "Name"
            | "InletNode"
            | "OutletNode"
            | "Outlet"
            | "Raingage"
            | "RouteTo"
            | "DivertedLink"
            | "StorageCurve"
            | "PumpCurve"
            | "QCoeffOrCurve"
            | "CoeffCurve"
            | "StageOrTimeseries"
    )
}

/// Table for a section that does not exist in the file: only the key column
pub fn empty_section_frame() -> DataFrame {
    let key = Series::new_empty(ELEMENT_ID.into(), &DataType::String);
    DataFrame::new(vec![Column::from(key)]).unwrap_or_default()
}

/// Build a keyed table from tokenized records.
///
/// Known sections take their headers from `headers`; unknown ones get
/// `Name` followed by `col1..colN`. Short records are padded with nulls, long
/// ones are a parse error.
pub fn build_section_frame(
    path: &Path,
    section: &str,
    headers: Option<&[&str]>,
    records: &[Record],
) -> Result<DataFrame> {
    let names: Vec<String> = match headers {
        Some(headers) => headers
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { ELEMENT_ID } else { *h }.to_string())
            .collect(),
        None => {
            let width = records.iter().map(|r| r.tokens.len()).max().unwrap_or(1).max(1);
            std::iter::once(ELEMENT_ID.to_string())
                .chain((1..width).map(|i| format!("col{}", i)))
                .collect()
        }
    };

    if let Some(record) = records.iter().find(|r| r.tokens.len() > names.len()) {
        return Err(SwmmError::section_parse(
            path,
            section,
            record.line,
            format!(
                "expected at most {} fields, found {}",
                names.len(),
                record.tokens.len()
            ),
        ));
    }

    let columns = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<Option<&str>> = records
                .iter()
                .map(|r| r.tokens.get(i).map(String::as_str))
                .collect();
            infer_column(name, &values)
        })
        .collect::<Vec<_>>();

    let frame = DataFrame::new(columns)?;
    debug!(
        "Built [{}] table from {}: {} rows x {} columns",
        section,
        path.display(),
        frame.height(),
        frame.width()
    );
    Ok(frame)
}

/// Pick the narrowest type every present value parses as
fn infer_column(name: &str, values: &[Option<&str>]) -> Column {
    let present: Vec<&str> = values.iter().flatten().copied().collect();
    let series = if is_identifier_column(name) || present.is_empty() {
        Series::new(name.into(), values.to_vec())
    } else if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        let parsed: Vec<Option<i64>> = values
            .iter()
            .map(|v| v.and_then(|s| s.parse().ok()))
            .collect();
        Series::new(name.into(), parsed)
    } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        let parsed: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.and_then(|s| s.parse().ok()))
            .collect();
        Series::new(name.into(), parsed)
    } else {
        Series::new(name.into(), values.to_vec())
    };
    Column::from(series)
}

/// Cast the key column to String so joins compare identifiers textually
pub fn normalize_key(mut frame: DataFrame) -> Result<DataFrame> {
    let key = frame.column(ELEMENT_ID)?.cast(&DataType::String)?;
    frame.with_column(key)?;
    Ok(frame)
}

/// Cast a column to String when present
pub fn coerce_to_string(frame: &mut DataFrame, name: &str) -> Result<()> {
    if frame.get_column_index(name).is_some() {
        let column = frame.column(name)?.cast(&DataType::String)?;
        frame.with_column(column)?;
    }
    Ok(())
}

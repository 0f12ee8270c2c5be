//! SWMM network (`.inp`) section parsing.
//!
//! A network file is a sequence of `[SECTION]` blocks holding
//! whitespace-separated records, with `;` starting a comment. Sections are
//! read on demand: every call scans the file for the requested block only.

use crate::error::{Result, SwmmError};
use crate::models::{CoordinateTable, Point, VertexTable};
use crate::reader::SectionReader;
use crate::schema::{Record, build_section_frame, empty_section_frame, inp_columns};
use polars::prelude::DataFrame;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Section reader for SWMM network files
#[derive(Debug, Clone, Copy, Default)]
pub struct InpReader;

impl SectionReader for InpReader {
    fn read_section(&self, path: &Path, section: &str) -> Result<DataFrame> {
        match read_records(path, section)? {
            Some(records) => build_section_frame(path, section, inp_columns(section), &records),
            None => {
                debug!("Section [{}] absent from {}", section, path.display());
                Ok(empty_section_frame())
            }
        }
    }
}

/// Section name of a `[NAME]` header line
fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Record content with any `;` comment removed
fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Tokenized records of one section, or `None` when the file has no such section
pub fn read_records(path: &Path, section: &str) -> Result<Option<Vec<Record>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;

        if let Some(name) = section_header(&line) {
            if records.is_some() {
                break;
            }
            if name.eq_ignore_ascii_case(section) {
                records = Some(Vec::new());
            }
            continue;
        }

        let Some(found) = records.as_mut() else {
            continue;
        };

        let content = strip_comment(&line);
        let tokens: Vec<String> = content.split_whitespace().map(str::to_string).collect();
        if !tokens.is_empty() {
            found.push(Record::new(line_num + 1, tokens));
        }
    }

    Ok(records)
}

fn parse_point(path: &Path, section: &str, record: &Record) -> Result<(String, Point)> {
    let parse = |idx: usize| -> Result<f64> {
        let token = record.tokens.get(idx).ok_or_else(|| {
            SwmmError::section_parse(path, section, record.line, "missing coordinate value")
        })?;
        token.parse::<f64>().map_err(|_| {
            SwmmError::section_parse(
                path,
                section,
                record.line,
                format!("invalid coordinate '{}'", token),
            )
        })
    };

    if record.tokens.len() > 3 {
        return Err(SwmmError::section_parse(
            path,
            section,
            record.line,
            format!("expected 3 fields, found {}", record.tokens.len()),
        ));
    }

    let x = parse(1)?;
    let y = parse(2)?;
    Ok((record.tokens[0].clone(), Point::new(x, y)))
}

/// Node locations from the `[COORDINATES]` section
pub fn read_coordinates(path: &Path) -> Result<CoordinateTable> {
    let mut table = CoordinateTable::new();
    for record in read_records(path, "COORDINATES")?.unwrap_or_default() {
        let (node, point) = parse_point(path, "COORDINATES", &record)?;
        table.insert(node, point);
    }
    Ok(table)
}

/// Link bend points from the `[VERTICES]` section, in file order
pub fn read_vertices(path: &Path) -> Result<VertexTable> {
    let mut table = VertexTable::new();
    for record in read_records(path, "VERTICES")?.unwrap_or_default() {
        let (link, point) = parse_point(path, "VERTICES", &record)?;
        table.push(link, point);
    }
    Ok(table)
}

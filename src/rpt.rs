//! SWMM report (`.rpt`) summary block parsing.
//!
//! Report summaries are titled blocks framed by rules of `*`, followed by a
//! column header framed by dashed rules and then one line per element until
//! the first blank line:
//!
//! ```text
//!   ***********************
//!   Link Flow Summary
//!   ***********************
//!
//!   --------------------------------------------------------------
//!   Link                 Type          CFS  days hr:min    ft/sec
//!   --------------------------------------------------------------
//!   C1                   CONDUIT      2.45     0  10:19      6.23
//! ```

use crate::error::Result;
use crate::reader::SectionReader;
use crate::schema::{Record, build_section_frame, empty_section_frame, rpt_columns};
use polars::prelude::DataFrame;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Section reader for SWMM report files
#[derive(Debug, Clone, Copy, Default)]
pub struct RptReader;

impl SectionReader for RptReader {
    fn read_section(&self, path: &Path, section: &str) -> Result<DataFrame> {
        match read_block(path, section)? {
            Some(records) => build_section_frame(path, section, rpt_columns(section), &records),
            None => {
                debug!("Report block '{}' absent from {}", section, path.display());
                Ok(empty_section_frame())
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BlockState {
    Seeking,
    Header { title_closed: bool, rules: usize },
    Table,
}

/// Header captions may carry dashes of their own (`--- Hours Full ---`), so
/// only a line made entirely of dashes frames the header.
fn is_rule(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '-')
}

/// Tokenized table rows of one report block.
///
/// `None` when the title never appears; an empty list when the block exists
/// but carries no table (e.g. "No nodes were flooded.").
pub fn read_block(path: &Path, title: &str) -> Result<Option<Vec<Record>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut state = BlockState::Seeking;
    let mut records: Option<Vec<Record>> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        match state {
            BlockState::Seeking => {
                if trimmed.eq_ignore_ascii_case(title) {
                    records = Some(Vec::new());
                    state = BlockState::Header {
                        title_closed: false,
                        rules: 0,
                    };
                }
            }
            BlockState::Header {
                title_closed,
                rules,
            } => {
                if trimmed.starts_with('*') {
                    if title_closed {
                        // next block started before any table
                        break;
                    }
                    state = BlockState::Header {
                        title_closed: true,
                        rules,
                    };
                } else if is_rule(trimmed) {
                    state = if rules + 1 == 2 {
                        BlockState::Table
                    } else {
                        BlockState::Header {
                            title_closed,
                            rules: rules + 1,
                        }
                    };
                }
            }
            BlockState::Table => {
                if trimmed.is_empty() || is_rule(trimmed) {
                    break;
                }
                let tokens = trimmed.split_whitespace().map(str::to_string).collect();
                if let Some(found) = records.as_mut() {
                    found.push(Record::new(line_num + 1, tokens));
                }
            }
        }
    }

    Ok(records)
}

//! Section reader abstraction.
//!
//! Both the network file and the report file are read one named section at a
//! time into a keyed table. A section that does not exist in the file yields
//! an empty table rather than an error.

use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::Path;

/// Reads one named section of a file into a table keyed by `Name`
pub trait SectionReader {
    fn read_section(&self, path: &Path, section: &str) -> Result<DataFrame>;
}

impl<F> SectionReader for F
where
    F: Fn(&Path, &str) -> Result<DataFrame>,
{
    fn read_section(&self, path: &Path, section: &str) -> Result<DataFrame> {
        self(path, section)
    }
}

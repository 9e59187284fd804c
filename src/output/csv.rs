//! CSV output formatter.

use crate::cli::{Args, CsvEntry};
use crate::data::Node;
use crate::utils::format_size;
use anyhow::{Context, Result};
use csv::Writer;
use std::fs::File;
use std::io::{self, Write};

impl From<&Node> for CsvEntry {
    fn from(node: &Node) -> Self {
        Self {
            kind: node.entry_type.as_str().to_string(),
            file_count: node.file_count,
            size_bytes: node.size,
            size_human: format_size(node.size),
            path: node.path.display().to_string(),
        }
    }
}

/// Serializes rows as CSV (with a header) into `out`.
pub fn write_rows<W: Write>(out: W, rows: &[&Node]) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    for node in rows {
        writer.serialize(CsvEntry::from(*node))?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders rows to `--output`, or to stdout when no file was given.
pub fn render(rows: &[&Node], args: &Args) -> Result<()> {
    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    write_rows(out, rows)?;

    if let Some(path) = &args.output {
        eprintln!("CSV output written to: {}", path.display());
    }
    Ok(())
}

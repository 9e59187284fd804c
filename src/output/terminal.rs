//! Terminal output formatter.
//!
//! Each row reads `[<file count>][<D|F>] <size> <path>`, with the file count
//! digit-grouped and left-aligned so the tag column lines up.

use crate::data::Node;
use crate::utils::{format_size, group_digits};
use anyhow::Result;
use std::io::{self, BufWriter, Write};

/// Formats one row.
pub fn format_row(node: &Node) -> String {
    format!(
        "[{:<7}][{}] {:>10} {}",
        group_digits(node.file_count),
        node.entry_type.tag(),
        format_size(node.size),
        node.path.display()
    )
}

/// Writes rows to `out`, one line per node.
pub fn write_rows<W: Write>(out: &mut W, rows: &[&Node]) -> Result<()> {
    for node in rows {
        writeln!(out, "{}", format_row(node))?;
    }
    out.flush()?;
    Ok(())
}

/// Renders rows to stdout.
pub fn render(rows: &[&Node]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_rows(&mut out, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_file() {
        let node = Node::file("/data/a.bin", 10);
        let row = format_row(&node);
        assert!(row.starts_with("[1      ][F]"));
        assert!(row.ends_with("/data/a.bin"));
    }

    #[test]
    fn test_write_rows_one_line_per_node() {
        let a = Node::file("a", 1);
        let b = Node::file("b", 2048);
        let mut buf = Vec::new();
        write_rows(&mut buf, &[&a, &b]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("KiB"));
    }
}

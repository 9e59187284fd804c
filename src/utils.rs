//! Utility functions for `size-scanner`.
//!
//! This module provides:
//! - IEC size parsing for `--threshold` (`10M`, `500K`, `1.5G`)
//! - Human-readable size and count formatting
//! - Flatten, sort, and threshold filtering of a finished tree
//!
//! Filtering and sorting only rearrange borrowed references; the tree itself
//! is never modified, so a threshold can hide rows but cannot change the
//! totals of the rows that remain.

use crate::cli::SortOrder;
use crate::data::Node;
use crate::error::SizeParseError;
use humansize::{BINARY, FormatSizeOptions};

/// Parses a size like `123`, `10K`, `20m`, or `1.5G` into bytes.
///
/// Suffixes are case-insensitive powers of 1024: `K`, `M`, `G`, `T`.
/// Surrounding whitespace is ignored and an empty string means 0.
///
/// # Examples
/// ```rust
/// use size_scanner::utils::parse_size;
///
/// assert_eq!(parse_size("10K").unwrap(), 10 * 1024);
/// assert_eq!(parse_size("1.5m").unwrap(), 1536 * 1024);
/// assert!(parse_size("ten").is_err());
/// ```
pub fn parse_size(text: &str) -> Result<u64, SizeParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let upper = trimmed.to_ascii_uppercase();
    let multiplier: u64 = match upper.chars().last() {
        Some('K') => 1 << 10,
        Some('M') => 1 << 20,
        Some('G') => 1 << 30,
        Some('T') => 1 << 40,
        _ => 1,
    };

    if multiplier == 1 {
        return upper
            .parse::<u64>()
            .map_err(|e| SizeParseError::invalid(text, e.to_string()));
    }

    let mantissa = &upper[..upper.len() - 1];
    let value: f64 = mantissa
        .trim()
        .parse()
        .map_err(|_| SizeParseError::invalid(text, "expected a number before the unit suffix"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(SizeParseError::invalid(text, "size must be a non-negative number"));
    }

    let bytes = value * multiplier as f64;
    if bytes >= u64::MAX as f64 {
        return Err(SizeParseError::invalid(text, "size is too large"));
    }
    Ok(bytes as u64)
}

/// Formats bytes with binary units and one decimal place, e.g. `1.5 KiB`.
pub fn format_size(bytes: u64) -> String {
    let options = FormatSizeOptions::from(BINARY).decimal_places(1);
    humansize::format_size(bytes, options)
}

/// Groups the digits of `n` in threes: `1234567` becomes `1,234,567`.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Sorts nodes by size. The sort is stable: equal sizes keep their order.
pub fn sort_by_size(nodes: &mut [&Node], order: SortOrder) {
    match order {
        SortOrder::Asc => nodes.sort_by(|a, b| a.size.cmp(&b.size)),
        SortOrder::Desc => nodes.sort_by(|a, b| b.size.cmp(&a.size)),
    }
}

/// Keeps the nodes whose aggregated size is at least `threshold` bytes.
pub fn filter_by_threshold<'a>(nodes: &[&'a Node], threshold: u64) -> Vec<&'a Node> {
    nodes
        .iter()
        .copied()
        .filter(|node| node.size >= threshold)
        .collect()
}

/// Flattens the tree, sorts it by size, and drops rows below `threshold`.
pub fn prepare_rows(root: &Node, threshold: u64, order: SortOrder) -> Vec<&Node> {
    let mut nodes: Vec<&Node> = root.iter().collect();
    sort_by_size(&mut nodes, order);
    filter_by_threshold(&nodes, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn scenario() -> Node {
        let d = Node::directory(
            "r/d",
            BTreeMap::from([
                (OsString::from("b"), Node::file("r/d/b", 20)),
                (OsString::from("c"), Node::file("r/d/c", 5)),
            ]),
        );
        Node::directory(
            "r",
            BTreeMap::from([
                (OsString::from("a"), Node::file("r/a", 10)),
                (OsString::from("d"), d),
            ]),
        )
    }

    #[test]
    fn test_parse_plain_and_suffixed() {
        assert_eq!(parse_size("123").unwrap(), 123);
        assert_eq!(parse_size(" 0 ").unwrap(), 0);
        assert_eq!(parse_size("").unwrap(), 0);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("2m").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1T").unwrap(), 1u64 << 40);
        assert_eq!(parse_size("0.5K").unwrap(), 512);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_size("abc").is_err());
        assert!(parse_size("K").is_err());
        assert!(parse_size("-5").is_err());
        assert!(parse_size("-5K").is_err());
        assert!(parse_size("10X").is_err());
        assert!(parse_size("99999999999T").is_err());
    }

    #[test]
    fn test_format_size_units() {
        assert!(format_size(0).contains('B'));
        assert!(format_size(1536).contains("1.5"));
        assert!(format_size(1536).contains("KiB"));
        assert!(format_size(3 * 1024 * 1024).contains("MiB"));
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }

    #[test]
    fn test_threshold_scenario_descending() {
        let root = scenario();
        let rows = prepare_rows(&root, 15, SortOrder::Desc);
        let sizes: Vec<u64> = rows.iter().map(|n| n.size).collect();
        let paths: Vec<PathBuf> = rows.iter().map(|n| n.path.clone()).collect();

        assert_eq!(sizes, vec![35, 25, 20]);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("r"),
                PathBuf::from("r/d"),
                PathBuf::from("r/d/b")
            ]
        );
    }

    #[test]
    fn test_threshold_does_not_change_values() {
        let root = scenario();
        let before = root.clone();

        let all = prepare_rows(&root, 0, SortOrder::Asc);
        let some = prepare_rows(&root, 21, SortOrder::Asc);

        assert_eq!(all.len(), 5);
        assert_eq!(some.len(), 2);
        for row in &some {
            let same = all.iter().find(|n| n.path == row.path).unwrap();
            assert_eq!(same.size, row.size);
            assert_eq!(same.file_count, row.file_count);
        }
        assert_eq!(root, before);
    }

    #[test]
    fn test_ascending_reversed_equals_descending() {
        let root = scenario();
        let mut asc: Vec<&Node> = root.iter().collect();
        let mut desc = asc.clone();
        sort_by_size(&mut asc, SortOrder::Asc);
        sort_by_size(&mut desc, SortOrder::Desc);
        asc.reverse();

        let asc_paths: Vec<_> = asc.iter().map(|n| &n.path).collect();
        let desc_paths: Vec<_> = desc.iter().map(|n| &n.path).collect();
        assert_eq!(asc_paths, desc_paths);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let x = Node::file("x", 7);
        let y = Node::file("y", 7);
        let z = Node::file("z", 1);
        let mut nodes = vec![&x, &y, &z];

        sort_by_size(&mut nodes, SortOrder::Desc);
        assert_eq!(nodes[0].path, PathBuf::from("x"));
        assert_eq!(nodes[1].path, PathBuf::from("y"));

        sort_by_size(&mut nodes, SortOrder::Asc);
        assert_eq!(nodes[1].path, PathBuf::from("x"));
        assert_eq!(nodes[2].path, PathBuf::from("y"));
    }
}

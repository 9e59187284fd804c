use size_scanner::cli::SortOrder;
use size_scanner::data::Node;
use size_scanner::utils::{
    filter_by_threshold, format_size, group_digits, parse_size, prepare_rows, sort_by_size,
};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

fn tree() -> Node {
    let docs = Node::directory(
        "/home/user/docs",
        BTreeMap::from([
            (OsString::from("big.pdf"), Node::file("/home/user/docs/big.pdf", 4096)),
            (OsString::from("note.txt"), Node::file("/home/user/docs/note.txt", 100)),
        ]),
    );
    Node::directory(
        "/home/user",
        BTreeMap::from([
            (OsString::from("docs"), docs),
            (OsString::from("a.out"), Node::file("/home/user/a.out", 2048)),
        ]),
    )
}

#[test]
fn test_parse_size_iec_suffixes() {
    assert_eq!(parse_size("500K").unwrap(), 500 * 1024);
    assert_eq!(parse_size("10M").unwrap(), 10 * 1024 * 1024);
    assert_eq!(parse_size("10m").unwrap(), 10 * 1024 * 1024);
    assert_eq!(parse_size("2g").unwrap(), 2 * 1024 * 1024 * 1024);
    assert_eq!(parse_size("4096").unwrap(), 4096);
}

#[test]
fn test_parse_size_invalid() {
    let err = parse_size("12Q").unwrap_err();
    assert!(err.to_string().contains("12Q"));
}

#[test]
fn test_sort_by_size() {
    let root = tree();
    let mut nodes: Vec<&Node> = root.iter().collect();

    sort_by_size(&mut nodes, SortOrder::Desc);
    assert_eq!(nodes[0].path, PathBuf::from("/home/user"));
    assert_eq!(nodes[0].size, 6244);
    assert_eq!(nodes[1].path, PathBuf::from("/home/user/docs"));

    sort_by_size(&mut nodes, SortOrder::Asc);
    assert_eq!(nodes[0].path, PathBuf::from("/home/user/docs/note.txt"));
}

#[test]
fn test_filter_by_threshold_hides_small_rows() {
    let root = tree();
    let nodes: Vec<&Node> = root.iter().collect();

    let kept = filter_by_threshold(&nodes, 2048);
    let paths: Vec<_> = kept.iter().map(|n| n.path.clone()).collect();
    assert!(paths.contains(&PathBuf::from("/home/user/a.out")));
    assert!(!paths.contains(&PathBuf::from("/home/user/docs/note.txt")));
    assert_eq!(kept.len(), 4);
}

#[test]
fn test_raising_threshold_only_removes_rows() {
    let root = tree();
    let mut previous = prepare_rows(&root, 0, SortOrder::Desc);
    for threshold in [100, 2048, 4096, 5000, 10_000] {
        let rows = prepare_rows(&root, threshold, SortOrder::Desc);
        assert!(rows.len() <= previous.len());
        for row in &rows {
            assert!(previous.iter().any(|p| p.path == row.path && p.size == row.size));
        }
        previous = rows;
    }
    assert!(previous.is_empty());
}

#[test]
fn test_formatting_helpers() {
    assert!(format_size(4096).contains("KiB"));
    assert_eq!(group_digits(12345), "12,345");
}

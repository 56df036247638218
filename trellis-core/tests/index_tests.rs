// Tests for indexing a content directory from disk

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use trellis_core::{GraphError, IndexOptions, execute_index};
use trellis_scanner::ScanError;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn options(root: &Path) -> IndexOptions {
    IndexOptions {
        root: root.to_path_buf(),
        threads: 3,
        ..IndexOptions::default()
    }
}

fn content_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a/b.md", "See [c](./c.md).");
    write(root, "a/c.md", "Onwards to [y](../x/y.md).");
    write(root, "x/y.md", "---\ntitle: Y\n---\nA leaf.");
    write(root, "x/notes.txt", "not a document [a](../a/b.md)");
    write(root, ".hidden/secret.md", "[b](../a/b.md)");
    dir
}

#[test]
fn test_index_options_default() {
    let options = IndexOptions::default();
    assert_eq!(options.root, Path::new("./content"));
    assert_eq!(options.extension, "md");
    assert_eq!(options.threads, 8);
    assert!(!options.show_progress_bars);
}

#[tokio::test]
async fn test_index_builds_graph_from_disk() {
    let dir = content_tree();
    let graph = execute_index(options(dir.path()), None, None).await.unwrap();

    let ids: Vec<&str> = graph.ids().collect();
    assert_eq!(ids, vec!["a/b", "a/c", "x/y"]);

    assert_eq!(graph.get("a/b").unwrap().links, vec!["a/c"]);
    assert_eq!(graph.get("a/c").unwrap().backlinks, vec!["a/b"]);
    assert_eq!(graph.get("x/y").unwrap().backlinks, vec!["a/c"]);
    assert_eq!(graph.get("x/y").unwrap().content, "A leaf.");
}

#[tokio::test]
async fn test_index_reports_progress_and_results() {
    let dir = content_tree();
    let messages = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let messages_clone = messages.clone();
    let seen_clone = seen.clone();
    execute_index(
        options(dir.path()),
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
        Some(Arc::new(move |doc: &trellis_scanner::ScannedDocument| {
            seen_clone.lock().unwrap().push(doc.id.clone());
        })),
    )
    .await
    .unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.starts_with("Scanning")));
    assert!(messages.iter().any(|m| m == "Linking 3 documents"));

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["a/b", "a/c", "x/y"]);
}

#[tokio::test]
async fn test_index_with_custom_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mdx", "[b](./b.mdx)");
    write(dir.path(), "b.mdx", "");
    write(dir.path(), "c.md", "");

    let graph = execute_index(
        IndexOptions {
            extension: "mdx".to_string(),
            ..options(dir.path())
        },
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.get("b").unwrap().backlinks, vec!["a"]);
}

#[tokio::test]
async fn test_index_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = execute_index(options(&missing), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Scan(ScanError::InvalidRoot(_))));
}

#[tokio::test]
async fn test_index_empty_root() {
    let dir = TempDir::new().unwrap();
    let graph = execute_index(options(dir.path()), None, None).await.unwrap();
    assert!(graph.is_empty());
}

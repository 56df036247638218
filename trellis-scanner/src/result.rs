use crate::extract::LinkExtractor;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One document read from the store, with its raw link targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedDocument {
    pub id: String,
    pub title: String,
    pub path: Option<PathBuf>,
    pub content: String,
    pub raw_links: Vec<String>,
    pub size: usize,
}

impl ScannedDocument {
    /// Parse `raw` as the document `id`.
    ///
    /// Links are taken from the full text; the stored content has any front
    /// matter block removed.
    pub fn parse(id: &str, raw: &str, extractor: &LinkExtractor) -> Self {
        let (_, body) = split_front_matter(raw);
        Self {
            id: id.to_string(),
            title: title_for(id).to_string(),
            path: None,
            content: body.to_string(),
            raw_links: extractor.extract(raw),
            size: raw.len(),
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Display title: the last segment of the identifier.
pub fn title_for(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Split a leading `---` front matter block from the document body.
///
/// The block must open on the first line and close with `---` or `...`.
/// Without a closing line the whole text is body.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let mut lines = raw.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return (None, raw),
    }

    let start = raw.find('\n').map(|i| i + 1).unwrap_or(raw.len());
    let mut offset = start;
    for line in lines {
        let end = offset + line.len();
        if matches!(line.trim_end(), "---" | "...") {
            return (Some(&raw[start..offset]), &raw[end..]);
        }
        offset = end;
    }

    (None, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_last_segment() {
        assert_eq!(title_for("guides/setup/linux"), "linux");
        assert_eq!(title_for("index"), "index");
    }

    #[test]
    fn test_front_matter_split() {
        let raw = "---\ntitle: Hello\ntags: [a]\n---\n# Body\n";
        let (front, body) = split_front_matter(raw);
        assert_eq!(front, Some("title: Hello\ntags: [a]\n"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_front_matter_with_crlf_and_dots() {
        let raw = "---\r\ntitle: x\r\n...\r\nbody";
        let (front, body) = split_front_matter(raw);
        assert_eq!(front, Some("title: x\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        let raw = "---\ntitle: x\nno end";
        assert_eq!(split_front_matter(raw), (None, raw));
    }

    #[test]
    fn test_no_front_matter() {
        let raw = "# Title\n---\n";
        assert_eq!(split_front_matter(raw), (None, raw));
    }

    #[test]
    fn test_parse_keeps_links_from_front_matter() {
        let raw = "---\nsee: \"[x](./x.md)\"\n---\n[y](./y.md)\n";
        let doc = ScannedDocument::parse("a/b", raw, &LinkExtractor::default());
        assert_eq!(doc.title, "b");
        assert_eq!(doc.raw_links, vec!["./x.md", "./y.md"]);
        assert_eq!(doc.content, "[y](./y.md)\n");
        assert_eq!(doc.size, raw.len());
        assert!(doc.path.is_none());
    }
}

// Reference resolution.
//
// Turns a raw link target, as written inside a document, into the canonical
// identifier of the document it points at. Identifiers are `/`-separated,
// extension-less and carry no leading slash (`guides/setup`, `index`).
//
// Every relative form resolves against the *directory* of the referring
// document:
//
// | target          | from `a/b/c` |
// |-----------------|--------------|
// | `./d.md`        | `a/b/d`      |
// | `d.md`          | `a/b/d`      |
// | `../d.md`       | `a/d`        |
// | `../../d.md`    | `d`          |
// | `/x/d.md`       | `x/d`        |

use crate::error::{Result, ScanError};

/// Extension marker used when none is configured.
pub const DEFAULT_EXTENSION: &str = "md";

/// Upper bound on leading `../` markers peeled off a single target.
pub const MAX_PARENT_HOPS: usize = 64;

/// Syntactic form of a raw link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkForm {
    /// `./segment...`
    Current,
    /// `../segment...`
    Parent,
    /// `/segment...`
    Absolute,
    /// `segment...`
    Bare,
}

impl LinkForm {
    pub fn of(target: &str) -> Self {
        if target.starts_with("./") {
            LinkForm::Current
        } else if target.starts_with("../") {
            LinkForm::Parent
        } else if target.starts_with('/') {
            LinkForm::Absolute
        } else {
            LinkForm::Bare
        }
    }
}

/// Resolves raw link targets for one extension marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    extension: String,
}

impl Resolver {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: normalize_extension(extension),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Resolve `raw_target` as written in the document `referring_id`.
    pub fn resolve(&self, referring_id: &str, raw_target: &str) -> Result<String> {
        let target = strip_extension(raw_target, &self.extension);
        resolve_identifier(referring_id, target)
            .map_err(|e| match e {
                ScanError::UnresolvableLink { reason, .. } => {
                    ScanError::unresolvable(raw_target, reason)
                }
                other => other,
            })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

/// Accepts `md`, `.md` or `.MD`-style input and keeps the case as given.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_string()
}

/// Remove a trailing `.{extension}` marker, if present.
pub fn strip_extension<'a>(target: &'a str, extension: &str) -> &'a str {
    target
        .strip_suffix(extension)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(target)
}

/// Resolve an extension-less `target` against `referring_id`.
pub fn resolve_identifier(referring_id: &str, target: &str) -> Result<String> {
    if target.is_empty() {
        return Err(ScanError::unresolvable(target, "empty target"));
    }

    let (mut resolved, rest) = match LinkForm::of(target) {
        LinkForm::Absolute => (Vec::new(), target.trim_start_matches('/')),
        LinkForm::Current | LinkForm::Parent | LinkForm::Bare => {
            (directory_segments(referring_id), target)
        }
    };

    let mut segments = rest.split('/').peekable();
    let mut hops = 0usize;

    while let Some(&marker) = segments.peek() {
        match marker {
            "." => {}
            ".." => {
                hops += 1;
                if hops > MAX_PARENT_HOPS {
                    return Err(ScanError::unresolvable(
                        target,
                        format!("more than {} parent markers", MAX_PARENT_HOPS),
                    ));
                }
                // Climbing above the root clamps at the empty base.
                resolved.pop();
            }
            _ => break,
        }
        segments.next();
    }

    let base_len = resolved.len();
    for segment in segments {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(ScanError::unresolvable(
                target,
                format!("malformed segment '{}'", segment),
            ));
        }
        resolved.push(segment);
    }

    if resolved.len() == base_len {
        return Err(ScanError::unresolvable(target, "no document segment"));
    }

    Ok(resolved.join("/"))
}

/// All segments of `id` except the last one.
fn directory_segments(id: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = id.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(from: &str, target: &str) -> String {
        Resolver::default().resolve(from, target).unwrap()
    }

    #[test]
    fn test_current_directory_link() {
        assert_eq!(resolve("a/b", "./c.md"), "a/c");
        assert_eq!(resolve("a/b", "./nested/c.md"), "a/nested/c");
    }

    #[test]
    fn test_parent_directory_link() {
        assert_eq!(resolve("a/c", "../x/y.md"), "x/y");
        assert_eq!(resolve("a/b/c", "../d.md"), "a/d");
    }

    #[test]
    fn test_parent_climb_to_root() {
        assert_eq!(resolve("a/b/c", "../../z.md"), "z");
    }

    #[test]
    fn test_parent_climb_clamps_at_root() {
        assert_eq!(resolve("a", "../z.md"), "z");
        assert_eq!(resolve("a/b", "../../../z.md"), "z");
    }

    #[test]
    fn test_absolute_link_ignores_referrer() {
        assert_eq!(resolve("a/b", "/root/page.md"), "root/page");
        assert_eq!(resolve("deep/er/still/here", "/root/page.md"), "root/page");
    }

    #[test]
    fn test_bare_link_is_sibling_relative() {
        assert_eq!(resolve("a/b", "c.md"), "a/c");
        assert_eq!(resolve("a/b", "x/y.md"), "a/x/y");
    }

    #[test]
    fn test_empty_base() {
        assert_eq!(resolve("top", "./other.md"), "other");
        assert_eq!(resolve("top", "other.md"), "other");
        assert_eq!(resolve("", "other.md"), "other");
    }

    #[test]
    fn test_mixed_markers() {
        assert_eq!(resolve("a/b/c", ".././d.md"), "a/d");
        assert_eq!(resolve("a/b/c", "./../d.md"), "a/d");
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(resolve("Notes/Index", "./Daily Log.md"), "Notes/Daily Log");
    }

    #[test]
    fn test_extension_marker_only_stripped_once() {
        assert_eq!(resolve("a/b", "./c.md.md"), "a/c.md");
    }

    #[test]
    fn test_custom_extension() {
        let resolver = Resolver::new(".markdown");
        assert_eq!(resolver.extension(), "markdown");
        assert_eq!(resolver.resolve("a/b", "./c.markdown").unwrap(), "a/c");
    }

    #[test]
    fn test_empty_target_is_unresolvable() {
        let err = Resolver::default().resolve("a/b", ".md").unwrap_err();
        assert!(matches!(err, ScanError::UnresolvableLink { .. }));
    }

    #[test]
    fn test_marker_without_document_is_unresolvable() {
        assert!(resolve_identifier("a/b", "./").is_err());
        assert!(resolve_identifier("a/b", "../..").is_err());
        assert!(resolve_identifier("a/b", "/").is_err());
    }

    #[test]
    fn test_interior_markers_are_unresolvable() {
        assert!(resolve_identifier("a/b", "./x/../y").is_err());
        assert!(resolve_identifier("a/b", "x//y").is_err());
    }

    #[test]
    fn test_hop_guard() {
        let target = "../".repeat(MAX_PARENT_HOPS + 1) + "z";
        let err = resolve_identifier("a/b", &target).unwrap_err();
        assert!(err.to_string().contains("parent markers"));

        let target = "../".repeat(MAX_PARENT_HOPS) + "z";
        assert_eq!(resolve_identifier("a/b", &target).unwrap(), "z");
    }

    #[test]
    fn test_unresolvable_error_names_raw_target() {
        let err = Resolver::default().resolve("a/b", "x//y.md").unwrap_err();
        match err {
            ScanError::UnresolvableLink { target, .. } => assert_eq!(target, "x//y.md"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_link_form() {
        assert_eq!(LinkForm::of("./a"), LinkForm::Current);
        assert_eq!(LinkForm::of("../a"), LinkForm::Parent);
        assert_eq!(LinkForm::of("/a"), LinkForm::Absolute);
        assert_eq!(LinkForm::of("a"), LinkForm::Bare);
        assert_eq!(LinkForm::of(".hidden"), LinkForm::Bare);
    }
}

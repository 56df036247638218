// Link extraction from raw document text.

use crate::resolve::{DEFAULT_EXTENSION, normalize_extension};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Pulls link targets out of Markdown text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkExtractor {
    extension: String,
}

impl LinkExtractor {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: normalize_extension(extension),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Document link candidates in `text`, in order, duplicates kept.
    pub fn extract(&self, text: &str) -> Vec<String> {
        extract_targets(text)
            .iter()
            .filter_map(|target| self.candidate(target))
            .collect()
    }

    /// Every raw target in `text`, document links or not.
    pub fn extract_all(&self, text: &str) -> Vec<String> {
        extract_targets(text)
    }

    /// Returns the document path of `target` if it names a document.
    ///
    /// External URLs and pure anchors are rejected. A `#fragment` or `?query`
    /// suffix is dropped before the extension marker is checked.
    pub fn candidate(&self, target: &str) -> Option<String> {
        if is_external(target) {
            return None;
        }

        let path = target
            .split(['#', '?'])
            .next()
            .unwrap_or_default()
            .trim();

        let marker = format!(".{}", self.extension);
        if path.len() > marker.len() && path.ends_with(&marker) {
            Some(path.to_string())
        } else {
            None
        }
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

/// Targets with a URL scheme or a protocol-relative prefix.
pub fn is_external(target: &str) -> bool {
    target.starts_with("//") || Url::parse(target).is_ok()
}

/// Every link target in `text`, in document order.
///
/// Covers inline links and images, reference definitions, autolinks and raw
/// HTML anchors. Code spans and fenced blocks are skipped.
pub fn extract_targets(text: &str) -> Vec<String> {
    static INLINE_RE: OnceLock<Regex> = OnceLock::new();
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    static AUTOLINK_RE: OnceLock<Regex> = OnceLock::new();
    static ANCHOR_RE: OnceLock<Regex> = OnceLock::new();

    let inline_re = INLINE_RE.get_or_init(|| {
        Regex::new(
            r#"!?\[(?:[^\[\]\n]|\[[^\[\]\n]*\])*\]\(\s*(<[^>\n]*>|(?:[^\s()]|\([^\s()]*\))+)(?:\s+(?:"[^"\n]*"|'[^'\n]*'))?\s*\)"#,
        )
        .unwrap()
    });
    let reference_re = REFERENCE_RE.get_or_init(|| {
        Regex::new(r"(?m)^ {0,3}\[[^\]\n]+\]:[ \t]*(<[^>\n]*>|\S+)").unwrap()
    });
    let autolink_re = AUTOLINK_RE
        .get_or_init(|| Regex::new(r"<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*)>").unwrap());
    let anchor_re = ANCHOR_RE.get_or_init(|| Regex::new(r"(?i)<a\s[^>]*>").unwrap());

    let masked = mask_code(text);
    let mut found: Vec<(usize, usize, String)> = Vec::new();

    for re in [inline_re, reference_re, autolink_re] {
        for cap in re.captures_iter(&masked) {
            if let (Some(whole), Some(target)) = (cap.get(0), cap.get(1)) {
                let target = unwrap_angle(target.as_str());
                if !target.is_empty() {
                    found.push((whole.start(), whole.end(), target.to_string()));
                }
            }
        }
    }

    for tag in anchor_re.find_iter(&masked) {
        if let Some(href) = anchor_href(tag.as_str()) {
            found.push((tag.start(), tag.end(), href));
        }
    }

    found.sort_by_key(|(start, _, _)| *start);

    // Overlapping matches (an autolink inside an inline link) count once.
    let mut targets = Vec::with_capacity(found.len());
    let mut covered = 0usize;
    for (start, end, target) in found {
        if start < covered {
            continue;
        }
        covered = end;
        targets.push(target);
    }

    targets
}

fn unwrap_angle(target: &str) -> &str {
    target
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(target)
        .trim()
}

fn anchor_href(tag: &str) -> Option<String> {
    static A_SELECTOR: OnceLock<Selector> = OnceLock::new();
    let selector = A_SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());

    let fragment = Html::parse_fragment(tag);
    fragment
        .select(selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Blank out fenced code blocks and inline code spans, keeping byte offsets.
fn mask_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut fence: Option<&str> = None;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let marker = ["```", "~~~"]
            .into_iter()
            .find(|m| trimmed.starts_with(*m));

        match (fence, marker) {
            (None, Some(m)) => {
                fence = Some(m);
                blank_into(line, &mut out);
            }
            (Some(open), Some(m)) if open == m => {
                fence = None;
                blank_into(line, &mut out);
            }
            (Some(_), _) => blank_into(line, &mut out),
            (None, None) => out.push_str(&mask_inline_code(line)),
        }
    }

    out
}

fn mask_inline_code(line: &str) -> String {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();
    let code_re = CODE_RE.get_or_init(|| Regex::new(r"``[^\n]*?``|`[^`\n]*`").unwrap());

    code_re
        .replace_all(line, |caps: &regex::Captures| {
            let mut blank = String::new();
            blank_into(&caps[0], &mut blank);
            blank
        })
        .into_owned()
}

fn blank_into(s: &str, out: &mut String) {
    for c in s.chars() {
        if c == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat_n(' ', c.len_utf8()));
        }
    }
}

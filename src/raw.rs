use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One element of the raw markup tree handed over by the page-fetch
/// collaborator. Attributes keep their document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: Vec<(String, String)>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(tag: impl Into<String>) -> Self {
        RawNode {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn data_attrs(&self) -> Vec<(String, String)> {
        self.attrs
            .iter()
            .filter(|(k, _)| k.starts_with("data-"))
            .cloned()
            .collect()
    }

    /// An id, ARIA attribute, `itemprop` or data-attribute marks a node as
    /// semantically meaningful even when its tag is a stylistic inline span.
    pub fn has_semantic_attrs(&self) -> bool {
        self.attrs.iter().any(|(k, _)| {
            k == "id" || k == "itemprop" || k.starts_with("aria-") || k.starts_with("data-")
        })
    }

    /// Direct text plus text reachable through stylistic inline children
    /// (span, emphasis and the like), whitespace-normalized. Mirrors the
    /// capture convention where inline text belongs to the enclosing block
    /// element; the walker relies on this when it elides those children.
    pub fn own_text(&self) -> String {
        let mut parts = vec![self.text.as_str().to_string()];
        for child in &self.children {
            if is_inline_tag(&child.tag) {
                parts.push(child.all_text());
            }
        }
        normalize_ws(&parts.join(" "))
    }

    /// Full subtree text, whitespace-normalized.
    pub fn all_text(&self) -> String {
        let mut parts = vec![self.text.as_str().to_string()];
        for child in &self.children {
            parts.push(child.all_text());
        }
        normalize_ws(&parts.join(" "))
    }

    /// All descendants (including self) with the given tag, document order.
    pub fn find_all<'a>(&'a self, tag: &str, out: &mut Vec<&'a RawNode>) {
        if self.tag.eq_ignore_ascii_case(tag) {
            out.push(self);
        }
        for child in &self.children {
            child.find_all(tag, out);
        }
    }
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stylistic inline tags whose text folds into the enclosing block element.
/// The walker's inline-merge set must stay in sync with this.
pub(crate) fn is_inline_tag(tag: &str) -> bool {
    ["span", "b", "i", "em", "strong", "u", "sup"]
        .iter()
        .any(|t| tag.eq_ignore_ascii_case(t))
}

/// Open Graph tag group extracted by the page-fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenGraphMeta {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
    pub site_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitterMeta {
    pub card: Option<String>,
    pub site: Option<String>,
}

/// Page metadata extracted independently of the markup tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub language: Option<String>,
    pub template: Option<String>,
    pub viewport: Option<String>,
    #[serde(default)]
    pub opengraph: OpenGraphMeta,
    #[serde(default)]
    pub twitter: TwitterMeta,
}

/// Per-page input to the normalizer: three named region trees plus metadata
/// and the base URL for link resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageCapture {
    pub url: String,
    pub base_url: String,
    #[serde(default)]
    pub metadata: PageMetadata,
    #[serde(default)]
    pub navbar: Vec<RawNode>,
    #[serde(default)]
    pub body: Vec<RawNode>,
    #[serde(default)]
    pub footer: Vec<RawNode>,
}

impl PageCapture {
    pub fn from_json(raw: &str) -> Result<PageCapture> {
        serde_json::from_str(raw).context("failed to parse page capture JSON")
    }

    /// Accepts either a JSON array of captures or JSON lines, detected by the
    /// first non-whitespace byte.
    pub fn from_json_many(raw: &str) -> Result<Vec<PageCapture>> {
        if raw.trim_start().starts_with('[') {
            serde_json::from_str(raw).context("failed to parse page capture array")
        } else {
            raw.lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| serde_json::from_str(l).context("failed to parse page capture line"))
                .collect()
        }
    }
}

// ── Tests ──

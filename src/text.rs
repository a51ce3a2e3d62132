use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use url::Url;

/// Lowercase, non-alphanumerics collapsed to single hyphens.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_dash = false;
    for c in s.trim().chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_dash = false;
        } else if !prev_dash && !out.is_empty() {
            out.push('-');
            prev_dash = true;
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "item".to_string()
    } else {
        trimmed.to_string()
    }
}

/// First `n` hex chars of SHA-256 over `s`. Stable across runs for stable input.
pub fn short_hash(s: &str, n: usize) -> String {
    let digest = Sha256::digest(s.as_bytes());
    let mut hex = String::with_capacity(n);
    for b in digest.iter() {
        hex.push_str(&format!("{:02x}", b));
        if hex.len() >= n {
            break;
        }
    }
    hex.truncate(n);
    hex
}

/// Strip the currency symbol and non-breaking space variants from a raw price
/// string. Returns `None` when nothing remains.
pub fn normalize_price(raw: &str) -> Option<String> {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '\u{a0}' | '\u{202f}' | '\u{2007}'))
        .collect();
    let s = s.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Internal,
    External,
}

/// Serializer-level internality check: site-relative paths and URLs under the
/// site's own base count as internal.
pub fn is_internal_link(href: &str, base: &str) -> bool {
    let h = href.trim().split_whitespace().next().unwrap_or("");
    h.starts_with('/') || (!base.is_empty() && h.starts_with(base))
}

/// Resolve `href` against `base`, tolerating junk after whitespace. Falls back
/// to the raw value when the base itself does not parse.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let h = href.trim().split_whitespace().next()?;
    if h.is_empty() {
        return None;
    }
    match Url::parse(base) {
        Ok(b) => match b.join(h) {
            Ok(u) => Some(u.to_string()),
            Err(_) => Some(h.to_string()),
        },
        Err(_) => Some(h.to_string()),
    }
}

/// Host-aware link classification used for model-level links: relative URLs
/// are internal, same (or sub-) host of the base is internal, and without a
/// base a brand-name-in-host heuristic applies.
pub fn classify_link(href: Option<&str>, base_url: Option<&str>, brands: &[String]) -> Option<LinkType> {
    let href = href?;
    let u = match Url::parse(href) {
        Ok(u) => u,
        Err(_) => return Some(LinkType::Internal), // relative link
    };
    let host = u.host_str().unwrap_or("").to_ascii_lowercase();
    if host.is_empty() {
        return Some(LinkType::Internal);
    }
    let base = match base_url.and_then(|b| Url::parse(b).ok()) {
        Some(b) => b,
        None => {
            let internal = brands.iter().any(|b| host.contains(&b.to_ascii_lowercase()));
            return Some(if internal { LinkType::Internal } else { LinkType::External });
        }
    };
    let bhost = base.host_str().unwrap_or("").to_ascii_lowercase();
    if host == bhost || (!bhost.is_empty() && host.ends_with(&format!(".{}", bhost))) {
        return Some(LinkType::Internal);
    }
    // Same registrable domain (e.g. sibling subdomains).
    let tail = |h: &str| -> Vec<String> {
        let parts: Vec<&str> = h.split('.').collect();
        parts.iter().rev().take(2).rev().map(|s| s.to_string()).collect()
    };
    if !bhost.is_empty() && tail(&bhost) == tail(&host) {
        return Some(LinkType::Internal);
    }
    Some(LinkType::External)
}

/// Result of the lenient attribute-JSON parse: either structured data or the
/// raw string passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrJson {
    Parsed(Value),
    Raw(String),
}

impl AttrJson {
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            AttrJson::Parsed(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Lenient parse of a JSON-carrying markup attribute: HTML-unescape, undo
/// `\/` escaping, parse; retry with non-breaking spaces normalized; otherwise
/// pass the raw string through. Region entries drop their inline price
/// disclosure blobs.
pub fn parse_attr_json(raw: &str) -> Option<AttrJson> {
    if raw.is_empty() {
        return None;
    }
    let unescaped: Cow<str> = quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw));
    let s = unescaped.replace("\\/", "/");
    let parsed: Result<Value, _> = serde_json::from_str(&s)
        .or_else(|_| serde_json::from_str(&s.replace(['\u{a0}', '\u{202f}'], " ")));
    match parsed {
        Ok(mut v) => {
            strip_price_disclosures(&mut v);
            Some(AttrJson::Parsed(v))
        }
        Err(_) => Some(AttrJson::Raw(raw.to_string())),
    }
}

fn strip_price_disclosures(v: &mut Value) {
    if let Value::Object(map) = v {
        for val in map.values_mut() {
            if let Value::Object(inner) = val {
                inner.remove("startingPriceDisclosure");
                inner.remove("asShownPriceDisclosure");
            }
        }
    }
}

/// String view of a JSON scalar (prices arrive as strings or bare numbers).
pub fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ── Tests ──

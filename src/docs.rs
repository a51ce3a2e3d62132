use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::brand::BrandProfile;
use crate::graph::{DomainGraph, Model, Section};
use crate::text::short_hash;

const HARD_LIMIT_WORDS: usize = 350;
const HARD_WINDOW_WORDS: usize = 320;
const HARD_STEP_WORDS: usize = 300;

const DISCLOSURE_MARKER: &str = "[See disclosures]";

static ASTERISKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\*+\s*").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<num>\d{1,3}(?:[,\u{a0}\u{202f}]\d{3})+|\d+(?:\.\d+)?)\s*(?P<unit>pounds|lbs?|kilograms|kg)\b")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkParams {
    pub target_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        ChunkParams {
            target_tokens: 280,
            overlap_tokens: 40,
        }
    }
}

/// Line-respecting chunker: lines accumulate up to the target word count,
/// each chunk seeds the next with its trailing lines up to the overlap
/// budget, and any single chunk past the hard limit is window-split on raw
/// words.
pub fn chunk_text(text: &str, params: &ChunkParams) -> Vec<String> {
    let mut soft: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut count = 0usize;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let words = line.split_whitespace().count();
        if count > 0 && count + words > params.target_tokens {
            soft.push(current.join("\n"));
            current = overlap_tail(&current, params.overlap_tokens);
            count = current
                .iter()
                .map(|l| l.split_whitespace().count())
                .sum();
        }
        current.push(line.to_string());
        count += words;
    }
    if !current.is_empty() {
        soft.push(current.join("\n"));
    }

    let mut out = Vec::with_capacity(soft.len());
    for chunk in soft {
        let words: Vec<&str> = chunk.split_whitespace().collect();
        if words.len() <= HARD_LIMIT_WORDS {
            out.push(chunk);
            continue;
        }
        let mut i = 0;
        while i < words.len() {
            let end = (i + HARD_WINDOW_WORDS).min(words.len());
            out.push(words[i..end].join(" "));
            if end == words.len() {
                break;
            }
            i += HARD_STEP_WORDS;
        }
    }
    out
}

/// Whole trailing lines of the closing chunk, kept in order, until the
/// overlap word budget is met. Lines are never split.
fn overlap_tail(lines: &[String], overlap: usize) -> Vec<String> {
    let mut words = 0;
    let mut start = lines.len();
    while start > 0 && words < overlap {
        start -= 1;
        words += lines[start].split_whitespace().count();
    }
    lines[start..].to_vec()
}

/// Drop repeated identical lines, keeping first occurrences.
pub fn dedupe_lines(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for line in text.lines() {
        if !seen.contains(&line) {
            seen.push(line);
        }
    }
    seen.join("\n")
}

/// Replace footnote asterisks with spaces. The flag reports whether any were
/// found so the caller can point at the disclosure pool.
pub fn strip_asterisks(text: &str) -> (String, bool) {
    let had = text.contains('*');
    let stripped = ASTERISKS.replace_all(text, " ");
    let collapsed = SPACES.replace_all(&stripped, " ");
    (
        collapsed
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string(),
        had,
    )
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };
    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// Append the metric (or imperial) twin after every weight figure, so either
/// phrasing of a query can match the text.
pub fn convert_units(text: &str) -> String {
    WEIGHT
        .replace_all(text, |caps: &regex::Captures| {
            let raw = &caps["num"];
            let cleaned: String = raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            let Ok(value) = cleaned.parse::<f64>() else {
                return caps[0].to_string();
            };
            let unit = caps["unit"].to_lowercase();
            let (converted, twin_unit) = if unit.starts_with("lb") || unit.starts_with("pound") {
                (value * 0.453_592_37, "kg")
            } else {
                (value / 0.453_592_37, "lb")
            };
            let decimals = if converted >= 100.0 { 0 } else { 1 };
            format!(
                "{} ({} {})",
                &caps[0],
                group_thousands(converted, decimals),
                twin_unit
            )
        })
        .to_string()
}

/// Full clean for retrieval text. A trailing disclosure marker is added when
/// footnote asterisks were present or disclosure ids are attached.
pub fn clean_text(text: &str, has_disclosures: bool) -> String {
    let deduped = dedupe_lines(text);
    let (stripped, had_star) = strip_asterisks(&deduped);
    let converted = convert_units(&stripped);
    if has_disclosures || had_star {
        format!("{}\n\n{}", converted, DISCLOSURE_MARKER)
    } else {
        converted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Overview,
    Pricing,
    Feature,
    Award,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocMetadata {
    pub model_id: String,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    pub doc_type: DocType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub locale: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub asset_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub price_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disclosure_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trim_ids: Vec<String>,
    pub last_scraped_at: String,
    pub content_hash: String,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: DocMetadata,
}

fn base_metadata(model: &Model, doc_type: DocType, text: &str, stamp: &str) -> DocMetadata {
    DocMetadata {
        model_id: model.id.clone(),
        model_name: model.name.clone(),
        year: model.year,
        section_id: None,
        section_title: None,
        doc_type,
        region: None,
        locale: model.locale.clone(),
        // Every document points back at the model's imagery.
        asset_ids: model.asset_ids.clone(),
        price_ids: Vec::new(),
        disclosure_ids: Vec::new(),
        trim_id: None,
        trim_ids: Vec::new(),
        last_scraped_at: stamp.to_string(),
        content_hash: short_hash(text, 12),
        source_url: model.canonical_url.clone(),
    }
}

/// Trim names directly following an availability cue ("available on",
/// "only on", "standard on"), longest names first so compound names are
/// seen before their prefixes.
fn mentioned_trims(text: &str, model: &Model, profile: &BrandProfile) -> Vec<String> {
    let mut low = text.to_lowercase();
    let mut names: Vec<&String> = profile.trim_names.iter().collect();
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    let mut ids = Vec::new();
    for name in names {
        let pattern = format!(
            r"\b(?:available|only|standard) on (?:the )?{}\b",
            regex::escape(&name.to_lowercase())
        );
        let Ok(re) = Regex::new(&pattern) else { continue };
        if re.is_match(&low) {
            // Blank the span so compound names hide their prefixes.
            low = re.replace_all(&low, " ").to_string();
            let id = format!("{}:{}", model.id, crate::text::slug(name));
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn section_documents(
    model: &Model,
    section: &Section,
    doc_type: DocType,
    profile: &BrandProfile,
    params: &ChunkParams,
    stamp: &str,
    out: &mut Vec<Document>,
) {
    let cleaned = clean_text(&section.body, !section.disclosure_ids.is_empty());
    if cleaned.is_empty() {
        return;
    }
    let slug_part = section
        .id
        .split_once(':')
        .map(|(_, s)| s)
        .unwrap_or(&section.id);
    for (i, chunk) in chunk_text(&cleaned, params).into_iter().enumerate() {
        let trim_ids = mentioned_trims(&chunk, model, profile);
        let mut meta = base_metadata(model, doc_type, &chunk, stamp);
        meta.section_id = Some(section.id.clone());
        meta.section_title = Some(section.title.clone());
        meta.disclosure_ids = section.disclosure_ids.clone();
        meta.trim_id = (trim_ids.len() == 1).then(|| trim_ids[0].clone());
        meta.trim_ids = trim_ids;
        if !section.source_url.is_empty() {
            meta.source_url = section.source_url.clone();
        }
        out.push(Document {
            id: format!("doc:{}:{}:ch{}", model.id, slug_part, i + 1),
            text: chunk,
            metadata: meta,
        });
    }
}

/// Third pipeline pass: graph → flat retrieval documents. One overview per
/// model, one pricing doc per region, chunked feature and award docs.
pub fn build_documents(graph: &DomainGraph, profile: &BrandProfile) -> Vec<Document> {
    let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let params = ChunkParams::default();
    let mut out = Vec::new();

    for model in &graph.models {
        let mut overview_parts = Vec::new();
        if let Some(t) = model.title.as_deref().filter(|t| !t.is_empty()) {
            overview_parts.push(t.to_string());
        }
        if let Some(d) = model.description.as_deref().filter(|d| !d.is_empty()) {
            overview_parts.push(d.to_string());
        }
        if !overview_parts.is_empty() {
            let text = clean_text(&overview_parts.join("\n"), false);
            let mut meta = base_metadata(model, DocType::Overview, &text, &stamp);
            meta.section_id = Some("sec:overview".to_string());
            meta.section_title = Some("Overview".to_string());
            out.push(Document {
                id: format!("doc:{}:overview", model.id),
                text,
                metadata: meta,
            });
        }

        for price in graph.prices.iter().filter(|p| p.model_id == model.id) {
            let mut line = format!("{} pricing for {}.", model.name, price.price.region);
            if let Some(from) = &price.price.from_price {
                line.push_str(&format!(" From: {} ${}.", price.price.currency, from));
            }
            if let Some(shown) = &price.price.as_shown_price {
                line.push_str(&format!(" As shown: {} ${}.", price.price.currency, shown));
            }
            let text = if price.price.disclosure_ids.is_empty() {
                line
            } else {
                format!("{}\n\n{}", line, DISCLOSURE_MARKER)
            };
            let mut meta = base_metadata(model, DocType::Pricing, &text, &stamp);
            meta.section_id = Some("sec:pricing".to_string());
            meta.section_title = Some("Pricing".to_string());
            meta.region = Some(price.price.region.clone());
            meta.price_ids = vec![price.id.clone()];
            meta.disclosure_ids = price.price.disclosure_ids.clone();
            out.push(Document {
                id: format!("doc:{}:pricing:{}", model.id, price.price.region),
                text,
                metadata: meta,
            });
        }

        for section in graph.sections.iter().filter(|s| s.model_id == model.id) {
            section_documents(model, section, DocType::Feature, profile, &params, &stamp, &mut out);
        }

        for award in graph.awards.iter().filter(|a| a.model_id == model.id) {
            let as_section = Section {
                id: award.id.clone(),
                model_id: award.model_id.clone(),
                title: award.title.clone(),
                body: award.summary.clone(),
                disclosure_ids: award.disclosure_ids.clone(),
                source_url: award.source_url.clone(),
            };
            section_documents(model, &as_section, DocType::Award, profile, &params, &stamp, &mut out);
        }
    }

    debug!(documents = out.len(), "built retrieval documents");
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModelLinks, Price, PriceSource, RegionPrice};

    #[test]
    fn chunker_respects_target_and_overlaps_whole_lines() {
        let text = (0..40)
            .map(|i| format!("line {} with a few extra words here", i))
            .collect::<Vec<_>>()
            .join("\n");
        let params = ChunkParams::default();
        let chunks = chunk_text(&text, &params);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.split_whitespace().count() <= HARD_LIMIT_WORDS);
        }
        // Each chunk after the first starts with the previous chunk's
        // trailing lines, carried whole up to the overlap budget.
        let prev: Vec<String> = chunks[0].lines().map(str::to_string).collect();
        let tail = overlap_tail(&prev, params.overlap_tokens).join("\n");
        assert!(tail.split_whitespace().count() >= params.overlap_tokens);
        assert!(chunks[1].starts_with(&tail));
        // No line is ever split mid-way.
        for chunk in &chunks {
            for line in chunk.lines() {
                assert!(text.lines().any(|l| l == line), "split line: {}", line);
            }
        }
    }

    #[test]
    fn oversized_single_line_is_window_split() {
        let long_line = vec!["word"; 1000].join(" ");
        let chunks = chunk_text(&long_line, &ChunkParams::default());
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.split_whitespace().count() <= HARD_WINDOW_WORDS);
        }
        // Windows overlap by window minus step.
        assert_eq!(chunks[0].split_whitespace().count(), HARD_WINDOW_WORDS);
    }

    #[test]
    fn unit_conversion_both_directions() {
        let out = convert_units("Tows up to 13,300 lb with ease");
        assert!(out.contains("13,300 lb (6,033 kg)"), "{}", out);
        let out = convert_units("Payload of 30 kg");
        assert!(out.contains("30 kg (66.1 lb)"), "{}", out);
    }

    #[test]
    fn unit_conversion_handles_spelled_out_units() {
        let out = convert_units("Rated at 6,000 pounds on the hitch");
        assert!(out.contains("6,000 pounds (2,722 kg)"), "{}", out);
        let out = convert_units("Adds 2 kilograms of insulation");
        assert!(out.contains("2 kilograms (4.4 lb)"), "{}", out);
    }

    #[test]
    fn asterisks_trigger_disclosure_marker() {
        let cleaned = clean_text("Best-in-class* towing", false);
        assert!(!cleaned.contains('*'));
        assert!(cleaned.ends_with(DISCLOSURE_MARKER));

        let plain = clean_text("Nothing special", false);
        assert!(!plain.contains(DISCLOSURE_MARKER));
    }

    fn model() -> crate::graph::Model {
        crate::graph::Model {
            id: "silverado-1500".to_string(),
            name: "Silverado 1500".to_string(),
            year: Some(2024),
            canonical_url: "https://www.chevrolet.ca/en/trucks/silverado-1500".to_string(),
            locale: "en-CA".to_string(),
            title: Some("2024 Silverado 1500".to_string()),
            description: Some("A full-size truck.".to_string()),
            trim_ids: vec![],
            section_ids: vec!["sec:towing".to_string()],
            asset_ids: vec!["img:abc".to_string()],
            award_ids: vec![],
            links: ModelLinks::default(),
        }
    }

    #[test]
    fn documents_cover_overview_pricing_and_sections() {
        let graph = DomainGraph {
            models: vec![model()],
            prices: vec![Price {
                id: "price:silverado-1500:ON".to_string(),
                model_id: "silverado-1500".to_string(),
                price: RegionPrice {
                    region: "ON".to_string(),
                    from_price: Some("50,000".to_string()),
                    as_shown_price: Some("65,000".to_string()),
                    currency: "CAD".to_string(),
                    disclosure_ids: vec!["disc:x".to_string()],
                    source: PriceSource::Navbar,
                },
            }],
            sections: vec![crate::graph::Section {
                id: "sec:towing".to_string(),
                model_id: "silverado-1500".to_string(),
                title: "Towing".to_string(),
                body: "Max Trailering Package available on LT Trail Boss".to_string(),
                disclosure_ids: vec![],
                source_url: "https://www.chevrolet.ca/en/trucks/silverado-1500".to_string(),
            }],
            ..Default::default()
        };
        let docs = build_documents(&graph, &BrandProfile::chevrolet());
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert!(ids.contains(&"doc:silverado-1500:overview"));
        assert!(ids.contains(&"doc:silverado-1500:pricing:ON"));
        assert!(ids.contains(&"doc:silverado-1500:towing:ch1"));

        let overview = docs.iter().find(|d| d.id.ends_with(":overview")).unwrap();
        assert_eq!(overview.metadata.section_id.as_deref(), Some("sec:overview"));
        assert_eq!(overview.metadata.section_title.as_deref(), Some("Overview"));

        let pricing = docs.iter().find(|d| d.id.ends_with("pricing:ON")).unwrap();
        assert!(pricing.text.contains("CAD $50,000"));
        assert!(pricing.text.contains(DISCLOSURE_MARKER));
        assert_eq!(pricing.metadata.price_ids, vec!["price:silverado-1500:ON"]);
        assert_eq!(pricing.metadata.section_id.as_deref(), Some("sec:pricing"));
        assert_eq!(pricing.metadata.asset_ids, vec!["img:abc"]);

        let feature = docs.iter().find(|d| d.id.ends_with("towing:ch1")).unwrap();
        assert_eq!(feature.metadata.trim_ids, vec!["silverado-1500:lt-trail-boss"]);
        assert_eq!(
            feature.metadata.trim_id.as_deref(),
            Some("silverado-1500:lt-trail-boss")
        );
        assert_eq!(feature.metadata.asset_ids, vec!["img:abc"]);
        assert_eq!(feature.metadata.content_hash.len(), 12);
    }

    #[test]
    fn trim_mentions_require_an_adjacent_cue() {
        let m = model();
        let p = BrandProfile::chevrolet();
        assert_eq!(
            mentioned_trims("Max package available on LT Trail Boss.", &m, &p),
            vec!["silverado-1500:lt-trail-boss"]
        );
        assert_eq!(
            mentioned_trims("Available on the High Country only.", &m, &p),
            vec!["silverado-1500:high-country"]
        );
        // A cue and a trim name apart in the text do not pair up.
        assert!(mentioned_trims("Standard on all models. LT shown.", &m, &p).is_empty());
        assert!(mentioned_trims("The LT tows plenty.", &m, &p).is_empty());
    }
}

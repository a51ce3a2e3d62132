pub mod assets;
pub mod links;
pub mod prices;
pub mod related;
pub mod sections;
pub mod trims;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::brand::BrandProfile;
use crate::graph::{Disclosure, DomainGraph, Model};
use crate::parser::SerializedPage;
use crate::raw::PageCapture;
use crate::text::short_hash;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Collects disclosure texts as extraction runs and hands back content-hashed
/// ids, so every extractor shares one de-duplicated pool per page.
#[derive(Debug, Default)]
pub struct DisclosureRegistrar {
    entries: Vec<(String, String)>,
}

impl DisclosureRegistrar {
    /// Register one disclosure text under a namespace key. Returns the stable
    /// id, or `None` for blank text.
    pub fn register(&mut self, key: &str, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let id = format!("disc:{}", short_hash(&format!("{}|{}", key, text), 10));
        if !self.entries.iter().any(|(existing, _)| *existing == id) {
            self.entries.push((id.clone(), trimmed.to_string()));
        }
        Some(id)
    }

    pub fn into_disclosures(self) -> Vec<Disclosure> {
        let mut out: Vec<Disclosure> = self
            .entries
            .into_iter()
            .map(|(id, text)| Disclosure { id, text })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }
}

/// Year and model name recovered from a page title like
/// "2024 Silverado 1500 | Chevrolet Canada".
pub fn parse_year_and_model(title: &str, brands: &[String]) -> (Option<i32>, Option<String>) {
    let year = YEAR_RE
        .find(title)
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let lower = title.to_lowercase();
    let mut name = None;
    for brand in brands {
        let b = brand.to_lowercase();
        if let Some(pos) = lower.find(&b) {
            let after = &title[pos + b.len()..];
            let upto = after.split('|').next().unwrap_or(after);
            let cleaned = upto.split_whitespace().collect::<Vec<_>>().join(" ");
            if !cleaned.is_empty() {
                name = Some(cleaned);
                break;
            }
        }
    }
    if name.is_none() {
        // No brand in the title: take everything before the site suffix.
        let head = title.split('|').next().unwrap_or(title);
        let cleaned = YEAR_RE.replace_all(head, "");
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        if !cleaned.is_empty() {
            name = Some(cleaned);
        }
    }
    (year, name)
}

fn model_name_from_url(canonical: &str) -> Option<String> {
    let parsed = url::Url::parse(canonical).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(segment.replace('-', " "))
}

/// Second pipeline pass: serialized forests → one page's slice of the domain
/// graph. Disclosures registered anywhere during extraction land in the
/// graph's shared pool.
pub fn extract_all(
    profile: &BrandProfile,
    capture: &PageCapture,
    page: &SerializedPage,
) -> DomainGraph {
    let canonical = capture
        .metadata
        .canonical
        .clone()
        .unwrap_or_else(|| capture.url.clone());
    let locale = capture
        .metadata
        .language
        .clone()
        .unwrap_or_else(|| profile.default_locale.clone());

    let title = capture.metadata.title.as_deref().unwrap_or("");
    let (year, parsed_name) = parse_year_and_model(title, &profile.brands);
    let name = parsed_name
        .or_else(|| model_name_from_url(&canonical))
        .unwrap_or_default();
    let model_id = crate::text::slug(&name);
    debug!(model = %model_id, url = %canonical, "extracting page");

    let mut registrar = DisclosureRegistrar::default();

    let prices = prices::extract(profile, page, &canonical, &model_id, &mut registrar);
    let page_sections = sections::extract(profile, page, &canonical, &model_id, &mut registrar);
    let (content_sections, awards) = sections::split_awards(profile, page_sections);
    let assets = assets::extract(page);
    let trims = trims::extract(profile, page, &model_id, &mut registrar);
    let related_models = related::extract(
        profile,
        page,
        &canonical,
        Some(&capture.base_url),
        &mut registrar,
    );
    let pool = links::PageLinks::collect(page);
    let model_links = pool.select_for_model(profile, &model_id, &name, Some(&capture.base_url));

    let model = Model {
        id: model_id.clone(),
        name,
        year,
        canonical_url: canonical,
        locale,
        title: capture.metadata.title.clone(),
        description: capture.metadata.description.clone(),
        trim_ids: trims.iter().map(|t| t.id.clone()).collect(),
        section_ids: content_sections.iter().map(|s| s.id.clone()).collect(),
        asset_ids: assets.iter().map(|a| a.id.clone()).collect(),
        award_ids: awards.iter().map(|a| a.id.clone()).collect(),
        links: model_links,
    };

    DomainGraph {
        models: vec![model],
        prices,
        disclosures: registrar.into_disclosures(),
        assets,
        sections: content_sections,
        trims,
        related_models,
        awards,
    }
}

// ── Tests ──

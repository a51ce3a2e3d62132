use std::collections::BTreeMap;

use crate::brand::BrandProfile;
use crate::graph::{Price, PriceSource, RegionPrice};
use crate::parser::nodes::{visit_all, SerializedNode};
use crate::parser::SerializedPage;
use crate::text::{normalize_price, value_as_string};

use super::DisclosureRegistrar;

/// Per-region price cues read from one dynamic-text widget.
pub(super) struct PriceCues {
    pub from: BTreeMap<String, String>,
    pub shown: BTreeMap<String, String>,
    pub disclosure_ids: Vec<String>,
}

/// Read the regional price map out of a dynamic-text node, gated on the
/// display text actually naming the price kind. Disclosures in the widget's
/// subtree register under `key`.
pub(super) fn parse_price_cues(
    node: &SerializedNode,
    registrar: &mut DisclosureRegistrar,
    key: &str,
) -> Option<PriceCues> {
    let SerializedNode::DynamicText { regional, content, .. } = node else {
        return None;
    };

    let cue_text = content
        .iter()
        .filter_map(|c| match c {
            SerializedNode::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let wants_from = cue_text.contains("from:") || cue_text.contains("starting");
    let wants_shown = cue_text.contains("as shown") || cue_text.contains("as configured");

    let mut cues = PriceCues {
        from: BTreeMap::new(),
        shown: BTreeMap::new(),
        disclosure_ids: Vec::new(),
    };

    if let Some(map) = regional.as_ref().and_then(|r| r.as_object()) {
        for (region, entry) in map {
            let Some(entry) = entry.as_object() else { continue };
            if wants_from {
                if let Some(p) = entry
                    .get("startingPrice")
                    .and_then(value_as_string)
                    .as_deref()
                    .and_then(normalize_price)
                {
                    cues.from.insert(region.clone(), p);
                }
            }
            if wants_shown {
                if let Some(p) = entry
                    .get("asShownPrice")
                    .and_then(value_as_string)
                    .as_deref()
                    .and_then(normalize_price)
                {
                    cues.shown.insert(region.clone(), p);
                }
            }
        }
    }

    visit_all(std::slice::from_ref(node), &mut |n| {
        if let SerializedNode::Disclosure { text: Some(t), .. } = n {
            if let Some(id) = registrar.register(key, t) {
                if !cues.disclosure_ids.contains(&id) {
                    cues.disclosure_ids.push(id);
                }
            }
        }
    });

    Some(cues)
}

pub(super) fn candidates_from_cues(cues: &PriceCues, currency: &str) -> Vec<RegionPrice> {
    let regions: BTreeMap<&String, ()> = cues
        .from
        .keys()
        .chain(cues.shown.keys())
        .map(|r| (r, ()))
        .collect();
    regions
        .into_keys()
        .map(|region| RegionPrice {
            region: region.clone(),
            from_price: cues.from.get(region).cloned(),
            as_shown_price: cues.shown.get(region).cloned(),
            currency: currency.to_string(),
            disclosure_ids: cues.disclosure_ids.clone(),
            source: PriceSource::Navbar,
        })
        .collect()
}

/// A candidate carrying both price kinds replaces whatever is in place;
/// otherwise it fills the gaps and contributes its disclosures.
fn merge_candidate(existing: &mut RegionPrice, candidate: RegionPrice) {
    if candidate.from_price.is_some() && candidate.as_shown_price.is_some() {
        let mut replacement = candidate;
        for id in existing.disclosure_ids.drain(..) {
            if !replacement.disclosure_ids.contains(&id) {
                replacement.disclosure_ids.push(id);
            }
        }
        *existing = replacement;
        return;
    }
    if existing.from_price.is_none() {
        existing.from_price = candidate.from_price;
    }
    if existing.as_shown_price.is_none() {
        existing.as_shown_price = candidate.as_shown_price;
    }
    for id in candidate.disclosure_ids {
        if !existing.disclosure_ids.contains(&id) {
            existing.disclosure_ids.push(id);
        }
    }
}

/// Model-level prices: dynamic-text widgets living inside links that point at
/// this page's own canonical URL, merged one entry per region.
pub fn extract(
    profile: &BrandProfile,
    page: &SerializedPage,
    canonical: &str,
    model_id: &str,
    registrar: &mut DisclosureRegistrar,
) -> Vec<Price> {
    let mut by_region: BTreeMap<String, RegionPrice> = BTreeMap::new();
    let canonical = canonical.trim();

    for region_nodes in [&page.navbar, &page.body, &page.footer] {
        let mut widgets: Vec<&SerializedNode> = Vec::new();
        visit_all(region_nodes, &mut |n| {
            if let SerializedNode::Link { href, content, .. } = n {
                if href.trim() == canonical {
                    widgets.extend(
                        content
                            .iter()
                            .filter(|c| matches!(c, SerializedNode::DynamicText { .. })),
                    );
                }
            }
        });
        for widget in widgets {
            let Some(cues) = parse_price_cues(widget, registrar, "price") else { continue };
            for candidate in candidates_from_cues(&cues, &profile.default_currency) {
                match by_region.get_mut(&candidate.region) {
                    Some(existing) => merge_candidate(existing, candidate),
                    None => {
                        by_region.insert(candidate.region.clone(), candidate);
                    }
                }
            }
        }
    }

    by_region
        .into_values()
        .map(|price| Price {
            id: format!("price:{}:{}", model_id, price.region),
            model_id: model_id.to_string(),
            price,
        })
        .collect()
}

// ── Tests ──

use crate::brand::BrandProfile;
use crate::graph::{PriceSource, RegionPrice, Trim};
use crate::parser::nodes::{visit_all, SerializedNode};
use crate::parser::SerializedPage;
use crate::text::slug;

use super::prices::parse_price_cues;
use super::DisclosureRegistrar;

/// Insertion-ordered trim table keyed by lowercased name.
struct TrimTable<'a> {
    model_id: &'a str,
    entries: Vec<(String, Trim)>,
}

impl<'a> TrimTable<'a> {
    fn new(model_id: &'a str) -> Self {
        TrimTable {
            model_id,
            entries: Vec::new(),
        }
    }

    fn ensure(&mut self, name: &str) -> &mut Trim {
        let key = name.to_lowercase();
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            return &mut self.entries[pos].1;
        }
        self.entries.push((
            key,
            Trim {
                id: format!("{}:{}", self.model_id, slug(name)),
                model_id: self.model_id.to_string(),
                name: name.to_string(),
                tagline: None,
                features: Vec::new(),
                prices: Vec::new(),
            },
        ));
        &mut self.entries.last_mut().unwrap().1
    }

    fn get(&mut self, key: &str) -> Option<&mut Trim> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, t)| t)
    }
}

/// First paragraph text inside a dynamic-text widget, the slot trim names
/// render into.
fn first_para_text(node: &SerializedNode) -> Option<&str> {
    let SerializedNode::DynamicText { content, .. } = node else {
        return None;
    };
    content.iter().find_map(|c| match c {
        SerializedNode::Paragraph { text, .. } if !text.is_empty() => Some(text.as_str()),
        _ => None,
    })
}

/// The node right after the models heading holds the trim slider; when the
/// layout differs, fall back to scanning the whole body.
fn find_models_slider<'a>(body: &'a [SerializedNode], label: &str) -> &'a [SerializedNode] {
    for (i, node) in body.iter().enumerate() {
        if let Some(h) = node.heading_text() {
            if h.eq_ignore_ascii_case(label) && i + 1 < body.len() {
                return std::slice::from_ref(&body[i + 1]);
            }
        }
    }
    body
}

fn seed_stubs(profile: &BrandProfile, slider: &[SerializedNode], table: &mut TrimTable) {
    visit_all(slider, &mut |n| {
        let text = match n {
            SerializedNode::Paragraph { text, .. } => text.as_str(),
            SerializedNode::Heading { text, .. } => text.as_str(),
            _ => return,
        };
        if let Some(canon) = profile.canon_trim_name(text) {
            table.ensure(canon);
        }
    });
}

/// Pricing pass: inside the models region, trim-name widgets set the current
/// trim and price widgets attach regional observations to it.
fn collect_prices(
    profile: &BrandProfile,
    body: &[SerializedNode],
    table: &mut TrimTable,
    registrar: &mut DisclosureRegistrar,
) {
    let mut in_models = false;
    let mut current: Option<String> = None;

    visit_all(body, &mut |n| {
        if let Some(h) = n.heading_text() {
            if h.eq_ignore_ascii_case(&profile.models_heading) {
                in_models = true;
            } else if !h.is_empty() {
                in_models = false;
                current = None;
            }
            return;
        }
        if !in_models || !matches!(n, SerializedNode::DynamicText { .. }) {
            return;
        }

        if let Some(canon) = first_para_text(n).and_then(|t| profile.canon_trim_name(t)) {
            let canon = canon.to_string();
            table.ensure(&canon);
            current = Some(canon.to_lowercase());
            return;
        }

        let Some(cues) = parse_price_cues(n, registrar, "trimprice") else {
            return;
        };
        let Some(trim) = current.as_deref().and_then(|k| table.get(k)) else {
            return;
        };
        let mut regions: Vec<&String> = cues.from.keys().chain(cues.shown.keys()).collect();
        regions.sort();
        regions.dedup();
        for region in regions {
            let from = cues.from.get(region).cloned();
            let shown = cues.shown.get(region).cloned();
            match trim.prices.iter_mut().find(|p| p.region == *region) {
                Some(existing) => {
                    if existing.from_price.is_none() {
                        existing.from_price = from;
                    }
                    if existing.as_shown_price.is_none() {
                        existing.as_shown_price = shown;
                    }
                    for id in &cues.disclosure_ids {
                        if !existing.disclosure_ids.contains(id) {
                            existing.disclosure_ids.push(id.clone());
                        }
                    }
                }
                None => trim.prices.push(RegionPrice {
                    region: region.clone(),
                    from_price: from,
                    as_shown_price: shown,
                    currency: profile.default_currency.clone(),
                    disclosure_ids: cues.disclosure_ids.clone(),
                    source: PriceSource::Models,
                }),
            }
        }
    });
}

/// Enrichment pass over the slider: trim cards open on an image alt or name
/// widget, then contribute a tagline and a feature list.
fn collect_details(profile: &BrandProfile, slider: &[SerializedNode], table: &mut TrimTable) {
    let mut current: Option<String> = None;
    let mut in_block = false;

    visit_all(slider, &mut |n| {
        match n {
            SerializedNode::Image { alt: Some(alt), .. } => {
                if let Some(name) = profile.trim_name_in_text(alt) {
                    let name = name.to_string();
                    table.ensure(&name);
                    current = Some(name.to_lowercase());
                    in_block = true;
                }
            }
            SerializedNode::DynamicText { .. } => {
                if let Some(canon) = first_para_text(n).and_then(|t| profile.canon_trim_name(t)) {
                    let canon = canon.to_string();
                    table.ensure(&canon);
                    current = Some(canon.to_lowercase());
                    in_block = true;
                }
            }
            SerializedNode::Paragraph { text, .. }
                if in_block
                    && !text.is_empty()
                    && !text.contains(':')
                    && profile.canon_trim_name(text).is_none() =>
            {
                if let Some(trim) = current.as_deref().and_then(|k| table.get(k)) {
                    if trim.tagline.is_none() {
                        trim.tagline = Some(text.clone());
                    }
                }
            }
            SerializedNode::List { items, .. } if in_block && !items.is_empty() => {
                if let Some(trim) = current.as_deref().and_then(|k| table.get(k)) {
                    for item in items {
                        if !trim.features.contains(item) {
                            trim.features.push(item.clone());
                        }
                    }
                }
                in_block = false;
            }
            _ => {}
        }
    });
}

/// Trims: known names seeded in page order, then enriched with regional
/// prices and slider card details.
pub fn extract(
    profile: &BrandProfile,
    page: &SerializedPage,
    model_id: &str,
    registrar: &mut DisclosureRegistrar,
) -> Vec<Trim> {
    if profile.trim_names.is_empty() {
        return Vec::new();
    }
    let mut table = TrimTable::new(model_id);
    let slider = find_models_slider(&page.body, &profile.models_heading);
    seed_stubs(profile, slider, &mut table);
    collect_prices(profile, &page.body, &mut table, registrar);
    collect_details(profile, slider, &mut table);
    table.entries.into_iter().map(|(_, t)| t).collect()
}

// ── Tests ──

use crate::brand::BrandProfile;
use crate::graph::RelatedModel;
use crate::parser::nodes::{visit_all, SerializedNode};
use crate::parser::SerializedPage;
use crate::text::slug;

use super::links::PageLinks;
use super::prices::{candidates_from_cues, parse_price_cues};
use super::DisclosureRegistrar;

/// Stable id from a model page URL: the last segment of the locale-prefixed
/// path, slugged. Falls back to the display name.
fn id_from_href(href: &str, name: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let segment = path
        .split_once("/en/")
        .map(|(_, tail)| tail)
        .unwrap_or("")
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    if !segment.is_empty() {
        slug(segment)
    } else {
        slug(name)
    }
}

fn first_heading(content: &[SerializedNode]) -> Option<&str> {
    content.iter().find_map(|c| c.heading_text()).filter(|h| !h.is_empty())
}

/// Sibling model teasers: links that carry price cues ("From: ... As shown")
/// or a dynamic price widget, pointing somewhere other than this page.
pub fn extract(
    profile: &BrandProfile,
    page: &SerializedPage,
    canonical: &str,
    base_url: Option<&str>,
    registrar: &mut DisclosureRegistrar,
) -> Vec<RelatedModel> {
    let pool = PageLinks::collect(page);
    let canonical = canonical.trim();
    let mut out: Vec<RelatedModel> = Vec::new();

    for region in [&page.navbar, &page.body, &page.footer] {
        visit_all(region, &mut |n| {
            let SerializedNode::Link { text, href, content, .. } = n else {
                return;
            };
            if href.trim() == canonical {
                return;
            }
            let low = text.to_lowercase();
            let cue_match = low.contains("from:") && low.contains("as shown");
            let widgets: Vec<&SerializedNode> = content
                .iter()
                .filter(|c| matches!(c, SerializedNode::DynamicText { .. }))
                .collect();
            if !cue_match && widgets.is_empty() {
                return;
            }

            let name = match first_heading(content) {
                Some(h) => h.to_string(),
                None => {
                    let seg = id_from_href(href, "");
                    if seg == "item" {
                        return;
                    }
                    seg.replace('-', " ")
                }
            };
            let id = id_from_href(href, &name);
            if out.iter().any(|m| m.id == id) {
                return;
            }

            let mut prices = Vec::new();
            for widget in widgets {
                if let Some(cues) = parse_price_cues(widget, registrar, "price") {
                    for candidate in candidates_from_cues(&cues, &profile.default_currency) {
                        if !prices.contains(&candidate) {
                            prices.push(candidate);
                        }
                    }
                }
            }

            let links = pool.select_for_model(profile, &id, &name, base_url);
            out.push(RelatedModel {
                id,
                name,
                canonical_url: href.clone(),
                prices,
                links,
            });
        });
    }

    out
}

// ── Tests ──

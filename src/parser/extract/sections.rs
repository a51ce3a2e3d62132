use crate::brand::BrandProfile;
use crate::graph::{Award, Section};
use crate::parser::nodes::{visit_all, visit_lists, SerializedNode};
use crate::parser::SerializedPage;
use crate::text::slug;

use super::DisclosureRegistrar;

/// Pull the text lines and disclosure ids out of one node subtree.
fn collect_lines(
    node: &SerializedNode,
    lines: &mut Vec<String>,
    disclosure_ids: &mut Vec<String>,
    registrar: &mut DisclosureRegistrar,
) {
    visit_all(std::slice::from_ref(node), &mut |n| match n {
        SerializedNode::Paragraph { text, .. } if !text.is_empty() => lines.push(text.clone()),
        SerializedNode::List { items, .. } => {
            lines.extend(items.iter().cloned());
        }
        SerializedNode::ListItem { text } if !text.is_empty() => lines.push(text.clone()),
        SerializedNode::Disclosure { text: Some(t), .. } => {
            if let Some(id) = registrar.register("section", t) {
                if !disclosure_ids.contains(&id) {
                    disclosure_ids.push(id);
                }
            }
        }
        _ => {}
    });
}

/// Drop repeated identical lines, keeping first occurrences in order. The
/// capture convention duplicates display text across sibling elements.
fn dedupe_lines(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if !out.contains(&line) {
            out.push(line);
        }
    }
    out
}

/// Content sections: an interesting heading plus every sibling up to the next
/// heading, scanned at every nesting depth. First occurrence of a heading slug
/// wins within a page.
pub fn extract(
    profile: &BrandProfile,
    page: &SerializedPage,
    canonical: &str,
    model_id: &str,
    registrar: &mut DisclosureRegistrar,
) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    visit_lists(&page.body, &mut |siblings| {
        let mut i = 0;
        while i < siblings.len() {
            let Some(heading) = siblings[i].heading_text().filter(|h| !h.is_empty()) else {
                i += 1;
                continue;
            };
            if !profile.section_of_interest(heading) {
                i += 1;
                continue;
            }
            let id = format!("sec:{}", slug(heading));
            if sections.iter().any(|s| s.id == id) {
                i += 1;
                continue;
            }

            let mut lines = Vec::new();
            let mut disclosure_ids = Vec::new();
            let mut j = i + 1;
            while j < siblings.len() && !siblings[j].is_heading() {
                collect_lines(&siblings[j], &mut lines, &mut disclosure_ids, registrar);
                j += 1;
            }
            collect_lines(&siblings[i], &mut lines, &mut disclosure_ids, registrar);

            let body = dedupe_lines(lines).join("\n");
            if !body.is_empty() {
                sections.push(Section {
                    id,
                    model_id: model_id.to_string(),
                    title: heading.to_string(),
                    body,
                    disclosure_ids,
                    source_url: canonical.to_string(),
                });
            }
            i = j;
        }
    });

    sections
}

/// Partition award-headed sections into award entities; the rest stay content
/// sections.
pub fn split_awards(profile: &BrandProfile, sections: Vec<Section>) -> (Vec<Section>, Vec<Award>) {
    let mut content = Vec::new();
    let mut awards = Vec::new();
    for section in sections {
        if profile.award_heading(&section.title) {
            awards.push(Award {
                id: format!("awd:{}", slug(&section.title)),
                model_id: section.model_id,
                title: section.title,
                summary: section.body,
                disclosure_ids: section.disclosure_ids,
                source_url: section.source_url,
            });
        } else {
            content.push(section);
        }
    }
    (content, awards)
}

// ── Tests ──

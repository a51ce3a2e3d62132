use rayon::prelude::*;
use tracing::{debug, info};

use crate::brand::BrandProfile;
use crate::graph::DomainGraph;
use crate::parser;
use crate::parser::outline::OutlineSection;
use crate::raw::PageCapture;

/// The full pipeline behind one entry point: serialize each capture's markup
/// trees, extract the page's graph slice, then merge slices by entity id.
pub struct Normalizer {
    profile: BrandProfile,
}

impl Normalizer {
    pub fn new(profile: BrandProfile) -> Self {
        Normalizer { profile }
    }

    pub fn profile(&self) -> &BrandProfile {
        &self.profile
    }

    /// One capture → one page-local graph. Pure and deterministic: the same
    /// capture always yields byte-identical output.
    pub fn normalize_page(&self, capture: &PageCapture) -> DomainGraph {
        debug!(url = %capture.url, "normalizing page");
        let page = parser::serialize_page(capture);
        parser::extract::extract_all(&self.profile, capture, &page)
    }

    /// Heading-structured view of a capture's body, independent of the
    /// extraction passes.
    pub fn outline(&self, capture: &PageCapture) -> Vec<OutlineSection> {
        let page = parser::serialize_page(capture);
        parser::outline::build_outline(&page.body)
    }

    /// Normalize every capture and fold the results into one graph. Pages run
    /// in parallel; the merge is sequential in input order so repeated runs
    /// stay deterministic.
    pub fn normalize_all(&self, captures: &[PageCapture]) -> DomainGraph {
        let slices: Vec<DomainGraph> = captures
            .par_iter()
            .map(|c| self.normalize_page(c))
            .collect();
        let mut graph = DomainGraph::default();
        for slice in slices {
            graph.merge_from(slice);
        }
        info!(
            pages = captures.len(),
            models = graph.models.len(),
            sections = graph.sections.len(),
            trims = graph.trims.len(),
            "normalized captures"
        );
        graph
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{PageMetadata, RawNode};

    fn capture() -> PageCapture {
        PageCapture {
            url: "https://www.chevrolet.ca/en/trucks/silverado-1500".to_string(),
            base_url: "https://www.chevrolet.ca".to_string(),
            metadata: PageMetadata {
                title: Some("2024 Chevrolet Silverado 1500 | Chevrolet Canada".to_string()),
                description: Some("A truck.".to_string()),
                canonical: Some("https://www.chevrolet.ca/en/trucks/silverado-1500".to_string()),
                language: Some("en-CA".to_string()),
                ..Default::default()
            },
            body: vec![RawNode::new("div")
                .with_child(RawNode::new("h2").with_text("Towing"))
                .with_child(RawNode::new("p").with_text("Up to 13,300 lb."))],
            ..Default::default()
        }
    }

    #[test]
    fn page_normalization_is_deterministic() {
        let n = Normalizer::new(BrandProfile::chevrolet());
        let a = n.normalize_page(&capture());
        let b = n.normalize_page(&capture());
        assert_eq!(a, b);
        assert_eq!(a.models[0].id, "silverado-1500");
        assert_eq!(a.models[0].year, Some(2024));
        assert_eq!(a.sections.len(), 1);
    }

    #[test]
    fn normalize_all_merges_duplicate_pages() {
        let n = Normalizer::new(BrandProfile::chevrolet());
        let graph = n.normalize_all(&[capture(), capture()]);
        assert_eq!(graph.models.len(), 1);
        assert_eq!(graph.sections.len(), 1);
    }

    #[test]
    fn outline_reads_the_body_structure() {
        let n = Normalizer::new(BrandProfile::chevrolet());
        let outline = n.outline(&capture());
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].heading.as_deref(), Some("Towing"));
    }
}

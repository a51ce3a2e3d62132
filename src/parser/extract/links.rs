use crate::brand::BrandProfile;
use crate::graph::{LinkRef, ModelLinks};
use crate::parser::nodes::{visit_all, SerializedNode};
use crate::parser::SerializedPage;
use crate::text::classify_link;

/// Action links pooled from every region of a page, de-duplicated and in
/// document order. Buttons count as links here.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageLinks {
    pub find_dealer_url: Option<String>,
    pub build_and_price_urls: Vec<String>,
    pub inventory_urls: Vec<String>,
}

impl PageLinks {
    pub fn collect(page: &SerializedPage) -> PageLinks {
        let mut pool = PageLinks::default();
        for region in [&page.navbar, &page.body, &page.footer] {
            visit_all(region, &mut |n| {
                let (text, url) = match n {
                    SerializedNode::Link { text, href, .. } => (text, href),
                    SerializedNode::Button { text, url, .. } => (text, url),
                    _ => return,
                };
                let low = text.to_lowercase();
                if low.contains("find a dealer") && pool.find_dealer_url.is_none() {
                    pool.find_dealer_url = Some(url.clone());
                }
                if low.contains("build") && low.contains("price") {
                    if !pool.build_and_price_urls.contains(url) {
                        pool.build_and_price_urls.push(url.clone());
                    }
                }
                if low.contains("inventory") || url.contains("SearchResults") {
                    if !pool.inventory_urls.contains(url) {
                        pool.inventory_urls.push(url.clone());
                    }
                }
            });
        }
        pool
    }

    /// Pick this model's action links out of the pool: a URL mentioning the
    /// model's slug or name wins, otherwise the first entry stands in.
    pub fn select_for_model(
        &self,
        profile: &BrandProfile,
        model_id: &str,
        model_name: &str,
        base_url: Option<&str>,
    ) -> ModelLinks {
        let pick = |urls: &[String]| -> Option<String> {
            urls.iter()
                .find(|u| url_mentions_model(u, model_id, model_name))
                .or_else(|| urls.first())
                .cloned()
        };
        let as_ref = |url: Option<String>| -> Option<LinkRef> {
            url.map(|u| LinkRef {
                link_type: classify_link(Some(&u), base_url, &profile.brands),
                url: u,
            })
        };
        ModelLinks {
            build_and_price: as_ref(pick(&self.build_and_price_urls)),
            inventory: as_ref(pick(&self.inventory_urls)),
            find_dealer: as_ref(self.find_dealer_url.clone()),
        }
    }
}

/// Slug match, or the name's tokens joined by any of the separators URLs use.
fn url_mentions_model(url: &str, model_id: &str, model_name: &str) -> bool {
    let low = url.to_lowercase();
    if !model_id.is_empty() && model_id != "item" && low.contains(model_id) {
        return true;
    }
    let tokens: Vec<String> = model_name
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        return false;
    }
    [" ", "+", "%20", "-", ""]
        .iter()
        .any(|sep| low.contains(&tokens.join(sep)))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LinkType;

    fn link(text: &str, href: &str) -> SerializedNode {
        SerializedNode::Link {
            text: text.to_string(),
            href: href.to_string(),
            link_type: LinkType::Internal,
            target: None,
            content: vec![],
        }
    }

    fn page(nodes: Vec<SerializedNode>) -> SerializedPage {
        SerializedPage {
            navbar: nodes,
            ..Default::default()
        }
    }

    #[test]
    fn pools_by_label_and_url_shape() {
        let pool = PageLinks::collect(&page(vec![
            link("Find a Dealer", "https://www.chevrolet.ca/en/dealer-locator"),
            link("Build & Price", "https://www.chevrolet.ca/en/build?model=silverado-1500"),
            link("View Inventory", "https://www.chevrolet.ca/en/inv"),
            link("Shop", "https://www.chevrolet.ca/SearchResults?q=equinox"),
            link("View Inventory", "https://www.chevrolet.ca/en/inv"),
        ]));
        assert_eq!(
            pool.find_dealer_url.as_deref(),
            Some("https://www.chevrolet.ca/en/dealer-locator")
        );
        assert_eq!(pool.build_and_price_urls.len(), 1);
        assert_eq!(pool.inventory_urls.len(), 2);
    }

    #[test]
    fn model_specific_url_beats_first_entry() {
        let pool = PageLinks::collect(&page(vec![
            link("Build & Price", "https://www.chevrolet.ca/en/build?model=equinox"),
            link("Build & Price", "https://www.chevrolet.ca/en/build?model=silverado-1500"),
        ]));
        let links = pool.select_for_model(
            &BrandProfile::chevrolet(),
            "silverado-1500",
            "Silverado 1500",
            Some("https://www.chevrolet.ca"),
        );
        let bp = links.build_and_price.unwrap();
        assert!(bp.url.contains("silverado-1500"));
        assert_eq!(bp.link_type, Some(LinkType::Internal));
    }

    #[test]
    fn name_tokens_match_url_encodings() {
        assert!(url_mentions_model(
            "https://x/SearchResults?search=Silverado%201500",
            "other",
            "Silverado 1500"
        ));
        assert!(url_mentions_model(
            "https://x/inv?q=silverado+1500",
            "other",
            "Silverado 1500"
        ));
        assert!(!url_mentions_model("https://x/inv?q=equinox", "silverado-1500", "Silverado 1500"));
    }

    #[test]
    fn empty_pool_yields_empty_links() {
        let pool = PageLinks::collect(&page(vec![link("Gallery", "https://x/gallery")]));
        let links = pool.select_for_model(&BrandProfile::chevrolet(), "m", "M", None);
        assert_eq!(links, ModelLinks::default());
    }
}

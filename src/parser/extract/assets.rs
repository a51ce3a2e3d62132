use crate::graph::Asset;
use crate::parser::nodes::{visit_all, SerializedNode};
use crate::parser::SerializedPage;
use crate::text::short_hash;

/// Image assets across all three regions, de-duplicated by URL. The first
/// occurrence's alt text wins.
pub fn extract(page: &SerializedPage) -> Vec<Asset> {
    let mut out: Vec<Asset> = Vec::new();
    for region in [&page.navbar, &page.body, &page.footer] {
        visit_all(region, &mut |n| {
            let SerializedNode::Image { src: Some(url), alt, .. } = n else {
                return;
            };
            if out.iter().any(|a| a.url == *url) {
                return;
            }
            out.push(Asset {
                id: format!("img:{}", short_hash(url, 10)),
                kind: "image".to_string(),
                url: url.clone(),
                alt: alt.clone().filter(|a| !a.is_empty()),
            });
        });
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn img(src: &str, alt: Option<&str>) -> SerializedNode {
        SerializedNode::Image {
            src: Some(src.to_string()),
            alt: alt.map(str::to_string),
            title: None,
            loading: None,
            link_type: None,
            data: vec![],
        }
    }

    #[test]
    fn dedups_by_url_keeping_first_alt() {
        let page = SerializedPage {
            body: vec![
                img("https://www.chevrolet.ca/img/hero.jpg", Some("Silverado hero")),
                img("https://www.chevrolet.ca/img/hero.jpg", Some("other alt")),
                img("https://www.chevrolet.ca/img/grille.jpg", None),
            ],
            ..Default::default()
        };
        let assets = extract(&page);
        assert_eq!(assets.len(), 2);
        assert!(assets[0].id.starts_with("img:"));
        assert_eq!(assets[0].id.len(), "img:".len() + 10);
        assert_eq!(assets[0].alt.as_deref(), Some("Silverado hero"));
        assert_eq!(assets[1].alt, None);
    }
}

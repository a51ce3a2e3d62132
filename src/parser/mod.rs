pub mod extract;
pub mod nodes;
pub mod outline;

use serde::Serialize;

use crate::raw::{PageCapture, RawNode};
use nodes::SerializedNode;

/// Serialized form of one capture: the three page regions as typed node
/// forests, structural noise already flattened away.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SerializedPage {
    pub navbar: Vec<SerializedNode>,
    pub body: Vec<SerializedNode>,
    pub footer: Vec<SerializedNode>,
}

pub fn serialize_region(nodes: &[RawNode], base: &str) -> Vec<SerializedNode> {
    let mut out = Vec::new();
    for node in nodes {
        nodes::walk(node, base).append_to(&mut out);
    }
    out
}

/// First pipeline pass: raw markup trees → typed serialized forests.
pub fn serialize_page(capture: &PageCapture) -> SerializedPage {
    let base = &capture.base_url;
    SerializedPage {
        navbar: serialize_region(&capture.navbar, base),
        body: serialize_region(&capture.body, base),
        footer: serialize_region(&capture.footer, base),
    }
}

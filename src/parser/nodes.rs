use serde::Serialize;
use tracing::debug;

use crate::raw::RawNode;
use crate::text::{self, AttrJson, LinkType};

/// Typed result of serializing one markup element. Flattened/dropped nodes
/// never appear here; they are handled by [`Walked`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SerializedNode {
    Link {
        text: String,
        href: String,
        link_type: LinkType,
        target: Option<String>,
        content: Vec<SerializedNode>,
    },
    Button {
        text: String,
        url: String,
        link_type: LinkType,
        data: Vec<(String, String)>,
        aria: Vec<(String, String)>,
        content: Vec<SerializedNode>,
    },
    Image {
        src: Option<String>,
        alt: Option<String>,
        title: Option<String>,
        loading: Option<String>,
        link_type: Option<LinkType>,
        data: Vec<(String, String)>,
    },
    Source {
        media: Option<String>,
        width: Option<String>,
        height: Option<String>,
        srcset: Vec<String>,
        aspect_ratio: Option<String>,
    },
    Heading {
        level: u8,
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    ListItem {
        text: String,
    },
    Paragraph {
        text: String,
        content: Vec<SerializedNode>,
    },
    DynamicText {
        country: Option<String>,
        regional: Option<AttrJson>,
        content: Vec<SerializedNode>,
    },
    Disclosure {
        text: Option<String>,
        disclosure_id: Option<String>,
    },
    Table {
        rows: Vec<Vec<String>>,
    },
    Path {
        data: PathData,
    },
    Svg {
        attrs: Vec<(String, String)>,
        paths: Vec<PathData>,
        content: Vec<SerializedNode>,
    },
    RegionSelector {
        attrs: Vec<(String, AttrJson)>,
        content: Vec<SerializedNode>,
    },
    AccountFlyout {
        flyout_state: Option<String>,
        auth_flyout: Option<AttrJson>,
        auth_links: Option<AttrJson>,
        fallback: Option<AttrJson>,
        content: Vec<SerializedNode>,
    },
    Generic {
        tag: String,
        text: Option<String>,
        content: Vec<SerializedNode>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathData {
    pub d: Option<String>,
    pub attrs: Vec<(String, String)>,
}

impl SerializedNode {
    /// Nested content list of this node, empty for leaf kinds.
    pub fn content(&self) -> &[SerializedNode] {
        match self {
            SerializedNode::Link { content, .. }
            | SerializedNode::Button { content, .. }
            | SerializedNode::Paragraph { content, .. }
            | SerializedNode::DynamicText { content, .. }
            | SerializedNode::Svg { content, .. }
            | SerializedNode::RegionSelector { content, .. }
            | SerializedNode::AccountFlyout { content, .. }
            | SerializedNode::Generic { content, .. } => content,
            _ => &[],
        }
    }

    pub fn heading_text(&self) -> Option<&str> {
        match self {
            SerializedNode::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, SerializedNode::Heading { .. })
    }
}

/// Visible text of a serialized node. Kinds whose `text` field already covers
/// the full subtree (links, paragraphs) do not recurse.
pub fn node_text(n: &SerializedNode) -> String {
    fn join(nodes: &[SerializedNode]) -> String {
        let parts: Vec<String> = nodes.iter().map(node_text).filter(|s| !s.is_empty()).collect();
        parts.join(" ")
    }
    match n {
        SerializedNode::Link { text, .. }
        | SerializedNode::Button { text, .. }
        | SerializedNode::Heading { text, .. }
        | SerializedNode::ListItem { text }
        | SerializedNode::Paragraph { text, .. } => text.clone(),
        SerializedNode::Image { alt, .. } => alt.clone().unwrap_or_default(),
        SerializedNode::List { items, .. } => items.join(" "),
        SerializedNode::Disclosure { text, .. } => text.clone().unwrap_or_default(),
        SerializedNode::Table { rows } => rows
            .iter()
            .map(|r| r.join(" "))
            .collect::<Vec<_>>()
            .join(" "),
        SerializedNode::DynamicText { content, .. }
        | SerializedNode::RegionSelector { content, .. }
        | SerializedNode::AccountFlyout { content, .. } => join(content),
        SerializedNode::Generic { text, content, .. } => {
            let mut parts = Vec::new();
            if let Some(t) = text {
                parts.push(t.clone());
            }
            let rest = join(content);
            if !rest.is_empty() {
                parts.push(rest);
            }
            parts.join(" ")
        }
        SerializedNode::Source { .. } | SerializedNode::Path { .. } | SerializedNode::Svg { .. } => {
            String::new()
        }
    }
}

/// Depth-first visit over every node in the forest.
pub fn visit_all<'a>(nodes: &'a [SerializedNode], f: &mut impl FnMut(&'a SerializedNode)) {
    for node in nodes {
        f(node);
        visit_all(node.content(), f);
    }
}

/// Visit every sibling list in the forest, the root list included. Lets
/// callers reason about heading/sibling adjacency at any nesting depth.
pub fn visit_lists<'a>(nodes: &'a [SerializedNode], f: &mut impl FnMut(&'a [SerializedNode])) {
    f(nodes);
    for node in nodes {
        let content = node.content();
        if !content.is_empty() {
            visit_lists(content, f);
        }
    }
}

/// Walk result: one node, a flattened sequence, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Walked {
    One(SerializedNode),
    Many(Vec<SerializedNode>),
    None,
}

impl Walked {
    pub fn append_to(self, out: &mut Vec<SerializedNode>) {
        match self {
            Walked::One(n) => out.push(n),
            Walked::Many(ns) => out.extend(ns),
            Walked::None => {}
        }
    }
}

/// Serializer outcome. `Fallback` hands the already-serialized children back
/// so the walker can downgrade to the generic serializer without rework.
enum Serialized {
    Node(SerializedNode),
    Skip,
    Fallback(Vec<SerializedNode>),
}

#[derive(Debug, Clone, Copy)]
enum TagKind {
    Link,
    Button,
    Input,
    Image,
    Source,
    Table,
    DynamicText,
    Heading,
    UnorderedList,
    OrderedList,
    ListItem,
    Paragraph,
    AccountFlyout,
    Disclosure,
    Svg,
    Path,
    RegionSelector,
}

fn kind_for(tag: &str) -> Option<TagKind> {
    Some(match tag {
        "a" => TagKind::Link,
        "button" => TagKind::Button,
        "input" => TagKind::Input,
        "img" => TagKind::Image,
        "source" => TagKind::Source,
        "table" => TagKind::Table,
        "gb-dynamic-text" => TagKind::DynamicText,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => TagKind::Heading,
        "ul" => TagKind::UnorderedList,
        "ol" => TagKind::OrderedList,
        "li" => TagKind::ListItem,
        "p" => TagKind::Paragraph,
        "gb-myaccount-flyout" => TagKind::AccountFlyout,
        "gb-disclosure" => TagKind::Disclosure,
        "svg" => TagKind::Svg,
        "path" => TagKind::Path,
        "gb-region-selector" => TagKind::RegionSelector,
        _ => return None,
    })
}

// Structural noise: dropped, children survive.
fn is_excluded(tag: &str) -> bool {
    matches!(
        tag,
        "script"
            | "style"
            | "noscript"
            | "template"
            | "br"
            | "div"
            | "section"
            | "nav"
            | "article"
            | "gb-adv-grid"
            | "gb-wrapper"
            | "gb-responsive-image"
            | "adv-col"
            | "gb-tab-nav"
            | "gb-sub-flyout"
            | "gb-sublinks"
            | "gb-main-flyout"
            | "gb-flyout"
    )
}

// Structurally transparent containers, collapsed when they carry nothing.
fn is_wrapper(tag: &str) -> bool {
    matches!(
        tag,
        "header" | "main" | "footer" | "aside" | "picture" | "adv-grid" | "gb-secondary-nav"
    )
}

// Stylistic inline tags merged into their parent; the set is shared with
// `RawNode::own_text` so elided text always survives in the parent.
fn is_inline(tag: &str) -> bool {
    crate::raw::is_inline_tag(tag)
}

/// Recursive tree-to-node transform. Never fails: serializers that cannot
/// apply fall back to the generic record.
pub fn walk(node: &RawNode, base: &str) -> Walked {
    let tag = node.tag.to_ascii_lowercase();

    if is_excluded(&tag) {
        let mut kids = Vec::new();
        for child in &node.children {
            walk(child, base).append_to(&mut kids);
        }
        return if kids.is_empty() { Walked::None } else { Walked::Many(kids) };
    }

    let mut children = Vec::new();
    for child in &node.children {
        walk(child, base).append_to(&mut children);
    }

    if is_inline(&tag) && !node.has_semantic_attrs() {
        // Text already captured via the parent's own-text collection.
        return if children.is_empty() { Walked::None } else { Walked::Many(children) };
    }

    let children = match kind_for(&tag) {
        Some(kind) => match dispatch(kind, &tag, node, base, children) {
            Serialized::Node(n) => return Walked::One(n),
            Serialized::Skip => return Walked::None,
            Serialized::Fallback(children) => {
                debug!(tag = %tag, "serializer fell back to generic");
                children
            }
        },
        None => children,
    };

    if is_wrapper(&tag) {
        let class = node.attr("class").unwrap_or("").trim();
        if class.is_empty() && node.own_text().is_empty() && !children.is_empty() {
            return Walked::Many(children);
        }
    }

    Walked::One(serialize_generic(node, children))
}

fn dispatch(
    kind: TagKind,
    tag: &str,
    node: &RawNode,
    base: &str,
    children: Vec<SerializedNode>,
) -> Serialized {
    match kind {
        TagKind::Link => serialize_link(node, base, children),
        TagKind::Button => serialize_button(node, base, children),
        TagKind::Input => {
            match node.attr("type") {
                Some("button") | Some("submit") | Some("reset") => {
                    serialize_button(node, base, children)
                }
                _ => Serialized::Fallback(children),
            }
        }
        TagKind::Image => serialize_image(node, base),
        TagKind::Source => serialize_source(node, base),
        TagKind::Table => serialize_table(node),
        TagKind::DynamicText => serialize_dynamic_text(node, children),
        TagKind::Heading => {
            // kind_for guarantees h1..h6.
            let level = tag.as_bytes()[1] - b'0';
            Serialized::Node(SerializedNode::Heading {
                level,
                text: node.all_text(),
            })
        }
        TagKind::UnorderedList => serialize_list(false, children),
        TagKind::OrderedList => serialize_list(true, children),
        TagKind::ListItem => serialize_list_item(node, children),
        TagKind::Paragraph => serialize_paragraph(node, children),
        TagKind::AccountFlyout => serialize_account_flyout(node, children),
        TagKind::Disclosure => serialize_disclosure(node),
        TagKind::Svg => serialize_svg(node, children),
        TagKind::Path => Serialized::Node(SerializedNode::Path {
            data: path_data(node),
        }),
        TagKind::RegionSelector => serialize_region_selector(node, children),
    }
}

fn serialize_generic(node: &RawNode, children: Vec<SerializedNode>) -> SerializedNode {
    let text = node.own_text();
    SerializedNode::Generic {
        tag: node.tag.to_ascii_lowercase(),
        text: if text.is_empty() { None } else { Some(text) },
        content: children,
    }
}

fn link_type_of(href: &str, base: &str) -> LinkType {
    if text::is_internal_link(href, base) {
        LinkType::Internal
    } else {
        LinkType::External
    }
}

fn serialize_link(node: &RawNode, base: &str, children: Vec<SerializedNode>) -> Serialized {
    let Some(href) = node.attr("href") else {
        return Serialized::Skip;
    };
    let Some(resolved) = text::resolve_url(base, href) else {
        return Serialized::Skip;
    };
    Serialized::Node(SerializedNode::Link {
        text: node.all_text(),
        href: resolved,
        link_type: link_type_of(href, base),
        target: node.attr("target").map(str::to_string),
        content: children,
    })
}

fn serialize_button(node: &RawNode, base: &str, children: Vec<SerializedNode>) -> Serialized {
    let Some(action) = node.attr("href").or_else(|| node.attr("formaction")) else {
        return Serialized::Skip;
    };
    let Some(resolved) = text::resolve_url(base, action) else {
        return Serialized::Skip;
    };
    let aria = ["title", "aria-haspopup", "aria-expanded"]
        .iter()
        .filter_map(|k| node.attr(k).map(|v| (k.to_string(), v.to_string())))
        .collect();
    Serialized::Node(SerializedNode::Button {
        text: node.all_text(),
        url: resolved,
        link_type: link_type_of(action, base),
        data: node.data_attrs(),
        aria,
        content: children,
    })
}

fn serialize_image(node: &RawNode, base: &str) -> Serialized {
    let src = node.attr("src");
    Serialized::Node(SerializedNode::Image {
        src: src.and_then(|s| text::resolve_url(base, s)),
        alt: node.attr("alt").map(str::to_string),
        title: node.attr("title").map(str::to_string),
        loading: node.attr("loading").map(str::to_string),
        link_type: src.map(|s| link_type_of(s, base)),
        data: node.data_attrs(),
    })
}

fn serialize_source(node: &RawNode, base: &str) -> Serialized {
    let srcset = node.attr("srcset").unwrap_or("").replace('\n', " ");
    let urls = srcset
        .split(',')
        .filter_map(|part| part.trim().split_whitespace().next())
        .filter_map(|u| text::resolve_url(base, u))
        .collect();
    Serialized::Node(SerializedNode::Source {
        media: node.attr("media").map(str::to_string),
        width: node.attr("width").map(str::to_string),
        height: node.attr("height").map(str::to_string),
        srcset: urls,
        aspect_ratio: node.attr("data-aspectratio").map(str::to_string),
    })
}

fn serialize_table(node: &RawNode) -> Serialized {
    let mut trs = Vec::new();
    node.find_all("tr", &mut trs);
    let mut rows = Vec::new();
    for tr in trs {
        let cells: Vec<String> = tr
            .children
            .iter()
            .filter(|c| c.tag.eq_ignore_ascii_case("th") || c.tag.eq_ignore_ascii_case("td"))
            .map(|c| c.all_text())
            .collect();
        if cells.iter().any(|c| !c.is_empty()) {
            rows.push(cells);
        }
    }
    Serialized::Node(SerializedNode::Table { rows })
}

fn serialize_dynamic_text(node: &RawNode, children: Vec<SerializedNode>) -> Serialized {
    let regional = node
        .attr("regional-information-json")
        .or_else(|| node.attr("regional-information"))
        .and_then(text::parse_attr_json);
    Serialized::Node(SerializedNode::DynamicText {
        country: node.attr("country").map(str::to_string),
        regional,
        content: children,
    })
}

fn serialize_list(ordered: bool, children: Vec<SerializedNode>) -> Serialized {
    // Only leaf item text survives; nested structure is dropped.
    let items = children
        .into_iter()
        .filter_map(|c| match c {
            SerializedNode::ListItem { text } if !text.is_empty() => Some(text),
            _ => None,
        })
        .collect();
    Serialized::Node(SerializedNode::List { ordered, items })
}

fn serialize_list_item(node: &RawNode, children: Vec<SerializedNode>) -> Serialized {
    let mut base_parts = vec![node.own_text()];
    let mut tails: Vec<String> = Vec::new();
    for child in &children {
        match child {
            SerializedNode::Disclosure { text: Some(t), .. } => tails.push(t.clone()),
            SerializedNode::Disclosure { text: None, .. } => {}
            other => {
                let t = node_text(other);
                if !t.is_empty() {
                    base_parts.push(t);
                }
            }
        }
    }
    let base = base_parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let text = if tails.is_empty() {
        base
    } else if base.ends_with('-') {
        // Trailing hyphen marks a fused-word join with the first footnote.
        let mut s = format!("{}{}", base, tails[0].trim_start());
        if tails.len() > 1 {
            s.push(' ');
            s.push_str(&tails[1..].join(" "));
        }
        s
    } else {
        format!("{} {}", base, tails.join(" "))
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        Serialized::Skip
    } else {
        Serialized::Node(SerializedNode::ListItem { text })
    }
}

fn serialize_paragraph(node: &RawNode, children: Vec<SerializedNode>) -> Serialized {
    let text = node.all_text();
    let class = node.attr("class").unwrap_or("").trim();
    let has_other_attrs = node.attrs.iter().any(|(k, _)| k != "class");
    if text.is_empty() && children.is_empty() && class.is_empty() && !has_other_attrs {
        return Serialized::Skip;
    }
    Serialized::Node(SerializedNode::Paragraph {
        text,
        content: children,
    })
}

fn serialize_account_flyout(node: &RawNode, children: Vec<SerializedNode>) -> Serialized {
    Serialized::Node(SerializedNode::AccountFlyout {
        flyout_state: node.attr("flyoutstate").map(str::to_string),
        auth_flyout: node.attr("authflyoutdata").and_then(text::parse_attr_json),
        auth_links: node.attr("authlinkdata").and_then(text::parse_attr_json),
        fallback: node.attr("fallbackdata").and_then(text::parse_attr_json),
        content: children,
    })
}

fn serialize_disclosure(node: &RawNode) -> Serialized {
    let all = node.all_text();
    let own = node.own_text();
    let text = if !all.is_empty() {
        Some(all)
    } else if !own.is_empty() {
        Some(own)
    } else {
        None
    };
    Serialized::Node(SerializedNode::Disclosure {
        text,
        disclosure_id: node.attr("data-disclosure-id").map(str::to_string),
    })
}

fn path_data(node: &RawNode) -> PathData {
    PathData {
        d: node
            .attr("d")
            .map(|d| d.chars().filter(|c| *c != '\n' && *c != '\t').collect()),
        attrs: node
            .attrs
            .iter()
            .filter(|(k, _)| k != "d")
            .cloned()
            .collect(),
    }
}

fn serialize_svg(node: &RawNode, children: Vec<SerializedNode>) -> Serialized {
    let mut path_nodes = Vec::new();
    node.find_all("path", &mut path_nodes);
    let paths = path_nodes.iter().map(|p| path_data(p)).collect();
    // Path children are already captured in `paths`; keep the rest.
    let content = children
        .into_iter()
        .filter(|c| !matches!(c, SerializedNode::Path { .. }))
        .collect();
    Serialized::Node(SerializedNode::Svg {
        attrs: node.attrs.clone(),
        paths,
        content,
    })
}

fn serialize_region_selector(node: &RawNode, children: Vec<SerializedNode>) -> Serialized {
    let attrs = node
        .attrs
        .iter()
        .map(|(k, v)| {
            let parsed = text::parse_attr_json(v).unwrap_or_else(|| AttrJson::Raw(v.clone()));
            (k.clone(), parsed)
        })
        .collect();
    Serialized::Node(SerializedNode::RegionSelector {
        attrs,
        content: children,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.chevrolet.ca";

    fn walk_one(node: &RawNode) -> SerializedNode {
        match walk(node, BASE) {
            Walked::One(n) => n,
            other => panic!("expected one node, got {:?}", other),
        }
    }

    #[test]
    fn link_without_href_is_dropped() {
        let a = RawNode::new("a").with_text("no destination");
        assert_eq!(walk(&a, BASE), Walked::None);
    }

    #[test]
    fn link_internality_resolves_against_base() {
        let a = RawNode::new("a").with_attr("href", "/en/trucks/x").with_text("Trucks");
        match walk_one(&a) {
            SerializedNode::Link { href, link_type, text, .. } => {
                assert_eq!(href, "https://www.chevrolet.ca/en/trucks/x");
                assert_eq!(link_type, LinkType::Internal);
                assert_eq!(text, "Trucks");
            }
            other => panic!("not a link: {:?}", other),
        }

        let ext = RawNode::new("a").with_attr("href", "https://external.example.com");
        match walk_one(&ext) {
            SerializedNode::Link { link_type, .. } => assert_eq!(link_type, LinkType::External),
            other => panic!("not a link: {:?}", other),
        }
    }

    #[test]
    fn excluded_tags_flatten_children() {
        let div = RawNode::new("div")
            .with_child(RawNode::new("h2").with_text("Towing"))
            .with_child(RawNode::new("p").with_text("Up to 13,300 lb"));
        match walk(&div, BASE) {
            Walked::Many(kids) => {
                assert_eq!(kids.len(), 2);
                assert!(kids[0].is_heading());
            }
            other => panic!("expected flattened children, got {:?}", other),
        }
    }

    #[test]
    fn inline_span_merges_unless_semantic() {
        let plain = RawNode::new("span").with_text("just style");
        assert_eq!(walk(&plain, BASE), Walked::None);

        let semantic = RawNode::new("span").with_attr("data-ref", "7").with_text("kept");
        match walk_one(&semantic) {
            SerializedNode::Generic { tag, text, .. } => {
                assert_eq!(tag, "span");
                assert_eq!(text.as_deref(), Some("kept"));
            }
            other => panic!("expected generic, got {:?}", other),
        }
    }

    #[test]
    fn elided_emphasis_text_survives_in_list_items() {
        let li = RawNode::new("li")
            .with_text("Tows up to")
            .with_child(RawNode::new("strong").with_text("13,300 lb"))
            .with_child(RawNode::new("span").with_text("when equipped"));
        match walk_one(&li) {
            SerializedNode::ListItem { text } => {
                assert_eq!(text, "Tows up to 13,300 lb when equipped");
            }
            other => panic!("not a list item: {:?}", other),
        }
    }

    #[test]
    fn wrapper_collapses_without_class_or_text() {
        let picture = RawNode::new("picture")
            .with_child(RawNode::new("img").with_attr("src", "/img/a.jpg"));
        assert!(matches!(walk(&picture, BASE), Walked::Many(kids) if kids.len() == 1));

        let classed = RawNode::new("picture")
            .with_attr("class", "hero")
            .with_child(RawNode::new("img").with_attr("src", "/img/a.jpg"));
        assert!(matches!(walk_one(&classed), SerializedNode::Generic { .. }));
    }

    #[test]
    fn input_dispatch_gated_on_type() {
        let submit = RawNode::new("input")
            .with_attr("type", "submit")
            .with_attr("formaction", "/en/search");
        assert!(matches!(walk_one(&submit), SerializedNode::Button { .. }));

        let text_field = RawNode::new("input").with_attr("type", "text");
        assert!(matches!(walk_one(&text_field), SerializedNode::Generic { .. }));
    }

    #[test]
    fn heading_levels() {
        let h3 = RawNode::new("h3").with_text("Performance");
        match walk_one(&h3) {
            SerializedNode::Heading { level, text } => {
                assert_eq!(level, 3);
                assert_eq!(text, "Performance");
            }
            other => panic!("not a heading: {:?}", other),
        }
    }

    #[test]
    fn list_flattens_to_item_texts() {
        let ul = RawNode::new("ul")
            .with_child(RawNode::new("li").with_text("Heated seats"))
            .with_child(RawNode::new("li"))
            .with_child(RawNode::new("li").with_text("Tow hooks"));
        match walk_one(&ul) {
            SerializedNode::List { ordered, items } => {
                assert!(!ordered);
                assert_eq!(items, vec!["Heated seats", "Tow hooks"]);
            }
            other => panic!("not a list: {:?}", other),
        }
    }

    #[test]
    fn list_item_fuses_hyphenated_footnote() {
        let li = RawNode::new("li")
            .with_text("Multi-")
            .with_child(RawNode::new("gb-disclosure").with_text("Flex Tailgate"));
        match walk_one(&li) {
            SerializedNode::ListItem { text } => assert_eq!(text, "Multi-Flex Tailgate"),
            other => panic!("not a list item: {:?}", other),
        }

        let li2 = RawNode::new("li")
            .with_text("Trailering package")
            .with_child(RawNode::new("gb-disclosure").with_text("1"));
        match walk_one(&li2) {
            SerializedNode::ListItem { text } => assert_eq!(text, "Trailering package 1"),
            other => panic!("not a list item: {:?}", other),
        }
    }

    #[test]
    fn empty_paragraph_suppressed_unless_attributed() {
        assert_eq!(walk(&RawNode::new("p"), BASE), Walked::None);

        let classed = RawNode::new("p").with_attr("class", "spacer");
        assert!(matches!(walk_one(&classed), SerializedNode::Paragraph { .. }));
    }

    #[test]
    fn dynamic_text_parses_regional_attribute() {
        let node = RawNode::new("gb-dynamic-text")
            .with_attr("country", "CA")
            .with_attr(
                "regional-information-json",
                r#"{"ON":{"startingPrice":"$50,000"}}"#,
            )
            .with_child(RawNode::new("p").with_text("From: $50,000"));
        match walk_one(&node) {
            SerializedNode::DynamicText { country, regional, content } => {
                assert_eq!(country.as_deref(), Some("CA"));
                assert!(regional.unwrap().as_object().unwrap().contains_key("ON"));
                assert_eq!(content.len(), 1);
            }
            other => panic!("not dynamic text: {:?}", other),
        }
    }

    #[test]
    fn table_drops_empty_rows() {
        let table = RawNode::new("table")
            .with_child(
                RawNode::new("tr")
                    .with_child(RawNode::new("th").with_text("Trim"))
                    .with_child(RawNode::new("th").with_text("Towing")),
            )
            .with_child(RawNode::new("tr").with_child(RawNode::new("td")));
        match walk_one(&table) {
            SerializedNode::Table { rows } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0], vec!["Trim", "Towing"]);
            }
            other => panic!("not a table: {:?}", other),
        }
    }

    #[test]
    fn svg_lifts_paths_out_of_content() {
        let svg = RawNode::new("svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_child(RawNode::new("path").with_attr("d", "M0\n\t0L1 1"));
        match walk_one(&svg) {
            SerializedNode::Svg { paths, content, .. } => {
                assert_eq!(paths.len(), 1);
                assert_eq!(paths[0].d.as_deref(), Some("M00L1 1"));
                assert!(content.is_empty());
            }
            other => panic!("not an svg: {:?}", other),
        }
    }
}

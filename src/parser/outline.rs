use serde::Serialize;

use super::nodes::SerializedNode;

/// One heading-rooted section of a page outline. The preamble (content before
/// the first heading) becomes a heading-less section at level 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutlineSection {
    pub heading: Option<String>,
    pub level: u8,
    pub content: Vec<SerializedNode>,
    pub sections: Vec<OutlineSection>,
}

enum Token {
    Heading(u8, String),
    Content(SerializedNode),
}

fn has_heading_descendant(node: &SerializedNode) -> bool {
    node.content()
        .iter()
        .any(|c| c.is_heading() || has_heading_descendant(c))
}

/// Linearize the forest into heading/content tokens. Containers that hold a
/// heading anywhere below are dissolved so their headings reach the top level;
/// heading-free subtrees stay opaque.
fn flatten(nodes: &[SerializedNode], out: &mut Vec<Token>) {
    for node in nodes {
        match node {
            SerializedNode::Heading { level, text } => {
                out.push(Token::Heading(*level, text.clone()))
            }
            n if has_heading_descendant(n) => flatten(n.content(), out),
            n => out.push(Token::Content(n.clone())),
        }
    }
}

/// Merge runs of adjacent same-level headings into one (split display
/// headings arrive as sibling elements).
fn merge_adjacent(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (&token, out.last_mut()) {
            (Token::Heading(level, text), Some(Token::Heading(prev_level, prev_text)))
                if level == prev_level =>
            {
                if !text.is_empty() {
                    if !prev_text.is_empty() {
                        prev_text.push(' ');
                    }
                    prev_text.push_str(text);
                }
            }
            _ => out.push(token),
        }
    }
    out
}

/// Assemble a nested outline from the serialized page body: headings open
/// sections, deeper levels nest, equal-or-shallower levels close back up.
pub fn build_outline(nodes: &[SerializedNode]) -> Vec<OutlineSection> {
    let mut tokens = Vec::new();
    flatten(nodes, &mut tokens);
    let tokens = merge_adjacent(tokens);

    let mut roots: Vec<OutlineSection> = Vec::new();
    let mut stack: Vec<OutlineSection> = Vec::new();
    let mut preamble: Option<OutlineSection> = None;

    fn close_to(stack: &mut Vec<OutlineSection>, roots: &mut Vec<OutlineSection>, level: u8) {
        while stack.last().map_or(false, |top| top.level >= level) {
            let done = stack.pop().unwrap();
            match stack.last_mut() {
                Some(parent) => parent.sections.push(done),
                None => roots.push(done),
            }
        }
    }

    for token in tokens {
        match token {
            Token::Heading(level, text) => {
                close_to(&mut stack, &mut roots, level);
                stack.push(OutlineSection {
                    heading: Some(text),
                    level,
                    content: Vec::new(),
                    sections: Vec::new(),
                });
            }
            Token::Content(node) => match stack.last_mut() {
                Some(top) => top.content.push(node),
                None => preamble
                    .get_or_insert_with(OutlineSection::default)
                    .content
                    .push(node),
            },
        }
    }
    close_to(&mut stack, &mut roots, 0);

    if let Some(pre) = preamble {
        roots.insert(0, pre);
    }
    roots
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn h(level: u8, text: &str) -> SerializedNode {
        SerializedNode::Heading {
            level,
            text: text.to_string(),
        }
    }

    fn p(text: &str) -> SerializedNode {
        SerializedNode::Paragraph {
            text: text.to_string(),
            content: vec![],
        }
    }

    #[test]
    fn nests_by_level_and_closes_on_equal() {
        let nodes = vec![h(1, "A"), p("X"), h(2, "B"), p("Y"), h(1, "C")];
        let outline = build_outline(&nodes);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].heading.as_deref(), Some("A"));
        assert_eq!(outline[0].content, vec![p("X")]);
        assert_eq!(outline[0].sections.len(), 1);
        assert_eq!(outline[0].sections[0].heading.as_deref(), Some("B"));
        assert_eq!(outline[0].sections[0].content, vec![p("Y")]);
        assert_eq!(outline[1].heading.as_deref(), Some("C"));
    }

    #[test]
    fn preamble_becomes_headingless_first_section() {
        let nodes = vec![p("intro"), h(2, "Towing")];
        let outline = build_outline(&nodes);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].heading, None);
        assert_eq!(outline[0].level, 0);
        assert_eq!(outline[0].content, vec![p("intro")]);
        assert_eq!(outline[1].heading.as_deref(), Some("Towing"));
    }

    #[test]
    fn adjacent_same_level_headings_merge() {
        let nodes = vec![h(2, "Trailering"), h(2, "& Towing"), p("x")];
        let outline = build_outline(&nodes);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].heading.as_deref(), Some("Trailering & Towing"));
    }

    #[test]
    fn containers_holding_headings_are_dissolved() {
        let wrapper = SerializedNode::Generic {
            tag: "gb-content-block".to_string(),
            text: None,
            content: vec![h(3, "Interior"), p("Leather")],
        };
        let outline = build_outline(&[wrapper]);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].heading.as_deref(), Some("Interior"));
        assert_eq!(outline[0].content, vec![p("Leather")]);
    }
}

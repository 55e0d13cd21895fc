//! Property-based round-trip tests
//!
//! Generates trees shaped like parser output (one tag key per node map,
//! comments and attributes beside it, sequences only for 2+ occurrences)
//! and verifies that rendering and re-parsing reproduces the tree.

use proptest::prelude::*;
use xmlmap::{from_str, Element, Sequence, Value, COMMENT_KEY};

/// Tag and attribute names
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

/// Body text as the parser stores it: trimmed, non-markup
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9&'() ]{0,16}".prop_map(|s| s.trim().to_string())
}

/// Attribute values: quoted on output, so no quotes or markup inside, and
/// no trailing slash (which would read back as a self-closing marker)
fn arb_attribute_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.]{0,10}"
}

/// Comment bodies: trimmed, free of the comment terminator
fn arb_comment() -> impl Strategy<Value = String> {
    "[a-z0-9 ]{0,12}".prop_map(|s| s.trim().to_string())
}

fn arb_attributes() -> impl Strategy<Value = Vec<(String, Value)>> {
    proptest::collection::vec(
        (
            arb_name(),
            prop_oneof![
                2 => arb_attribute_value().prop_map(Value::Text),
                1 => Just(Value::Bool(true)),
            ],
        ),
        0..3,
    )
}

/// One node map exactly as the parser builds it: the tag key first, then
/// `#comment`, then the attribute keys
fn node_map(
    content: impl Strategy<Value = Value>,
) -> impl Strategy<Value = Element> {
    (
        arb_name(),
        content,
        proptest::collection::vec(arb_comment(), 0..2),
        arb_attributes(),
    )
        .prop_map(|(tag, content, comments, attributes)| {
            let mut node = Element::new();
            node.insert(tag, content);
            if !comments.is_empty() {
                let comments: Sequence = comments.into_iter().map(Value::Text).collect();
                node.insert(COMMENT_KEY, comments);
            }
            for (name, value) in attributes {
                node.insert(format!("@{name}"), value);
            }
            node
        })
}

/// Element content the parser can produce: text, empty, a single child
/// node map, or a sequence of two or more node maps
fn arb_content() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        3 => arb_text().prop_map(Value::Text),
        1 => Just(Value::Empty),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            2 => node_map(inner.clone()).prop_map(Value::Element),
            1 => proptest::collection::vec(
                node_map(inner).prop_map(Value::Element),
                2..4
            )
            .prop_map(|maps| Value::Sequence(Sequence::from(maps))),
        ]
    })
}

/// A whole document map
fn arb_document() -> impl Strategy<Value = Element> {
    node_map(arb_content())
}

proptest! {
    #[test]
    fn render_parse_roundtrip(data in arb_document()) {
        let rendered = xmlmap::format_document(&data, None);
        let reparsed = from_str(&rendered);
        prop_assert!(reparsed.is_ok(), "rendered output failed to parse: {rendered}");
        if let Ok(converter) = reparsed {
            prop_assert_eq!(converter.data(), &data, "rendered as:\n{}", rendered);
        }
    }

    #[test]
    fn rendered_output_always_reparses(data in arb_document()) {
        let rendered = xmlmap::format_document(&data, Some("xml version=\"1.0\""));
        prop_assert!(from_str(&rendered).is_ok());
    }

    #[test]
    fn text_bodies_never_lose_content(text in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,14}[a-zA-Z0-9]") {
        let input = format!("<root><node>{text}</node></root>");
        let converter = from_str(&input);
        prop_assert!(converter.is_ok());
        if let Ok(converter) = converter {
            let node = converter
                .get("root")
                .and_then(Value::as_element)
                .and_then(|map| map.get("node"))
                .cloned();
            prop_assert_eq!(node, Some(Value::Text(text)));
        }
    }
}

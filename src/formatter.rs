//! Serializer rendering the tree model back to indented XML text

use crate::value::{Element, Sequence, Value, ATTRIBUTE_PREFIX, COMMENT_KEY};

/// Declaration emitted when a document never captured one
pub const DEFAULT_DECLARATION: &str = "xml version=\"1.0\" encoding=\"UTF-8\"";

const INDENT: &str = "    ";

/// Render a document: declaration line plus the tree under `data`
///
/// Values are emitted exactly as stored; nothing is escaped or decoded, so
/// a parsed document round-trips byte content faithfully.
///
/// # Panics
///
/// Panics if the tree contains a value the parser cannot produce in that
/// position: a boolean outside an attribute key, a sequence entry that is
/// not a node map, or a comment entry that is not text.
pub fn format_document(data: &Element, declaration: Option<&str>) -> String {
    let mut output = String::new();
    match declaration {
        Some(declaration) if !declaration.is_empty() => {
            output.push_str("<?");
            output.push_str(declaration);
            output.push_str("?>\n");
        }
        _ => {
            output.push_str("<?");
            output.push_str(DEFAULT_DECLARATION);
            output.push_str("?>\n");
        }
    }
    format_node(data, 0, &mut output);
    output
}

/// Render one node map at the given indent level
///
/// # Panics
///
/// As [`format_document`].
pub fn format_element(node: &Element, level: usize) -> String {
    let mut output = String::new();
    format_node(node, level, &mut output);
    output
}

fn format_node(node: &Element, level: usize, output: &mut String) {
    let indent = INDENT.repeat(level);

    if let Some(Value::Sequence(comments)) = node.get(COMMENT_KEY) {
        for comment in comments {
            let Some(text) = comment.as_text() else {
                contract_violation("a comment entry that is not text");
            };
            output.push('\n');
            output.push_str(&apply_indentation(
                &format!("{indent}<!-- {text} -->"),
                &indent,
            ));
            output.push('\n');
        }
    }

    let entries: Vec<(&String, &Value)> = node
        .iter()
        .filter(|(key, _)| *key != COMMENT_KEY)
        .collect();

    let mut attributes = String::new();
    let mut tags: Vec<(&String, &Value)> = Vec::new();
    if entries.len() > 1 {
        for (key, value) in entries {
            match key.strip_prefix(ATTRIBUTE_PREFIX) {
                Some(name) => {
                    attributes.push(' ');
                    attributes.push_str(name);
                    match value {
                        Value::Bool(_) => {}
                        Value::Text(text) => {
                            attributes.push_str("=\"");
                            attributes.push_str(text);
                            attributes.push('"');
                        }
                        _ => contract_violation("an attribute that is neither text nor bare"),
                    }
                }
                None => tags.push((key, value)),
            }
        }
    } else {
        tags = entries;
    }

    for (tag, value) in tags {
        match value {
            Value::Element(children) => {
                output.push_str(&format!("{indent}<{tag}{attributes}>\n"));
                format_node(children, level + 1, output);
                output.push_str(&format!("{indent}</{tag}>\n"));
            }
            Value::Sequence(occurrences) => {
                output.push_str(&format!("{indent}<{tag}{attributes}>\n"));
                format_occurrences(occurrences, level + 1, output);
                output.push_str(&format!("{indent}</{tag}>\n"));
            }
            Value::Empty => {
                output.push_str(&format!("{indent}<{tag}{attributes} />\n"));
            }
            Value::Text(text) => {
                output.push_str(&format!("{indent}<{tag}{attributes}>{text}</{tag}>\n"));
            }
            Value::Bool(_) => contract_violation("a boolean outside an attribute key"),
        }
    }
}

fn format_occurrences(occurrences: &Sequence, level: usize, output: &mut String) {
    for occurrence in occurrences {
        let Some(node) = occurrence.as_element() else {
            contract_violation("a sequence entry that is not a node map");
        };
        format_node(node, level, output);
    }
}

/// Re-indent embedded newlines so multi-line comments line up with their
/// block: any whitespace run containing a newline collapses to one newline
/// plus the current indent
fn apply_indentation(text: &str, indent: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut run = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            run.push(ch);
        } else {
            flush_whitespace_run(&mut result, &run, indent);
            run.clear();
            result.push(ch);
        }
    }
    flush_whitespace_run(&mut result, &run, indent);
    result
}

fn flush_whitespace_run(result: &mut String, run: &str, indent: &str) {
    if run.contains('\n') {
        result.push('\n');
        result.push_str(indent);
    } else {
        result.push_str(run);
    }
}

/// The tree could not have come from the parser; this is a caller bug, not
/// a recoverable condition
#[allow(clippy::panic)]
fn contract_violation(found: &str) -> ! {
    panic!("xml tree cannot be rendered: contains {found}");
}

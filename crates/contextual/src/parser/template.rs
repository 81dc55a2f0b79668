//! Template string scanner using winnow.
//!
//! Splits a string into literal text, escaped braces, and `{name}`
//! placeholders. A placeholder name is one-or-more non-brace characters,
//! or a single balanced nested `{...}` group captured raw. Anything that
//! does not form a well-formed placeholder falls through as literal text,
//! so scanning never fails.

use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use super::ast::Segment;

/// Scan a template string into segments.
pub fn scan(input: &str) -> Vec<Segment> {
    let mut remaining = input;
    match template(&mut remaining) {
        Ok(segments) if remaining.is_empty() => segments,
        // Unreachable: the grammar consumes any character. Kept as a
        // literal fallback so scanning stays total.
        _ => vec![Segment::Literal(input.to_string())],
    }
}

/// Parse a complete template into segments.
fn template(input: &mut &str) -> ModalResult<Vec<Segment>> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;
    Ok(merge_literals(segments))
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

/// Parse a single segment (escape, placeholder, or literal).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((escaped_brace, placeholder, literal_char)).parse_next(input)
}

/// Parse an escaped delimiter: \{ or \}
fn escaped_brace(input: &mut &str) -> ModalResult<Segment> {
    alt((
        "\\{".value(Segment::Escaped('{')),
        "\\}".value(Segment::Escaped('}')),
    ))
    .parse_next(input)
}

/// Parse a single literal character.
///
/// Braces that did not open a well-formed placeholder end up here, which
/// lets a later pass find placeholders nested inside them.
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    any.map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse a placeholder: '{' name '}'
fn placeholder(input: &mut &str) -> ModalResult<Segment> {
    delimited('{', placeholder_name, '}')
        .map(Segment::Placeholder)
        .parse_next(input)
}

/// Parse a placeholder name: plain characters or one nested group.
fn placeholder_name(input: &mut &str) -> ModalResult<String> {
    alt((simple_name, nested_group)).parse_next(input)
}

/// Parse a run of non-brace characters. A trailing backslash would escape
/// the closing brace, so it is rejected here.
fn simple_name(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| c != '{' && c != '}')
        .verify(|s: &str| !s.ends_with('\\'))
        .map(ToString::to_string)
        .parse_next(input)
}

/// Parse one balanced `{...}` group, captured raw with its braces.
fn nested_group(input: &mut &str) -> ModalResult<String> {
    delimited('{', placeholder_name, '}')
        .take()
        .map(ToString::to_string)
        .parse_next(input)
}

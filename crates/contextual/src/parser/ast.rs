/// One piece of a scanned template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, copied through untouched.
    Literal(String),

    /// An escaped brace (`\{` or `\}`), never treated as a delimiter.
    Escaped(char),

    /// A `{name}` placeholder. The name is captured raw, so a nested
    /// `{{inner}}` group keeps its braces.
    Placeholder(String),
}

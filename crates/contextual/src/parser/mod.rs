//! Placeholder scanning for template strings.

mod ast;
mod template;

pub use ast::Segment;
pub use template::scan;

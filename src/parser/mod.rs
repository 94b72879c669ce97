//! Markup parsing module.

mod frontmatter;
mod markup;
mod options;

pub use markup::{from_markup, MarkupParser, ParseOutcome, ParseWarning};
pub use options::{ErrorMode, ParseOptions};

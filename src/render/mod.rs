//! Rendering module for converting pages to markup and JSON.

mod frontmatter;
mod json;
mod markup;
mod numbering;
mod options;

pub use frontmatter::render_front_matter;
pub use json::{from_json, to_json, JsonFormat};
pub use markup::{to_markup, MarkupRenderer};
pub use numbering::list_label;
pub use options::RenderOptions;

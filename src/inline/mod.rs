//! Inline markup codec for rich text.
//!
//! [`encode_inline`] and [`decode_inline`] are near-inverses: decoding the
//! encoding of any rich text yields the same spans once adjacent runs with
//! identical annotations are merged. Code spans carry no annotation other
//! than a link, and line breaks inside code spans become spaces.

mod decode;
mod encode;

pub use decode::decode_inline;
pub use encode::{encode_inline, escape_text};

pub(crate) use encode::{escape_line_start, longest_run};

//! Rendering of extracted outlines.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::to_text;

//! PDF parsing module.

mod content;
mod source;

pub use source::{LopdfSource, PdfSource};

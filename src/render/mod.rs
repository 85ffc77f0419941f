//! Rendering of reports and decoded documents.

mod json;

pub use json::{document_to_json, to_json, JsonFormat};

pub mod etl;
pub mod mapper;
pub mod parser;
pub mod pipeline;
pub mod renderer;

pub use crate::domain::model::{LegacyDocument, PurchaseOrder, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

use std::path::Path;

/// Convert legacy export text straight into purchase-order XML.
pub fn convert(text: &str) -> Result<String> {
    let document = parser::parse(text);
    let order = mapper::map_document(&document);
    renderer::render(&order)
}

/// Decode raw export bytes, replacing invalid UTF-8 sequences.
pub fn decode_input(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read a legacy export file and convert it.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = std::fs::read(path)?;
    convert(&decode_input(&bytes))
}

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    convert, convert_file, etl::ConversionEngine, mapper::extract_address, mapper::map_order,
    parser::parse, pipeline::OrderPipeline, renderer::render,
};
pub use domain::model::{
    Attribute, HeaderMap, LegacyDocument, LineRecord, OrderLine, PurchaseOrder, Quantity,
    ShipToAddress,
};
pub use utils::error::{ConvertError, Result};

pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_STEM: &str = "purchase_order";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "legacy-order-xml")]
#[command(about = "Convert legacy tag-delimited order exports into PurchaseOrder XML")]
pub struct CliConfig {
    /// Legacy order export to convert
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "xml")]
    pub output_formats: Vec<String>,

    /// Output file name without extension
    #[arg(long, default_value = DEFAULT_OUTPUT_STEM)]
    pub filename: String,

    /// Print the XML document instead of writing files
    #[arg(long)]
    pub stdout: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn output_stem(&self) -> &str {
        &self.filename
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_path("input", &self.input)?;
        if !self.stdout {
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_output_formats("output_formats", &self.output_formats)?;
            validation::validate_non_empty_string("filename", &self.filename)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["legacy-order-xml", "--input", "order.txt"]);
        assert_eq!(config.input_path(), "order.txt");
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_formats().to_vec(), vec!["xml".to_string()]);
        assert_eq!(config.output_stem(), "purchase_order");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_formats_are_comma_delimited() {
        let config = CliConfig::parse_from([
            "legacy-order-xml",
            "-i",
            "order.txt",
            "--output-formats",
            "xml,json,csv",
        ]);
        assert_eq!(config.output_formats().len(), 3);
        assert!(config.wants_format("csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let config = CliConfig::parse_from([
            "legacy-order-xml",
            "-i",
            "order.txt",
            "--output-formats",
            "xml,pdf",
        ]);
        assert!(config.validate().is_err());
    }
}

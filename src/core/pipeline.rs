use crate::core::{decode_input, mapper, parser, renderer};
use crate::core::{ConfigProvider, LegacyDocument, Pipeline, PurchaseOrder, Storage, TransformResult};
use crate::utils::error::{ConvertError, Result};

pub struct OrderPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> OrderPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, extension: &str) -> String {
        let base = self.config.output_path().trim_end_matches('/');
        format!("{}/{}.{}", base, self.config.output_stem(), extension)
    }
}

/// One row per order line: reference, quantity, item and `KEY=VALUE;...` attributes.
pub fn lines_to_csv(order: &PurchaseOrder) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Reference", "Quantity", "ItemId", "Attributes"])?;

    for line in &order.lines {
        let attributes = line
            .attributes
            .iter()
            .map(|a| format!("{}={}", a.key, a.value))
            .collect::<Vec<_>>()
            .join(";");
        let quantity = line.quantity.to_string();
        writer.write_record([
            line.reference.as_str(),
            quantity.as_str(),
            line.item_id.as_str(),
            attributes.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ConvertError::IoError(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OrderPipeline<S, C> {
    async fn extract(&self) -> Result<LegacyDocument> {
        tracing::debug!("Reading legacy export from: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;
        let text = decode_input(&bytes);
        Ok(parser::parse(&text))
    }

    async fn transform(&self, document: LegacyDocument) -> Result<TransformResult> {
        let purchase_order = mapper::map_document(&document);
        let xml_output = renderer::render(&purchase_order)?;

        let json_output = if self.config.wants_format("json") {
            Some(serde_json::to_string_pretty(&purchase_order)?)
        } else {
            None
        };

        let csv_output = if self.config.wants_format("csv") {
            Some(lines_to_csv(&purchase_order)?)
        } else {
            None
        };

        Ok(TransformResult {
            purchase_order,
            xml_output,
            json_output,
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut written = Vec::new();

        if self.config.wants_format("xml") {
            let path = self.output_file("xml");
            self.storage
                .write_file(&path, result.xml_output.as_bytes())
                .await?;
            written.push(path);
        }

        if let Some(json) = &result.json_output {
            let path = self.output_file("json");
            self.storage.write_file(&path, json.as_bytes()).await?;
            written.push(path);
        }

        if let Some(csv) = &result.csv_output {
            let path = self.output_file("csv");
            self.storage.write_file(&path, csv.as_bytes()).await?;
            written.push(path);
        }

        tracing::debug!("Wrote {} file(s): {}", written.len(), written.join(", "));

        written
            .into_iter()
            .next()
            .ok_or_else(|| ConvertError::ConfigError {
                message: "no output format selected".to_string(),
            })
    }
}

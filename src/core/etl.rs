use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting conversion...");

        // Extract
        let document = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} header field(s) and {} line block(s)",
            document.header.len(),
            document.lines.len()
        );

        // Transform
        let result = self.pipeline.transform(document).await?;
        tracing::info!(
            "Mapped purchase order '{}' with {} line(s)",
            result.purchase_order.order_number,
            result.purchase_order.lines.len()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}

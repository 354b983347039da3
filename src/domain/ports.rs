use crate::domain::model::{LegacyDocument, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn output_stem(&self) -> &str;

    fn wants_format(&self, format: &str) -> bool {
        self.output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<LegacyDocument>;
    async fn transform(&self, document: LegacyDocument) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}

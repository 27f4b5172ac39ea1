use crate::domain::model::{BatchReport, ClientTable, DerivedTable, InvalidRowPolicy, LengthPolicy};
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn account_column(&self) -> &str;
    fn length_policy(&self) -> LengthPolicy;
    fn on_invalid(&self) -> InvalidRowPolicy;
    fn output_formats(&self) -> &[String];
    fn output_stem(&self) -> &str;
}

pub trait Pipeline: Send + Sync {
    fn extract(&self) -> Result<ClientTable>;
    fn transform(&self, table: ClientTable) -> Result<DerivedTable>;
    fn load(&self, table: DerivedTable) -> Result<BatchReport>;
}

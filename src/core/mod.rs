pub mod batch;
pub mod ccp;
pub mod engine;

pub use crate::domain::model::{BatchReport, ClientTable, DerivedTable};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

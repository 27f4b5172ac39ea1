pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use self::core::{
    batch::BatchPipeline,
    ccp::{derive, CcpEngine},
    engine::BatchEngine,
};
pub use domain::model::{
    BatchReport, CcpDerivationResult, CcpDetails, Derivation, InvalidReason, InvalidRowPolicy,
    LengthPolicy, RipVerification, RIP_LEN, RIP_PREFIX,
};
pub use utils::error::{CcpError, Result};

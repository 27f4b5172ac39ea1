use crate::core::batch::OUTPUT_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::model::{InvalidRowPolicy, LengthPolicy};
use crate::utils::error::{CcpError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// How single-account results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ccp-rip")]
#[command(about = "Derive Algérie Poste CCP keys and RIP identifiers")]
pub struct CliConfig {
    /// CCP account numbers, or RIPs when --verify is set
    pub accounts: Vec<String>,

    /// CSV/TSV file of client rows to derive in batch
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "ccp_account")]
    pub account_column: String,

    #[arg(long, value_enum, default_value_t = LengthPolicy::Strict)]
    pub length_policy: LengthPolicy,

    #[arg(long, value_enum, default_value_t = InvalidRowPolicy::Keep)]
    pub on_invalid: InvalidRowPolicy,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub output_formats: Vec<String>,

    #[arg(long, default_value = "ccp_rip")]
    pub output_stem: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Check complete RIPs instead of deriving from account numbers
    #[arg(long)]
    pub verify: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn is_batch(&self) -> bool {
        self.input.is_some()
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn account_column(&self) -> &str {
        &self.account_column
    }

    fn length_policy(&self) -> LengthPolicy {
        self.length_policy
    }

    fn on_invalid(&self) -> InvalidRowPolicy {
        self.on_invalid
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn output_stem(&self) -> &str {
        &self.output_stem
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.input {
            None if self.accounts.is_empty() => Err(CcpError::MissingConfigError {
                field: "accounts or --input".to_string(),
            }),
            None => Ok(()),
            Some(_) if !self.accounts.is_empty() => Err(CcpError::ConfigValidationError {
                field: "input".to_string(),
                message: "pass either account numbers or --input, not both".to_string(),
            }),
            Some(_) if self.verify => Err(CcpError::ConfigValidationError {
                field: "verify".to_string(),
                message: "--verify only applies to RIPs given on the command line".to_string(),
            }),
            Some(input) => {
                validation::validate_path("input", input)?;
                validation::validate_path("output_path", &self.output_path)?;
                validation::validate_non_empty_string("account_column", &self.account_column)?;
                validation::validate_non_empty_string("output_stem", &self.output_stem)?;
                validation::validate_unique_subset(
                    "output_formats",
                    &self.output_formats,
                    &OUTPUT_FORMATS,
                )
            }
        }
    }
}

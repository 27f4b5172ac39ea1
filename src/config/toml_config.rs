use crate::core::batch::OUTPUT_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::model::{InvalidRowPolicy, LengthPolicy};
use crate::utils::error::{CcpError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchConfig,
    pub derivation: Option<DerivationConfig>,
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub name: String,
    pub description: Option<String>,
    pub input_path: String,
    pub account_column: Option<String>,
    pub on_invalid: Option<InvalidRowPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    pub length_policy: Option<LengthPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub file_stem: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "compact" (default) or "json"
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    pub const DEFAULT_ACCOUNT_COLUMN: &'static str = "ccp_account";
    pub const DEFAULT_FILE_STEM: &'static str = "ccp_rip";

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| CcpError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn wants_json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|f| f == "json")
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.batch.input_path
    }

    fn account_column(&self) -> &str {
        self.batch
            .account_column
            .as_deref()
            .unwrap_or(Self::DEFAULT_ACCOUNT_COLUMN)
    }

    fn length_policy(&self) -> LengthPolicy {
        self.derivation
            .as_ref()
            .and_then(|d| d.length_policy)
            .unwrap_or_default()
    }

    fn on_invalid(&self) -> InvalidRowPolicy {
        self.batch.on_invalid.unwrap_or_default()
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn output_stem(&self) -> &str {
        self.load
            .file_stem
            .as_deref()
            .unwrap_or(Self::DEFAULT_FILE_STEM)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("batch.name", &self.batch.name)?;
        validation::validate_path("batch.input_path", &self.batch.input_path)?;
        validation::validate_non_empty_string("batch.account_column", self.account_column())?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string("load.file_stem", self.output_stem())?;
        validation::validate_unique_subset(
            "load.output_formats",
            &self.load.output_formats,
            &OUTPUT_FORMATS,
        )?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validation::validate_one_of("logging.format", format, &["compact", "json"])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[batch]
name = "clients"
input_path = "clients.csv"

[load]
output_path = "./output"
output_formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.batch.name, "clients");
        assert_eq!(config.input_path(), "clients.csv");
        assert_eq!(config.account_column(), "ccp_account");
        assert_eq!(config.length_policy(), LengthPolicy::Strict);
        assert_eq!(config.on_invalid(), InvalidRowPolicy::Keep);
        assert_eq!(config.output_stem(), "ccp_rip");
        assert!(!config.wants_json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[batch]
name = "providers"
description = "Provider payout accounts"
input_path = "providers.tsv"
account_column = "ccp"
on_invalid = "fail"

[derivation]
length_policy = "lenient"

[load]
output_path = "./out"
output_formats = ["tsv"]
file_stem = "providers_rip"

[logging]
format = "json"
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.account_column(), "ccp");
        assert_eq!(config.on_invalid(), InvalidRowPolicy::Fail);
        assert_eq!(config.length_policy(), LengthPolicy::Lenient);
        assert_eq!(config.output_stem(), "providers_rip");
        assert!(config.wants_json_logs());
        assert!(config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let toml_content = BASIC.replace(
            "input_path = \"clients.csv\"",
            "input_path = \"clients.csv\"\non_invalid = \"ignore\"",
        );
        assert!(matches!(
            TomlConfig::from_toml_str(&toml_content),
            Err(CcpError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CCP_RIP_TEST_INPUT", "/data/clients.csv");

        let toml_content = BASIC.replace("clients.csv", "${CCP_RIP_TEST_INPUT}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.input_path(), "/data/clients.csv");

        std::env::remove_var("CCP_RIP_TEST_INPUT");
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let toml_content = BASIC.replace("clients.csv", "${CCP_RIP_TEST_UNSET}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.input_path(), "${CCP_RIP_TEST_UNSET}");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = BASIC.replace("[\"csv\", \"json\"]", "[\"xlsx\"]");
        let config = TomlConfig::from_toml_str(&bad_format).unwrap();
        assert!(config.validate().is_err());

        let blank_column = BASIC.replace(
            "input_path = \"clients.csv\"",
            "input_path = \"clients.csv\"\naccount_column = \" \"",
        );
        let config = TomlConfig::from_toml_str(&blank_column).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.batch.name, "clients");
    }
}

use crate::utils::error::{CcpError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CcpError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CcpError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CcpError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(CcpError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Allowed values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Every entry must be allowed and appear at most once.
pub fn validate_unique_subset(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    if values.is_empty() {
        return Err(CcpError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one value is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for value in values {
        validate_one_of(field_name, value, allowed)?;
        if !seen.insert(value.as_str()) {
            return Err(CcpError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: "Listed more than once".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("load.output_path", "./output").is_ok());
        assert!(validate_path("load.output_path", "").is_err());
        assert!(validate_path("load.output_path", "out\0put").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("batch.account_column", "ccp").is_ok());
        assert!(validate_non_empty_string("batch.account_column", "   ").is_err());
    }

    #[test]
    fn test_validate_unique_subset() {
        let allowed = ["csv", "tsv", "json"];
        let ok = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_unique_subset("load.output_formats", &ok, &allowed).is_ok());

        let unknown = vec!["xml".to_string()];
        assert!(validate_unique_subset("load.output_formats", &unknown, &allowed).is_err());

        let duplicated = vec!["csv".to_string(), "csv".to_string()];
        assert!(validate_unique_subset("load.output_formats", &duplicated, &allowed).is_err());

        assert!(validate_unique_subset("load.output_formats", &[], &allowed).is_err());
    }
}

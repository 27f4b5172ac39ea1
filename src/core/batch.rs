use crate::core::ccp::CcpEngine;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    BatchReport, ClientTable, Derivation, DerivedTable, InvalidReason, InvalidRowPolicy,
};
use crate::utils::error::{CcpError, Result};
use std::path::Path;

/// Columns the pipeline fills in, in output order.
pub const DERIVED_COLUMNS: [&str; 4] = ["cle", "rip", "rip_cle", "ccp_valid"];

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// Reads client rows, derives their CCP identifiers, writes them back out.
pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    engine: CcpEngine,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let engine = CcpEngine::new(config.length_policy());
        Self {
            storage,
            config,
            engine,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn output_file(&self, format: &str) -> String {
        format!("{}.{}", self.config.output_stem(), format)
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    fn extract(&self) -> Result<ClientTable> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading client rows from: {}", input_path);

        let data = self.storage.read_file(input_path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(input_delimiter(input_path))
            .from_reader(data.as_slice());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!("Extracted {} rows", rows.len());
        Ok(ClientTable { headers, rows })
    }

    fn transform(&self, table: ClientTable) -> Result<DerivedTable> {
        let column = self.config.account_column();
        let account_idx = table
            .headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| CcpError::MissingColumnError {
                column: column.to_string(),
            })?;

        // Reuse derived columns already present so re-runs stay idempotent.
        let mut headers = table.headers;
        let derived_idx: Vec<usize> = DERIVED_COLUMNS
            .iter()
            .map(|name| match headers.iter().position(|h| h == name) {
                Some(idx) => idx,
                None => {
                    headers.push(name.to_string());
                    headers.len() - 1
                }
            })
            .collect();

        let policy = self.config.on_invalid();
        let mut report = BatchReport {
            rows: table.rows.len(),
            ..BatchReport::default()
        };
        let mut rows = Vec::with_capacity(table.rows.len());

        for (i, mut row) in table.rows.into_iter().enumerate() {
            let row_number = i + 1;
            let account = row.get(account_idx).map(String::as_str).unwrap_or("");
            let derivation = self.engine.derive(account);

            let values = match &derivation {
                Derivation::Valid(details) => {
                    report.valid += 1;
                    [
                        details.check_key().to_string(),
                        details.rip().to_string(),
                        details.rip_check_key().to_string(),
                        "true".to_string(),
                    ]
                }
                Derivation::Invalid(reason) => {
                    if *reason == InvalidReason::Empty {
                        report.pending += 1;
                    } else {
                        report.invalid += 1;
                        tracing::warn!(
                            "Row {}: invalid CCP account {:?}: {}",
                            row_number,
                            account,
                            reason
                        );
                        if policy == InvalidRowPolicy::Fail {
                            return Err(CcpError::InvalidAccountError {
                                row: row_number,
                                account: account.to_string(),
                                reason: reason.to_string(),
                            });
                        }
                    }

                    if policy == InvalidRowPolicy::Skip {
                        report.skipped += 1;
                        continue;
                    }
                    [String::new(), String::new(), String::new(), "false".to_string()]
                }
            };

            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            for (idx, value) in derived_idx.iter().zip(values) {
                row[*idx] = value;
            }
            rows.push(row);
        }

        tracing::debug!(
            "Derived {} valid, {} invalid, {} pending rows",
            report.valid,
            report.invalid,
            report.pending
        );

        Ok(DerivedTable {
            headers,
            rows,
            report,
        })
    }

    fn load(&self, table: DerivedTable) -> Result<BatchReport> {
        let mut report = table.report;

        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "csv" => write_delimited(&table.headers, &table.rows, b',')?,
                "tsv" => write_delimited(&table.headers, &table.rows, b'\t')?,
                "json" => write_json(&table.headers, &table.rows)?,
                other => {
                    return Err(CcpError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: format!("Allowed values: {}", OUTPUT_FORMATS.join(", ")),
                    })
                }
            };

            let file_name = self.output_file(format);
            self.storage.write_file(&file_name, &data)?;
            tracing::debug!("Wrote {} ({} bytes)", file_name, data.len());
            report.outputs.push(file_name);
        }

        Ok(report)
    }
}

fn input_delimiter(path: &str) -> u8 {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn write_delimited(headers: &[String], rows: &[Vec<String>], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| CcpError::IoError(e.into_error()))
}

fn write_json(headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .zip(row)
                .map(|(header, value)| {
                    let value = if header == "ccp_valid" {
                        serde_json::Value::Bool(value == "true")
                    } else {
                        serde_json::Value::String(value.clone())
                    };
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(serde_json::to_vec_pretty(&objects)?)
}

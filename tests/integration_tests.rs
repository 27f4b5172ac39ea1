use ccp_rip::utils::validation::Validate;
use ccp_rip::{BatchEngine, BatchPipeline, CcpError, LocalStorage, TomlConfig};
use tempfile::TempDir;

const CLIENTS: &str = "\
id,first_name,last_name,ccp_account
1,Amine,Haddad,1234567890
2,Sara,Benali,42
3,Yacine,Mansouri,00 42
4,Lina,Cherif,
";

fn config_for(temp_dir: &TempDir, extra_batch: &str, formats: &str) -> TomlConfig {
    let input = temp_dir.path().join("clients.csv");
    std::fs::write(&input, CLIENTS).unwrap();

    let toml_content = format!(
        r#"
[batch]
name = "clients"
input_path = "{}"
{}

[load]
output_path = "{}"
output_formats = {}
file_stem = "clients_rip"
"#,
        input.display(),
        extra_batch,
        temp_dir.path().join("out").display(),
        formats
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn test_end_to_end_batch_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir, "", r#"["csv", "json"]"#);

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = BatchEngine::new(BatchPipeline::new(storage, config));
    let report = engine.run().unwrap();

    assert_eq!(report.rows, 4);
    assert_eq!(report.valid, 2);
    assert_eq!(report.invalid, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(report.outputs, vec!["clients_rip.csv", "clients_rip.json"]);

    let out_dir = temp_dir.path().join("out");
    let csv_content = std::fs::read_to_string(out_dir.join("clients_rip.csv")).unwrap();
    assert!(csv_content.starts_with("id,first_name,last_name,ccp_account,cle,rip,rip_cle,ccp_valid\n"));
    assert!(csv_content.contains("1,Amine,Haddad,1234567890,45,00799999123456789006,06,true"));
    assert!(csv_content.contains("3,Yacine,Mansouri,00 42,,,,false"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("clients_rip.json")).unwrap())
            .unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1]["first_name"], "Sara");
    assert_eq!(rows[1]["cle"], "28");
    assert_eq!(rows[1]["rip"], "00799999000000004280");
    assert_eq!(rows[3]["ccp_valid"], false);
}

#[test]
fn test_fail_policy_stops_before_writing() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir, r#"on_invalid = "fail""#, r#"["csv"]"#);

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = BatchEngine::new(BatchPipeline::new(storage, config));

    match engine.run() {
        Err(CcpError::InvalidAccountError { row, account, .. }) => {
            assert_eq!(row, 3);
            assert_eq!(account, "00 42");
        }
        other => panic!("expected InvalidAccountError, got {:?}", other),
    }
    assert!(!temp_dir.path().join("out").join("clients_rip.csv").exists());
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&temp_dir, "", r#"["csv"]"#);
    config.batch.input_path = temp_dir.path().join("nope.csv").display().to_string();

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = BatchEngine::new(BatchPipeline::new(storage, config));

    let err = engine.run().unwrap_err();
    assert!(matches!(err, CcpError::IoError(_)));
    assert_eq!(err.severity(), ccp_rip::utils::error::ErrorSeverity::Critical);
}

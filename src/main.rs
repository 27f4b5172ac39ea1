use ccp_rip::utils::error::{CcpError, ErrorSeverity};
use ccp_rip::utils::{logger, validation::Validate};
use ccp_rip::{BatchEngine, BatchPipeline, CcpEngine, CliConfig, Derivation, LocalStorage};
use ccp_rip::config::OutputFormat;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let engine = CcpEngine::new(config.length_policy);

    if config.is_batch() {
        run_batch(config);
        return Ok(());
    }

    let all_valid = if config.verify {
        verify_rips(&engine, &config)?
    } else {
        derive_accounts(&engine, &config)?
    };

    if !all_valid {
        std::process::exit(2);
    }
    Ok(())
}

fn derive_accounts(engine: &CcpEngine, config: &CliConfig) -> anyhow::Result<bool> {
    let mut all_valid = true;

    for raw in &config.accounts {
        let derivation = engine.derive(raw);
        all_valid &= derivation.is_valid();

        match config.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(&derivation.to_result())?);
            }
            OutputFormat::Text => match &derivation {
                Derivation::Valid(details) => {
                    println!("CCP:     {} clé {}", details.account_number(), details.check_key());
                    println!("RIP:     {}", details.rip());
                    println!("RIP clé: {}", details.rip_check_key());
                }
                Derivation::Invalid(reason) => {
                    println!("{:?}: invalid ({})", raw, reason);
                }
            },
        }
    }

    Ok(all_valid)
}

fn verify_rips(engine: &CcpEngine, config: &CliConfig) -> anyhow::Result<bool> {
    let mut all_valid = true;

    for raw in &config.accounts {
        let verification = engine.verify_rip(raw);
        all_valid &= verification.is_valid();

        match config.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "rip": raw.trim(),
                    "isValid": verification.is_valid(),
                    "detail": verification.to_string(),
                });
                println!("{}", serde_json::to_string(&value)?);
            }
            OutputFormat::Text => println!("{}: {}", raw.trim(), verification),
        }
    }

    Ok(all_valid)
}

fn run_batch(config: CliConfig) {
    let storage = LocalStorage::new(config.output_path.clone());
    let engine = BatchEngine::new(BatchPipeline::new(storage, config));

    match engine.run() {
        Ok(report) => {
            println!(
                "✅ {} rows: {} valid, {} invalid, {} without account, {} skipped",
                report.rows, report.valid, report.invalid, report.pending, report.skipped
            );
            let storage = engine.pipeline().storage();
            for output in &report.outputs {
                println!("📁 {}", storage.output_location(output).display());
            }
        }
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &CcpError) -> ! {
    tracing::error!(
        "Batch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

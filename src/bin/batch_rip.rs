use ccp_rip::config::toml_config::DerivationConfig;
use ccp_rip::core::ConfigProvider;
use ccp_rip::utils::error::ErrorSeverity;
use ccp_rip::utils::{logger, validation::Validate};
use ccp_rip::{BatchEngine, BatchPipeline, LengthPolicy, LocalStorage, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "batch-rip")]
#[command(about = "Derive CCP keys and RIPs for a CSV of client records, driven by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "ccp-batch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the length policy from the config
    #[arg(long, value_enum)]
    length_policy: Option<LengthPolicy>,

    /// Show what would be processed without reading or writing any rows
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.wants_json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose || config.verbose());
    }
    tracing::info!("Loaded configuration from: {}", args.config);

    if let Some(policy) = args.length_policy {
        config
            .derivation
            .get_or_insert(DerivationConfig {
                length_policy: None,
            })
            .length_policy = Some(policy);
        tracing::info!("Length policy overridden to: {:?}", policy);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        println!("🔍 Dry run: nothing was read or written.");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
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
        Err(e) => {
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
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Batch: {}", config.batch.name);
    if let Some(description) = &config.batch.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Account column: {}", config.account_column());
    println!("  Length policy: {:?}", config.length_policy());
    println!("  Invalid rows: {:?}", config.on_invalid());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

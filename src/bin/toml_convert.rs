use clap::Parser;
use legacy_order_xml::core::{decode_input, mapper, parser, ConfigProvider};
use legacy_order_xml::utils::{logger, validation::Validate};
use legacy_order_xml::{ConversionEngine, LocalStorage, OrderPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-convert")]
#[command(about = "Convert legacy order exports using a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "order-job.toml")]
    config: String,

    /// Override the input file from the job file
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Parse and map the input, print a summary, write nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(if args.verbose { "debug" } else { config.log_level() });
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == "debug");
    }

    tracing::info!("Loaded configuration from: {}", args.config);

    if let Some(input) = &args.input {
        config.set_input_path(input.clone());
        tracing::info!("Input overridden to: {}", input);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::default();
    let pipeline = OrderPipeline::new(storage, config);
    let engine = ConversionEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Wrote {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Job: {} {}",
        config.conversion.name,
        config.conversion.version.as_deref().unwrap_or("")
    );
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  File name: {}", config.output_stem());
    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let bytes = std::fs::read(config.input_path())?;
    let document = parser::parse(&decode_input(&bytes));
    let order = mapper::map_document(&document);

    println!("🔍 Dry Run Analysis:");
    println!("  Header fields: {}", document.header.len());
    println!("  Line blocks: {}", document.lines.len());
    println!("  Order number: {}", order.order_number);
    println!(
        "  Ship to: {} / {} {} {}",
        order.ship_to.name, order.ship_to.zip_code, order.ship_to.city, order.ship_to.country
    );
    for line in &order.lines {
        println!(
            "  - {} x{} {} ({} attribute(s))",
            line.reference,
            line.quantity,
            line.item_id,
            line.attributes.len()
        );
    }
    println!();
    println!("✅ Dry run complete. Nothing was written.");

    Ok(())
}

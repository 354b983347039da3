use clap::Parser;
use legacy_order_xml::utils::{logger, validation::Validate};
use legacy_order_xml::{convert_file, CliConfig, ConversionEngine, LocalStorage, OrderPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting legacy-order-xml");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    if config.stdout {
        match convert_file(&config.input) {
            Ok(xml) => {
                print!("{}", xml);
                return Ok(());
            }
            Err(e) => {
                tracing::error!("Conversion failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(e.exit_code());
            }
        }
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

use clap::Parser;
use vwap_engine::cli::{Cli, Commands};
use vwap_engine::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).unwrap_or_default()
    });

    match cli.command {
        Commands::Run(args) => {
            // Initialize telemetry before the remaining overrides so their warnings are kept
            args.apply_telemetry(&mut config.telemetry);
            let _telemetry = vwap_engine::telemetry::init_telemetry(&config.telemetry)?;
            args.apply(&mut config);

            tracing::info!(
                window = config.engine.window().get(),
                pairs = ?config.feed.pairs,
                "starting VWAP engine"
            );
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Feed: {} {} channel={}",
                config.feed.provider_name, config.feed.endpoint, config.feed.channel_name
            );
            println!("  Pairs: {}", config.feed.pairs.join(", "));
            println!(
                "  Engine: window={} parse_failure={:?}",
                config.engine.window(),
                config.engine.parse_failure
            );
            println!(
                "  Telemetry: level={} verbose={} metrics_port={:?}",
                config.telemetry.log_level, config.telemetry.verbose, config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}

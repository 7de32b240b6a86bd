use clap::Parser;
use poly_majority::cli::{Cli, Commands};
use poly_majority::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {:#}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = poly_majority::telemetry::init_telemetry(&config.telemetry, cli.verbose)?;

    match cli.command {
        Commands::Scan(args) => {
            tracing::info!("Starting scan");
            args.execute(&config).await?;
        }
        Commands::Evaluate(args) => {
            args.execute(&config).await?;
        }
        Commands::Interactive(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            let eval = &config.evaluation;
            let discovery = &config.discovery;
            println!("Current configuration:");
            println!(
                "  Evaluation: accuracy={}, min_ev={}, fee_rate={}",
                eval.majority_accuracy, eval.min_ev, eval.fee_rate
            );
            println!(
                "  Discovery: days_ahead={}, pad_days={}, limit={}, require_accepting={}, concurrency={}",
                discovery.days_ahead,
                discovery.pad_days,
                discovery.limit,
                discovery.require_accepting,
                discovery.concurrency
            );
            println!("  Gamma: {}", config.api.gamma_url);
            println!("  CLOB: {}", config.api.clob_url);
            println!(
                "  Telemetry: level={}, format={:?}",
                config.telemetry.log_level, config.telemetry.format
            );
        }
    }

    Ok(())
}

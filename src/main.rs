use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use energy_dashboard::{chart, cli, config, gateway, telemetry, view};
use chart::{ChartData, ChartSink, JsonLinesSink};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use gateway::HttpGateway;
use serde::Serialize;
use telemetry::init_tracing;
use tracing::info;
use view::{BreakdownSettings, BreakdownView, ForecastSettings, ForecastView};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let gateway = HttpGateway::from_config(&cfg.gateway).context("failed to build HTTP client")?;
    info!(base_url = %gateway.base_url(), "gateway ready");

    match &cli.command {
        Commands::Forecast(args) => {
            let mut view = ForecastView::new(ForecastSettings::from_config(&cfg));
            view.load(&gateway).await;
            args.replay(&mut view);
            emit(cli.format, &view.snapshot(), &view.charts())
        }
        Commands::Breakdown(args) => {
            let today = Local::now().date_naive();
            let mut view = BreakdownView::new(BreakdownSettings::from_config(&cfg), today);
            args.navigate(&mut view);
            view.load_week(&gateway).await;
            args.replay(&mut view);
            emit(cli.format, &view.snapshot(), &view.charts())
        }
    }
}

fn emit<S: Serialize>(format: OutputFormat, snapshot: &S, charts: &[ChartData]) -> Result<()> {
    let stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Snapshot => {
            serde_json::to_writer_pretty(stdout, snapshot).context("failed to write snapshot")?;
            println!();
        }
        OutputFormat::Charts => {
            let mut sink = JsonLinesSink::new(stdout);
            for chart in charts {
                sink.render(chart)?;
            }
        }
    }
    Ok(())
}

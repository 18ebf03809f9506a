//! A binary to just run one viewer session and print the table to stdout.
//! Logs go to stderr.

use orderbook_viewer::{
    config, pipeline::FramePipeline, pump::StreamPump, shutdown::shutdown_on_ctrl_c,
    sink::WriterSink, websocket::binance,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yml".to_owned());
    let config = config::read_config(&config_path)?;
    let symbol = config.symbol_or_prompt()?;

    let url = config.stream_url(&symbol)?;
    let (reader, closer) = binance::connect(&url).await?;
    let pump = StreamPump::new(
        reader,
        closer,
        WriterSink::new(tokio::io::stdout()),
        FramePipeline::from_config(&symbol, &config),
        config.close_timeout(),
    );
    let summary = pump.run(shutdown_on_ctrl_c()).await?;
    info!(
        frames = summary.frames_written,
        skipped = summary.frames_skipped,
        "done"
    );
    Ok(())
}

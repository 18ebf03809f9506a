use orderbook_viewer::{
    config,
    http_server::{self, ViewerState},
    shutdown::shutdown_on_ctrl_c,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yml".to_owned());
    let config = config::read_config(&config_path)?;
    let symbol = config.symbol_or_prompt()?;

    println!(
        "Connect to http://{} using your browser to start getting {symbol} orders data",
        config.addr
    );
    println!("Press Ctrl+C to stop the server");

    let addr = config.addr;
    let state = ViewerState::new(config, symbol, shutdown_on_ctrl_c());
    http_server::run_http_server(state, addr).await
}

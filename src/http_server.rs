//! HTTP endpoint streaming the order book table to a single viewer.
//!
//! Each `GET /` dials the exchange and starts a [StreamPump] session whose frames are
//! written into the response body as they are rendered. The session ends when the
//! viewer disconnects, the stream ends or the service shuts down.

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::{
    net::TcpListener,
    sync::{mpsc, Semaphore},
};
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    config::{Config, Symbol},
    pipeline::FramePipeline,
    pump::StreamPump,
    sink::ChannelSink,
    websocket::binance,
};

/// Shared state of the viewer endpoint.
#[derive(Clone, Debug)]
pub struct ViewerState {
    config: Arc<Config>,
    symbol: Symbol,
    // one permit, held by the running session
    viewer: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl ViewerState {
    pub fn new(config: Config, symbol: Symbol, shutdown: CancellationToken) -> Self {
        Self {
            config: Arc::new(config),
            symbol,
            viewer: Arc::new(Semaphore::new(1)),
            shutdown,
        }
    }
}

pub fn router(state: ViewerState) -> Router {
    Router::new().route("/", get(view)).with_state(state)
}

async fn view(State(state): State<ViewerState>) -> Response {
    let Ok(permit) = state.viewer.clone().try_acquire_owned() else {
        warn!("rejecting viewer, a session is already running");
        return (StatusCode::CONFLICT, "a viewer is already connected\n").into_response();
    };

    let url = match state.config.stream_url(&state.symbol) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "invalid stream url");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}\n")).into_response();
        }
    };
    let (reader, closer) = match binance::connect(&url).await {
        Ok(halves) => halves,
        Err(e) => {
            error!(error = %e, "failed to open exchange stream");
            return (StatusCode::BAD_GATEWAY, format!("{e}\n")).into_response();
        }
    };

    let (frame_tx, frame_rx) = mpsc::channel(1);
    let pump = StreamPump::new(
        reader,
        closer,
        ChannelSink::new(frame_tx),
        FramePipeline::from_config(&state.symbol, &state.config),
        state.config.close_timeout(),
    );
    let session = state.shutdown.child_token();
    tokio::spawn(async move {
        let _permit = permit;
        if let Err(e) = pump.run(session).await {
            warn!(error = %e, "viewer session ended");
        }
    });

    let body = Body::from_stream(ReceiverStream::new(frame_rx).map(Ok::<_, Infallible>));
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

/// Serve the viewer endpoint until the shutdown token of `state` is cancelled.
pub async fn run_http_server(state: ViewerState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "viewer endpoint listening");

    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("viewer endpoint failed")
}

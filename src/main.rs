use axum::routing::get;
use dotenvy::dotenv;
use latent_jokes::api;
use latent_jokes::config::Config;
use latent_jokes::joke::JokeRequester;
use latent_jokes::model::gemini::GeminiBackend;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, EnvFilter};


#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
dotenv().ok();
let cfg = <Config as clap::Parser>::parse();


// logs
let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
fmt().with_env_filter(filter).init();


// refuse to start without credentials
let gemini = cfg.gemini()?;
let addr = cfg.bind_addr()?;


let backend = GeminiBackend::new(&gemini)?;
tracing::info!(model = %gemini.model, endpoint = backend.endpoint(), "gemini backend ready");
let requester = JokeRequester::new(backend, cfg.params(), cfg.request_timeout());


let metrics = PrometheusBuilder::new().install_recorder()?;
let app = api::routes(requester).route(
"/metrics",
get(move || {
let metrics = metrics.clone();
async move { metrics.render() }
}),
);


tracing::info!(%addr, share = cfg.share, "listening");
axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
.with_graceful_shutdown(shutdown_signal())
.await?;
Ok(())
}


async fn shutdown_signal() {
if let Err(e) = tokio::signal::ctrl_c().await {
tracing::warn!(error = %e, "failed to listen for ctrl-c");
std::future::pending::<()>().await;
}
tracing::info!("shutting down");
}

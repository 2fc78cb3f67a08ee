use clap::Parser;
use lx_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use lx_ranker::Cli;

const APP_NAME: &str = "lx-ranker";

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    if std::env::var_os("LX_METRICS_PORT").is_some() {
        lx_metrics::init_metrics("LX_METRICS_PORT", 9464);
    }

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = lx_ranker::run(cli, &mut stdout).await {
        tracing::error!(error = %err, "lx-ranker failed");
        eprintln!("{APP_NAME} failed: {err}");
        std::process::exit(1);
    }
}

use startgate::config::DbConfig;
use startgate::db::PgConnector;
use startgate::server::HttpServer;
use startgate::startup::{self, FAILURE_EXIT_CODE, ProcessExit, StartupOutcome, TracingDiagnostics};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let connector = PgConnector::new(DbConfig::from_env());
    let server = HttpServer::default();
    let port_source = std::env::var("PORT").ok();

    let outcome = startup::start(port_source.as_deref(), &connector, &server, &TracingDiagnostics, &ProcessExit).await;

    // ProcessExit has already terminated on failure.
    let StartupOutcome::Serving { running, .. } = outcome else {
        return;
    };

    if let Err(e) = running.wait().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(FAILURE_EXIT_CODE);
    }
}

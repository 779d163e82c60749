//! Serve the reframe page.
//!
//! # Usage
//!
//! ```bash
//! # REFRAME_API_KEY may also come from a .env file in the working directory
//! REFRAME_API_KEY=sk-... reframe-web
//!
//! # Listen elsewhere, use another model, and include worked examples in every prompt
//! reframe-web --bind 0.0.0.0:8080 --model claude-sonnet-4-5 --few-shot
//! ```

use arrrg::CommandLine;
use tracing_subscriber::EnvFilter;

use reframe::web::{self, AppState};
use reframe::{Config, ServerArgs, ServerConfig, SessionStore, bootstrap, hosted_model};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the variable may already be in the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    reframe::register_biometrics(biometrics::Collector::new());

    let (args, _) = ServerArgs::from_command_line_relaxed("reframe-web [OPTIONS]");
    let server = ServerConfig::from(args);

    let reframer = match bootstrap(Config::from_env(), &server, hosted_model) {
        Ok(reframer) => reframer,
        Err(err) => {
            tracing::error!(error = %err, "cannot start");
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        model = %server.model,
        few_shot = server.few_shot,
        "reframer ready"
    );

    let sessions = SessionStore::with_idle_timeout(server.idle_timeout);
    web::serve(AppState::with_sessions(reframer, sessions), &server.bind).await?;
    Ok(())
}

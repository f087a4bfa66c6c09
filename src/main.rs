use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};

mod api;
mod config;
mod llm;
mod media;
mod pipeline;
mod prompts;
mod session;
mod state;
mod utils;

use config::Config;
use llm::{Dispatcher, OpenAiClient};
use pipeline::ShootPlanner;
use session::SessionStore;
use state::AppState;
use utils::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenv().ok();

    let config = Arc::new(Config::load()?);
    let _guards = init_logging(&config);
    for warning in &config.load_warnings {
        warn!("{warning}");
    }
    info!(
        "Starting product photo agent (model={}, fallback={}, session_ttl={}s)",
        config.openai_model,
        config.openai_fallback_model,
        config.session_ttl.as_secs()
    );

    let backend = Arc::new(OpenAiClient::new(&config)?);
    let dispatcher = Dispatcher::new(backend, &config);
    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    let planner = ShootPlanner::new(dispatcher, sessions);

    api::serve(AppState::new(config, planner)).await
}

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod server;
mod services;
mod utils;

use api::yahoo::YahooClient;
use config::DashboardConfig;
use server::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["price_dashboard=debug", "reqwest=warn", "hyper=warn"] {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting price dashboard...");
    info!("   ___  ___  ___  ___  ___ ");
    info!("  | _ \\| _ \\|_ _|/ __|| __|");
    info!("  |  _/|   / | || (__ | _| ");
    info!("  |_|  |_|_\\|___|\\___||___|");
    info!("  Price Dashboard v{}", env!("CARGO_PKG_VERSION"));
    info!("");

    let config = DashboardConfig::default();
    info!(
        "Seed symbol {}, upstream {}, lookback {} days",
        config.seed_symbol, config.upstream_base_url, config.lookback_days
    );

    let source = YahooClient::with_base_url(config.upstream_base_url.clone());
    let app_state = AppState {
        config: Arc::new(config),
        source: Arc::new(source),
    };

    if let Err(e) = server::serve(app_state).await {
        error!("Server error: {}", e);
    }
}

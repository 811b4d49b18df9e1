use std::sync::Arc;

use tenantgate_api::app::{self, AppState};
use tenantgate_api::config::AppConfig;
use tenantgate_infra::{InMemoryIdentityStore, sample_identities};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tenantgate_observability::init();

    let config = AppConfig::from_env()?;
    let rules = config.load_rules()?;

    let identities = if config.seed_sample_data {
        sample_identities()
    } else {
        Vec::new()
    };
    let store = InMemoryIdentityStore::with_identities(identities)?;
    tracing::info!(identities = store.len(), rules = rules.len(), "auth pipeline ready");

    let state = AppState::new(&config.token, Arc::new(store), rules);
    let app = app::build_app(state, app::routes::placeholder_router());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

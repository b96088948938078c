// Minecraft stack manager server binary.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manager_api::{router, ApiState};
use manager_config::ManagerConfig;
use portainer_client::{PortainerService, ReqwestTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manager_api=debug,portainer_client=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ManagerConfig::from_env()?;
    tracing::info!(portainer = %config.base_url, "starting Minecraft stack manager");

    let transport = Arc::new(ReqwestTransport::new());
    let service = Arc::new(PortainerService::new(&config, transport));
    let app = router(ApiState::new(service));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

use std::net::SocketAddr;

use common::utils::logging::init_logging;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    let raw = format!("{}:{}", server.host, server.port);
    raw.parse::<SocketAddr>()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Public entry: load config, build the codec and serve.
/// Any configuration or codec error aborts startup.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::load_and_validate()?;
    init_logging(&config.log);

    let addr = bind_addr(&config.server)?;
    let service = config.server.service_name.clone();
    let state = AppState::new(config)?;
    let app = routes::build_router(state);

    info!(%addr, %service, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let cfg =
            ServerConfig { host: "127.0.0.1".into(), port: 3000, service_name: "svc".into() };
        assert_eq!(bind_addr(&cfg).unwrap().port(), 3000);
    }

    #[test]
    fn bad_host_is_invalid_config() {
        let cfg =
            ServerConfig { host: "not a host".into(), port: 3000, service_name: "svc".into() };
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }
}

use std::sync::Arc;

use common::hashid::HashId;
use configs::AppConfig;

use crate::errors::StartupError;

/// Shared application state. The codec is built once here and every
/// handler reads the same instance.
#[derive(Clone)]
pub struct AppState {
    pub hashid: Arc<HashId>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        let hashid = HashId::from_config(&config.hashid)?;
        Ok(Self { hashid: Arc::new(hashid), config: Arc::new(config) })
    }
}

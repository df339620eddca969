use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StoreBackend};

use crate::memory::MemoryStore;
use crate::store::{AppointmentStore, DirectoryStore};
use crate::supabase::SupabaseStore;

/// Router state shared by every cell.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub directory: Arc<dyn DirectoryStore>,
    pub appointments: Arc<dyn AppointmentStore>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        match config.store_backend {
            StoreBackend::Memory => Self::in_memory(config),
            StoreBackend::Supabase => {
                info!("Using Supabase store at {}", config.supabase_url);
                let store = Arc::new(SupabaseStore::new(&config));
                Self {
                    directory: store.clone(),
                    appointments: store,
                    config,
                }
            }
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        info!("Using in-memory store");
        let store = Arc::new(MemoryStore::new());
        Self {
            directory: store.clone(),
            appointments: store,
            config,
        }
    }
}

pub mod joins;
pub mod memory;
pub mod state;
pub mod store;
pub mod supabase;

pub use memory::MemoryStore;
pub use state::AppState;
pub use store::{AppointmentStore, DirectoryStore, StoreError, StoreResult};
pub use supabase::SupabaseStore;

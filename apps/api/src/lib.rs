pub mod router;

pub use router::{cors_layer, create_router};

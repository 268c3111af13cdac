pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod customers;
    pub mod health;
}

pub use router::{cors_layer, create_router, ApiDoc};
pub use types::{ApiResponse, AppState};

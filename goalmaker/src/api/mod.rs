mod extractors;
mod legacy;
mod routes;
mod server;
mod state;
pub mod v1;

pub use extractors::AppJson;
pub use routes::create_router;
pub use server::serve;
pub use state::AppState;

pub mod goals;
pub(crate) mod health;

pub use health::health_check;

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod server;
pub mod storage;
pub mod telemetry;

pub use model::{Pokemon, PokemonUpdate};
pub use server::AppState;
pub use storage::{PokemonStore, StorageError, StorageProvider};

pub mod traits;
pub mod evolution;
pub mod oracle;
pub mod store;
pub mod manager;

pub use manager::AppConfig;
pub use evolution::{EvolutionConfig, SelectionFidelity};
pub use oracle::OracleConfig;
pub use store::StoreConfig;

pub mod store;

pub use store::{DescriptionStore, COMPETITORS_KEY};

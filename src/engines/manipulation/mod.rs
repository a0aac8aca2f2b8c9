pub mod dpma;
pub mod paraphrase;

pub use dpma::{best_description, best_name};
pub use paraphrase::{paraphrase, ParaphraseParams};

pub mod types;
pub mod walk;

pub use types::Document;

// Re-export modules
pub mod archive;
pub mod batch;
pub mod config;
pub mod docs;
pub mod fetch;
pub mod filter;
pub mod listing;
pub mod naming;
pub mod retry;

// Re-export commonly used types for convenience
pub use batch::{Batch, Summary};
pub use docs::DocRef;
pub use naming::{CertLevel, MaterialType, PaperLevel};

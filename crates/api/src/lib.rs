pub mod ast;
pub mod lifecycle;
pub mod models;

// Re-export commonly used types
pub use lifecycle::ProjectEvent;
pub use models::*;

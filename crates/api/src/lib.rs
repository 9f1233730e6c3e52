pub mod build;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use build::{BundleEngine, CompileRequest};
pub use error::{BuildError, CssModuleError, ResolveError};
pub use models::*;

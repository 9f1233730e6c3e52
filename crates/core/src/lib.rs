pub mod builder;
pub mod config;
pub mod css_module;
pub mod error;
pub mod facade;
pub mod import_map;
pub mod importer;
pub mod logging;
pub mod resolver;
pub mod roots;
pub mod watch;

pub use builder::{BuildOutput, Builder, CommandEngine, EnvForwarding};
pub use config::Config;
pub use css_module::{CssModuleTransformer, css_module_digest};
pub use error::{ProsceniumError, Result};
pub use facade::{Pipeline, RenderScope};
pub use import_map::ImportMap;
pub use importer::Importer;
pub use logging::{LogSettings, init_logging};
pub use resolver::{Resolution, Resolver};
pub use roots::RootSet;
pub use watch::{CacheWatcher, Invalidate};

pub use proscenium_api as api;

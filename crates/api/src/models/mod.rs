pub mod asset;
pub mod class_name;
pub mod fingerprint;
pub mod path;
pub mod specifier;

pub use asset::*;
pub use class_name::*;
pub use fingerprint::*;
pub use path::*;
pub use specifier::*;

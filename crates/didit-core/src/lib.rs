pub mod color;
pub mod config;
pub mod error;
pub mod increment;
pub mod keys;
pub mod locale;
pub mod options;
pub mod persistence;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod store;

pub use color::*;
pub use config::*;
pub use error::*;
pub use increment::*;
pub use options::*;
pub use persistence::*;
pub use registry::*;
pub use resolver::*;
pub use selection::*;
pub use store::*;

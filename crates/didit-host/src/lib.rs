pub mod adapters;
pub mod contracts;
pub mod executor;
pub mod reload;

pub use adapters::*;
pub use contracts::*;
pub use executor::*;
pub use reload::*;

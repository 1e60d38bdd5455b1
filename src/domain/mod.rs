pub mod forecast;
pub mod metering;
pub mod types;

pub use forecast::*;
pub use metering::*;
pub use types::*;

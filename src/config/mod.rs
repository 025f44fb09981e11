//! Configuration: environment-driven settings plus fixed constants
//! (work factors, deadlines, storage layout).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;

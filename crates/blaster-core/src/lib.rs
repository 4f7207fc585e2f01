pub mod constants;
pub mod error;
pub mod event;
pub mod math;
pub mod params;
pub mod types;

pub use constants::*;
pub use error::{AntisnipeViolation, BlasterError};
pub use event::{Event, LogEntry};
pub use params::{CoinConfig, LaunchParams};
pub use types::*;

pub mod errors;
pub mod locks;
pub mod shutdown;
pub mod time;

pub use errors::*;
pub use locks::{BookingLocks, KeyGuard};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
pub use time::{Clock, FixedClock, SharedClock, SystemClock};

//! Reservation availability and lifecycle engine
//!
//! - `availability` - occupied-date derivation from booking summaries
//! - `capacity` - venue type / capacity rule check
//! - `validator` - requested dates vs. occupancy
//! - `lifecycle` - create / cancel / complete
//! - `sync` - mirror changes for venue, event and user records
//! - `cascade` - payment handling on cancellation

pub mod availability;
pub mod capacity;
pub mod cascade;
pub mod lifecycle;
pub mod sync;
pub mod validator;

pub use availability::occupied_dates;
pub use capacity::validate_capacity;
pub use cascade::{plan_cascade, CancellationPolicy, CascadeOutcome};
pub use lifecycle::{ReservationRequest, ReservationService};
pub use sync::{mirror_changes, verify_mirrors};
pub use validator::{normalize_dates, BookingValidator};

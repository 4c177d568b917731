//! cp-core: shared foundation for the cart-pole workspace.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + validation and angle/saturation helpers)
//! - timing (wall-clock timers for tick cost reporting)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;

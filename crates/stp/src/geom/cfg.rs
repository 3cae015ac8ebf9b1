//! Tolerance defaults for planar line geometry.
//!
//! Policy
//! - Fixed constants, same as the rest of the crate: lengths are in map units
//!   (feet or metres), so absolute epsilons stay far below any real spacing.

/// Absolute length below which a polyline part is treated as empty.
pub const LEN_EPS: f64 = 1e-9;
/// Relative slack used when deciding whether a chainage still lies on a line.
pub const REL_LEN_EPS: f64 = 1e-9;

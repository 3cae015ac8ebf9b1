//! Run parameters and their validation.

use crate::error::ConfigurationError;

/// Placement parameters, in map units.
///
/// Invariants (checked by `validate`):
/// - `spacing`, `separation_radius`, `buffer_radius` finite and `> 0`.
/// - `buffer_radius < separation_radius`.
/// - `min_fragment_length` finite and `>= 0`.
/// - `max_iterations >= 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementParams {
    pub spacing: f64,
    pub separation_radius: f64,
    pub buffer_radius: f64,
    pub min_fragment_length: f64,
    pub max_iterations: u32,
}

impl PlacementParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 3;
    pub const DEFAULT_MIN_FRAGMENT_LENGTH: f64 = 3.0;
    /// Gap between the buffer and the separation radius.
    pub const BUFFER_MARGIN: f64 = 0.01;

    /// Defaults for everything but the two distances.
    ///
    /// `buffer_radius` is `separation_radius - BUFFER_MARGIN`, but never less
    /// than half the separation radius.
    pub fn new(spacing: f64, separation_radius: f64) -> Self {
        let buffer_radius =
            (separation_radius - Self::BUFFER_MARGIN).max(0.5 * separation_radius);
        Self {
            spacing,
            separation_radius,
            buffer_radius,
            min_fragment_length: Self::DEFAULT_MIN_FRAGMENT_LENGTH,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    #[inline]
    pub fn with_buffer_radius(mut self, buffer_radius: f64) -> Self {
        self.buffer_radius = buffer_radius;
        self
    }

    #[inline]
    pub fn with_min_fragment_length(mut self, min_fragment_length: f64) -> Self {
        self.min_fragment_length = min_fragment_length;
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("spacing", self.spacing),
            ("separation_radius", self.separation_radius),
            ("buffer_radius", self.buffer_radius),
            ("min_fragment_length", self.min_fragment_length),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { name, value });
            }
        }
        for (name, value) in [
            ("spacing", self.spacing),
            ("separation_radius", self.separation_radius),
            ("buffer_radius", self.buffer_radius),
        ] {
            if value <= 0.0 {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        if self.min_fragment_length < 0.0 {
            return Err(ConfigurationError::NegativeMinLength(
                self.min_fragment_length,
            ));
        }
        if self.buffer_radius >= self.separation_radius {
            return Err(ConfigurationError::BufferNotBelowSeparation {
                buffer: self.buffer_radius,
                separation: self.separation_radius,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigurationError::ZeroIterations);
        }
        Ok(())
    }
}

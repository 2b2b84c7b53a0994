// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional and extent constraints on a [`Domain`].
//!
//! All functions here are pure: identical inputs always produce identical
//! outputs, and none of them touch viewport state. [`apply_all`] is the only
//! entry point the viewport store uses; it applies the extent bound before the
//! position bound, because an extent-driven expansion performed after
//! positioning could push the domain back out of bounds.

use crate::error::ConfigError;
use crate::scale::Domain;

/// A pair of optional limits. `None` leaves that side unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Bound {
    /// Lower limit.
    pub min: Option<f64>,
    /// Upper limit.
    pub max: Option<f64>,
}

impl Bound {
    /// A bound with neither side limited.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    /// Creates a bound from optional limits.
    #[must_use]
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Creates a bound limited on both sides.
    #[must_use]
    pub const fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// Returns `true` if neither side is limited.
    #[must_use]
    pub fn is_unbounded(self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn is_finite(self) -> bool {
        self.min.is_none_or(f64::is_finite) && self.max.is_none_or(f64::is_finite)
    }

    fn is_ordered(self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// Position and extent bounds for both axes of a viewport.
///
/// Built fluently and validated once with [`Constraints::validate`]; the view
/// rejects malformed constraints instead of ignoring them.
///
/// ```rust
/// use understory_plot_view::{Bound, Constraints};
///
/// let constraints = Constraints::new()
///     .with_position_x(Bound::between(0.0, 20_000.0))
///     .with_extent_x(Bound::new(Some(10.0), Some(20_000.0)));
/// assert!(constraints.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Constraints {
    /// Where the X domain may lie.
    pub position_x: Bound,
    /// Where the Y domain may lie.
    pub position_y: Bound,
    /// How narrow or wide the X domain may be.
    pub extent_x: Bound,
    /// How narrow or wide the Y domain may be.
    pub extent_y: Bound,
}

impl Constraints {
    /// Creates an unconstrained set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position_x: Bound::UNBOUNDED,
            position_y: Bound::UNBOUNDED,
            extent_x: Bound::UNBOUNDED,
            extent_y: Bound::UNBOUNDED,
        }
    }

    /// Sets the X position bound.
    #[must_use]
    pub const fn with_position_x(mut self, bound: Bound) -> Self {
        self.position_x = bound;
        self
    }

    /// Sets the Y position bound.
    #[must_use]
    pub const fn with_position_y(mut self, bound: Bound) -> Self {
        self.position_y = bound;
        self
    }

    /// Sets the X extent bound.
    #[must_use]
    pub const fn with_extent_x(mut self, bound: Bound) -> Self {
        self.extent_x = bound;
        self
    }

    /// Sets the Y extent bound.
    #[must_use]
    pub const fn with_extent_y(mut self, bound: Bound) -> Self {
        self.extent_y = bound;
        self
    }

    /// Checks every bound for ordering and finiteness.
    ///
    /// Extent maxima must also be positive, since no valid domain could satisfy
    /// them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for bound in [self.position_x, self.position_y] {
            if !bound.is_finite() || !bound.is_ordered() {
                return Err(ConfigError::InvalidPositionBound {
                    min: bound.min,
                    max: bound.max,
                });
            }
        }
        for bound in [self.extent_x, self.extent_y] {
            let positive_max = bound.max.is_none_or(|max| max > 0.0);
            if !bound.is_finite() || !bound.is_ordered() || !positive_max {
                return Err(ConfigError::InvalidExtentBound {
                    min: bound.min,
                    max: bound.max,
                });
            }
        }
        Ok(())
    }
}

/// Shifts `domain` so it fits inside `bound`, never changing its width.
///
/// When the domain is wider than the bound it cannot be contained. If it
/// already covers the bound it is left alone; otherwise it is shifted so the
/// violated edge touches the bound, which makes it cover the bound.
#[must_use]
pub fn apply_position(domain: Domain, bound: Bound) -> Domain {
    let width = domain.width();
    if let (Some(min), Some(max)) = (bound.min, bound.max) {
        if width >= max - min && domain.min <= min && domain.max >= max {
            return domain;
        }
    }
    let below = bound.min.filter(|&min| domain.min < min);
    let above = bound.max.filter(|&max| domain.max > max);
    match (below, above) {
        (Some(min), None) => Domain::new(min, min + width),
        (None, Some(max)) => Domain::new(max - width, max),
        _ => domain,
    }
}

/// Resizes `domain` so its width lies inside the extent `bound`.
///
/// The point at `anchor_ratio` of the domain keeps its fractional position;
/// `0.5` resizes about the center.
#[must_use]
pub fn apply_extent(domain: Domain, bound: Bound, anchor_ratio: f64) -> Domain {
    let width = domain.width();
    if let Some(min) = bound.min.filter(|&min| width < min) {
        return domain.resized_about(anchor_ratio, min);
    }
    if let Some(max) = bound.max.filter(|&max| width > max) {
        return domain.resized_about(anchor_ratio, max);
    }
    domain
}

/// Applies the extent bound and then the position bound.
#[must_use]
pub fn apply_all(domain: Domain, extent: Bound, position: Bound, anchor_ratio: f64) -> Domain {
    let resized = apply_extent(domain, extent, anchor_ratio);
    let constrained = apply_position(resized, position);
    if constrained != domain {
        tracing::trace!(
            from_min = domain.min,
            from_max = domain.max,
            to_min = constrained.min,
            to_max = constrained.max,
            "domain constrained"
        );
    }
    constrained
}

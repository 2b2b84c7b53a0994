// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-space intervals and the scales that map them onto pixel spans.
//!
//! Scales are never stored by the view: they are rebuilt from a [`Domain`]
//! and a pixel range whenever they are requested, so they are cheap value
//! types that can be created every frame.

use core::ops::Range;

/// Smallest span a scale divides by.
///
/// Degenerate domains or ranges (`min == max`) are treated as this wide so that
/// mapping never divides by zero.
pub const MIN_SPAN: f64 = f64::EPSILON;

/// A data-space interval `[min, max]` for one axis.
///
/// `Domain` itself does not enforce `min < max`; [`crate::Viewport`] does. The
/// constraint functions operate on plain domains and are free to produce
/// intermediate values that are validated before they are committed.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Domain {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Domain {
    /// Creates a domain from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `max - min`.
    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    /// Returns the midpoint of the domain.
    #[must_use]
    pub fn center(self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Returns `true` if both bounds and the width are finite and `min < max`.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min < self.max
            && self.width().is_finite()
    }

    /// Returns the domain moved by `delta` without changing its width.
    #[must_use]
    pub fn shifted(self, delta: f64) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }

    /// Returns the fractional position of `value` inside the domain.
    ///
    /// `0.0` is `min`, `1.0` is `max`. Values outside the domain produce ratios
    /// outside `[0, 1]`.
    #[must_use]
    pub fn ratio_of(self, value: f64) -> f64 {
        (value - self.min) / guarded(self.width())
    }

    /// Returns a domain of `width` that keeps the point at `ratio` of this
    /// domain at the same fractional position.
    #[must_use]
    pub fn resized_about(self, ratio: f64, width: f64) -> Self {
        let anchor = self.min + self.width() * ratio;
        let min = anchor - width * ratio;
        Self::new(min, min + width)
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Interpolates each bound independently towards `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.min + (other.min - self.min) * t,
            self.max + (other.max - self.max) * t,
        )
    }
}

impl From<Range<f64>> for Domain {
    fn from(range: Range<f64>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Domain> for Range<f64> {
    fn from(domain: Domain) -> Self {
        domain.min..domain.max
    }
}

/// A mapping between a data-space domain and a pixel-space range.
///
/// Implementations must be pure: `forward` and `inverse` are called per mark
/// per frame by the rendering layer.
pub trait Scale {
    /// The data-space interval this scale maps from.
    fn domain(&self) -> Domain;

    /// The pixel-space interval this scale maps onto.
    ///
    /// The range may be descending (for example `height..0` for a Y axis).
    fn range(&self) -> Range<f64>;

    /// Maps a data-space value to pixels.
    fn forward(&self, value: f64) -> f64;

    /// Maps a pixel position back to data space.
    fn inverse(&self, pixel: f64) -> f64;

    /// Signed data units covered by one pixel step along the range.
    ///
    /// Negative when the range is descending.
    fn data_per_pixel(&self) -> f64 {
        let range = self.range();
        self.domain().width() / guarded(range.end - range.start)
    }
}

/// Linear interpolation between a domain and a range.
///
/// ```rust
/// use understory_plot_view::{Domain, LinearScale, Scale};
///
/// let scale = LinearScale::new(Domain::new(0.0, 100.0), 0.0..500.0);
/// assert_eq!(scale.forward(50.0), 250.0);
/// assert_eq!(scale.inverse(250.0), 50.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    domain: Domain,
    range: Range<f64>,
}

impl LinearScale {
    /// Creates a linear scale from `domain` onto `range`.
    #[must_use]
    pub fn new(domain: Domain, range: Range<f64>) -> Self {
        Self { domain, range }
    }
}

impl Scale for LinearScale {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }

    fn forward(&self, value: f64) -> f64 {
        let t = (value - self.domain.min) / guarded(self.domain.width());
        self.range.start + (self.range.end - self.range.start) * t
    }

    fn inverse(&self, pixel: f64) -> f64 {
        let t = (pixel - self.range.start) / guarded(self.range.end - self.range.start);
        self.domain.min + self.domain.width() * t
    }
}

/// Replaces a (near-)zero span with [`MIN_SPAN`], keeping its sign.
fn guarded(span: f64) -> f64 {
    if span.abs() < MIN_SPAN {
        if span.is_sign_negative() {
            -MIN_SPAN
        } else {
            MIN_SPAN
        }
    } else {
        span
    }
}

#[cfg(test)]
mod tests {
    use super::{Domain, LinearScale, MIN_SPAN, Scale};

    #[test]
    fn forward_and_inverse_match_worked_example() {
        let scale = LinearScale::new(Domain::new(0.0, 100.0), 0.0..500.0);
        assert!((scale.forward(50.0) - 250.0).abs() < 1e-12);
        assert!((scale.inverse(250.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_of_forward_roundtrips_inside_domain() {
        let scale = LinearScale::new(Domain::new(-37.5, 812.25), 600.0..0.0);
        for i in 0..=20 {
            let v = -37.5 + f64::from(i) * (812.25 + 37.5) / 20.0;
            let back = scale.inverse(scale.forward(v));
            assert!((back - v).abs() < 1e-9, "{v} came back as {back}");
        }
    }

    #[test]
    fn descending_range_flips_direction() {
        let scale = LinearScale::new(Domain::new(0.0, 10.0), 200.0..0.0);
        assert_eq!(scale.forward(0.0), 200.0);
        assert_eq!(scale.forward(10.0), 0.0);
        assert!(scale.data_per_pixel() < 0.0);
    }

    #[test]
    fn degenerate_domain_does_not_divide_by_zero() {
        let scale = LinearScale::new(Domain::new(0.0, 0.0), 0.0..100.0);
        let px = scale.forward(MIN_SPAN);
        assert!(px.is_finite());
        assert!((px - 100.0).abs() < 1e-9);
        assert!(scale.inverse(50.0).is_finite());
    }

    #[test]
    fn degenerate_range_inverse_stays_finite() {
        let scale = LinearScale::new(Domain::new(0.0, 1.0), 40.0..40.0);
        assert!(scale.inverse(41.0).is_finite());
    }

    #[test]
    fn resized_about_preserves_anchor_ratio() {
        let d = Domain::new(0.0, 100.0);
        let r = d.resized_about(0.25, 40.0);
        assert!((r.width() - 40.0).abs() < 1e-12);
        // Anchor at 25 stays at 25% of the new domain.
        assert!((r.ratio_of(25.0) - 0.25).abs() < 1e-12);
        assert!((r.min - 15.0).abs() < 1e-12);
    }

    #[test]
    fn domain_helpers() {
        let d = Domain::from(2.0..6.0);
        assert_eq!(d.width(), 4.0);
        assert_eq!(d.center(), 4.0);
        assert!(d.is_valid());
        assert!(!Domain::new(1.0, 1.0).is_valid());
        assert!(!Domain::new(f64::NAN, 1.0).is_valid());
        // Finite bounds whose width overflows.
        assert!(!Domain::new(-1e308, 1e308).is_valid());
        assert!(Domain::new(-8.5e307, 8.5e307).is_valid());
        assert_eq!(d.shifted(-2.0), Domain::new(0.0, 4.0));
        assert_eq!(d.lerp(Domain::new(4.0, 10.0), 0.5), Domain::new(3.0, 8.0));
        assert!(d.contains(6.0));
        assert!(!d.contains(6.5));
    }
}

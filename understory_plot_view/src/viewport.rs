// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The authoritative viewport and the store that mutates it.

use core::fmt;
use core::ops::Range;
use core::str::FromStr;

use kurbo::{Point, Rect, Size};

use crate::constraints::{Constraints, apply_all};
use crate::error::{ConfigError, InputError, ParseError};
use crate::scale::Domain;

/// One dimension of the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis; pixels grow to the right.
    X,
    /// Vertical axis; pixels grow downward while data grows upward.
    Y,
}

impl Axis {
    /// Returns the pixel span this axis maps onto for a surface of `size`.
    ///
    /// X maps onto `0..width`; Y maps onto `height..0`.
    #[must_use]
    pub fn pixel_range(self, size: Size) -> Range<f64> {
        match self {
            Self::X => 0.0..size.width,
            Self::Y => size.height..0.0,
        }
    }
}

impl FromStr for Axis {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            _ => Err(ParseError::Axis),
        }
    }
}

/// Which axes an operation or gesture surface affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AxisMask {
    /// Only the X axis.
    X,
    /// Only the Y axis.
    Y,
    /// Both axes.
    #[default]
    Both,
}

impl AxisMask {
    /// Returns `true` if `axis` is part of this mask.
    #[must_use]
    pub fn includes(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Both, _) | (Self::X, Axis::X) | (Self::Y, Axis::Y)
        )
    }
}

impl From<Axis> for AxisMask {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X,
            Axis::Y => Self::Y,
        }
    }
}

impl FromStr for AxisMask {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "both" => Ok(Self::Both),
            _ => Err(ParseError::Axis),
        }
    }
}

/// The visible data-space window: one [`Domain`] per axis.
///
/// Both domains are finite with `min < max` and a finite width; every
/// constructor checks this.
#[derive(Clone, Copy, PartialEq)]
pub struct Viewport {
    x: Domain,
    y: Domain,
}

impl Viewport {
    /// Creates a viewport, rejecting empty, inverted, or non-finite domains.
    pub fn new(x: Domain, y: Domain) -> Result<Self, ConfigError> {
        for d in [x, y] {
            if !d.is_valid() {
                return Err(ConfigError::domain(d.min, d.max));
            }
        }
        Ok(Self { x, y })
    }

    /// Creates a viewport from a data-space rectangle.
    ///
    /// The rectangle's `x0..x1` becomes the X domain and `y0..y1` the Y domain.
    pub fn from_rect(rect: Rect) -> Result<Self, ConfigError> {
        Self::new(Domain::new(rect.x0, rect.x1), Domain::new(rect.y0, rect.y1))
    }

    /// Returns the X domain.
    #[must_use]
    pub fn x(&self) -> Domain {
        self.x
    }

    /// Returns the Y domain.
    #[must_use]
    pub fn y(&self) -> Domain {
        self.y
    }

    /// Returns the domain for `axis`.
    #[must_use]
    pub fn domain(&self, axis: Axis) -> Domain {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Returns the data-space center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x.center(), self.y.center())
    }

    /// Returns `true` if the data-space `point` is visible.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }

    /// Returns the viewport as a data-space rectangle.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x.min, self.y.min, self.x.max, self.y.max)
    }

    /// Interpolates both domains towards `other`.
    ///
    /// For `t` in `[0, 1]` the result is a weighted mean of two valid
    /// viewports and so is valid itself.
    pub(crate) fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x.lerp(other.x, t),
            y: self.y.lerp(other.y, t),
        }
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport {{ x: [{}, {}], y: [{}, {}] }}",
            self.x.min, self.x.max, self.y.min, self.y.max
        )
    }
}

/// Owns the authoritative viewport and keeps it constrained.
///
/// Every mutation goes through the constraint functions and is validated before
/// it is committed; a result that is degenerate or not finite is dropped and the
/// previous viewport is kept. [`ViewportStore::revision`] increments only when
/// the viewport actually changes.
#[derive(Clone, Debug)]
pub struct ViewportStore {
    full: Viewport,
    current: Viewport,
    constraints: Constraints,
    revision: u64,
}

impl ViewportStore {
    /// Creates a store over the dataset extent `full`.
    ///
    /// The initial viewport defaults to `full` and is constrained immediately.
    pub fn new(
        full: Viewport,
        initial: Option<Viewport>,
        constraints: Constraints,
    ) -> Result<Self, ConfigError> {
        constraints.validate()?;
        let mut store = Self {
            full,
            current: initial.unwrap_or(full),
            constraints,
            revision: 0,
        };
        let start = store.current;
        store.commit(start.x, start.y, 0.5, 0.5);
        store.revision = 0;
        Ok(store)
    }

    /// Returns a snapshot of the current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.current
    }

    /// Returns the dataset extent the store was created with.
    #[must_use]
    pub fn full_extent(&self) -> Viewport {
        self.full
    }

    /// Returns the active constraints.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    /// Replaces all constraints and re-constrains the current viewport.
    pub fn set_constraints(&mut self, constraints: Constraints) -> Result<(), ConfigError> {
        constraints.validate()?;
        self.constraints = constraints;
        let current = self.current;
        self.commit(current.x, current.y, 0.5, 0.5);
        Ok(())
    }

    /// Number of committed changes since construction.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shifts both domains by a data-space delta.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> Result<(), InputError> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(InputError::NonFinite);
        }
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }
        let current = self.current;
        self.commit(current.x.shifted(dx), current.y.shifted(dy), 0.5, 0.5);
        Ok(())
    }

    /// Resizes the domains on `axes` by `1 / factor` around `center`.
    ///
    /// `center` defaults to the viewport midpoint. Its fractional position in
    /// each resized domain is preserved, including through any extent clamp.
    /// `factor > 1` zooms in and `0 < factor < 1` zooms out.
    pub fn zoom(
        &mut self,
        factor: f64,
        center: Option<Point>,
        axes: AxisMask,
    ) -> Result<(), InputError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(InputError::InvalidZoomFactor(factor));
        }
        let current = self.current;
        let center = center.unwrap_or_else(|| current.center());
        if !center.is_finite() {
            return Err(InputError::NonFinite);
        }

        let resize = |axis: Axis, c: f64| -> (Domain, f64) {
            let domain = current.domain(axis);
            if !axes.includes(axis) {
                return (domain, 0.5);
            }
            let ratio = domain.ratio_of(c);
            (domain.resized_about(ratio, domain.width() / factor), ratio)
        };
        let (x, ratio_x) = resize(Axis::X, center.x);
        let (y, ratio_y) = resize(Axis::Y, center.y);
        self.commit(x, y, ratio_x, ratio_y);
        Ok(())
    }

    /// Sets the viewport to `target`, or to the dataset extent, then constrains it.
    pub fn reset(&mut self, target: Option<Viewport>) {
        let target = target.unwrap_or(self.full);
        self.commit(target.x, target.y, 0.5, 0.5);
    }

    /// Resets to the full dataset extent.
    pub fn zoom_to_extent(&mut self) {
        self.reset(None);
    }

    /// Constrains the candidate domains and commits them if they are valid.
    ///
    /// Returns `true` if the viewport changed.
    pub(crate) fn commit(&mut self, x: Domain, y: Domain, anchor_x: f64, anchor_y: f64) -> bool {
        let c = &self.constraints;
        let x = apply_all(x, c.extent_x, c.position_x, anchor_x);
        let y = apply_all(y, c.extent_y, c.position_y, anchor_y);
        let Ok(next) = Viewport::new(x, y) else {
            tracing::debug!(?x, ?y, "discarding degenerate viewport");
            return false;
        };
        if next == self.current {
            return false;
        }
        self.current = next;
        self.revision += 1;
        tracing::trace!(viewport = ?next, revision = self.revision, "viewport committed");
        true
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::{Axis, AxisMask, Viewport, ViewportStore};
    use crate::constraints::{Bound, Constraints};
    use crate::error::{ConfigError, InputError, ParseError};
    use crate::scale::Domain;

    fn vp(x0: f64, x1: f64, y0: f64, y1: f64) -> Viewport {
        Viewport::new(Domain::new(x0, x1), Domain::new(y0, y1)).unwrap()
    }

    fn assert_domain_near(d: Domain, min: f64, max: f64) {
        assert!(
            (d.min - min).abs() < 1e-2 && (d.max - max).abs() < 1e-2,
            "expected [{min}, {max}], got {d:?}"
        );
    }

    #[test]
    fn viewport_rejects_invalid_domains() {
        assert_eq!(
            Viewport::new(Domain::new(1.0, 1.0), Domain::new(0.0, 1.0)),
            Err(ConfigError::InvalidDomain { min: 1.0, max: 1.0 })
        );
        assert!(Viewport::new(Domain::new(0.0, 1.0), Domain::new(2.0, f64::INFINITY)).is_err());
        assert!(Viewport::from_rect(Rect::new(0.0, 0.0, 10.0, 5.0)).is_ok());
    }

    #[test]
    fn zoom_without_center_uses_midpoint() {
        let mut store = ViewportStore::new(vp(0.0, 1_000.0, 0.0, 1_000.0), None, Constraints::new())
            .unwrap();
        store.zoom(1.1, None, AxisMask::Both).unwrap();
        let v = store.viewport();
        assert_domain_near(v.y(), 45.45, 954.55);
        assert!((v.y().width() - 909.09).abs() < 1e-2);
    }

    #[test]
    fn zoom_restricted_to_one_axis_leaves_the_other() {
        let mut store =
            ViewportStore::new(vp(0.0, 100.0, 0.0, 50.0), None, Constraints::new()).unwrap();
        store
            .zoom(2.0, Some(Point::new(10.0, 10.0)), AxisMask::X)
            .unwrap();
        let v = store.viewport();
        assert_eq!(v.y(), Domain::new(0.0, 50.0));
        assert!((v.x().width() - 50.0).abs() < 1e-12);
        assert!((v.x().ratio_of(10.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zoom_out_clamped_by_extent_keeps_focus_ratio() {
        let constraints = Constraints::new().with_extent_x(Bound::new(None, Some(500.0)));
        let mut store =
            ViewportStore::new(vp(0.0, 400.0, 0.0, 10.0), None, constraints).unwrap();
        store
            .zoom(0.4, Some(Point::new(100.0, 5.0)), AxisMask::X)
            .unwrap();
        let x = store.viewport().x();
        assert_domain_near(x, -25.0, 475.0);
        assert!((x.ratio_of(100.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn zoom_rejects_bad_factors() {
        let mut store =
            ViewportStore::new(vp(0.0, 1.0, 0.0, 1.0), None, Constraints::new()).unwrap();
        assert_eq!(
            store.zoom(0.0, None, AxisMask::Both),
            Err(InputError::InvalidZoomFactor(0.0))
        );
        assert!(store.zoom(f64::NAN, None, AxisMask::Both).is_err());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn degenerate_results_are_discarded() {
        let mut store =
            ViewportStore::new(vp(0.0, 1.0, 0.0, 1.0), None, Constraints::new()).unwrap();
        store.zoom(1e308, None, AxisMask::Both).unwrap();
        assert_eq!(store.viewport(), vp(0.0, 1.0, 0.0, 1.0));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn move_respects_position_bounds() {
        let constraints = Constraints::new()
            .with_position_x(Bound::between(0.0, 100.0))
            .with_position_y(Bound::between(0.0, 100.0));
        let mut store =
            ViewportStore::new(vp(0.0, 100.0, 0.0, 100.0), Some(vp(10.0, 30.0, 10.0, 30.0)), constraints)
                .unwrap();
        store.move_by(-50.0, 500.0).unwrap();
        assert_eq!(store.viewport(), vp(0.0, 20.0, 80.0, 100.0));
        assert_eq!(store.move_by(f64::INFINITY, 0.0), Err(InputError::NonFinite));
    }

    #[test]
    fn reset_is_idempotent_and_counts_revisions_once() {
        let constraints = Constraints::new().with_extent_y(Bound::new(None, Some(40.0)));
        let mut store =
            ViewportStore::new(vp(0.0, 100.0, 0.0, 100.0), None, constraints).unwrap();
        store.move_by(5.0, 5.0).unwrap();
        store.reset(None);
        let first = store.viewport();
        let revision = store.revision();
        store.reset(None);
        assert_eq!(store.viewport(), first);
        assert_eq!(store.revision(), revision);
        assert_domain_near(first.y(), 30.0, 70.0);
    }

    #[test]
    fn set_constraints_validates_and_reapplies() {
        let mut store =
            ViewportStore::new(vp(0.0, 100.0, 0.0, 100.0), None, Constraints::new()).unwrap();
        let bad = Constraints::new().with_extent_x(Bound::between(5.0, 1.0));
        assert!(store.set_constraints(bad).is_err());
        assert_eq!(store.constraints(), Constraints::new());

        store
            .set_constraints(Constraints::new().with_extent_x(Bound::new(None, Some(10.0))))
            .unwrap();
        assert_domain_near(store.viewport().x(), 45.0, 55.0);
    }

    #[test]
    fn axis_parsing_and_pixel_ranges() {
        assert_eq!("x".parse::<Axis>(), Ok(Axis::X));
        assert_eq!("both".parse::<Axis>(), Err(ParseError::Axis));
        assert_eq!("both".parse::<AxisMask>(), Ok(AxisMask::Both));
        assert_eq!("z".parse::<AxisMask>(), Err(ParseError::Axis));

        let size = Size::new(640.0, 480.0);
        assert_eq!(Axis::X.pixel_range(size), 0.0..640.0);
        assert_eq!(Axis::Y.pixel_range(size), 480.0..0.0);
        assert!(AxisMask::Both.includes(Axis::Y));
        assert!(!AxisMask::X.includes(Axis::Y));
    }

    #[test]
    fn viewport_geometry_helpers() {
        let v = vp(0.0, 10.0, -5.0, 5.0);
        assert_eq!(v.center(), Point::new(5.0, 0.0));
        assert!(v.contains(Point::new(10.0, -5.0)));
        assert!(!v.contains(Point::new(10.5, 0.0)));
        assert_eq!(v.to_rect(), Rect::new(0.0, -5.0, 10.0, 5.0));
        assert_eq!(v.domain(Axis::Y), Domain::new(-5.0, 5.0));
    }
}

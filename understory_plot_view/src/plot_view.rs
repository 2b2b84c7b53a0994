// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Point, Rect, Size, Vec2};

use crate::animation::{AnimationSession, Animator, FrameTicket};
use crate::constraints::Constraints;
use crate::error::{ConfigError, InputError};
use crate::gesture::{
    DragBinding, DragConfig, DragSession, GestureController, Sensitivity, WheelBinding,
    WheelConfig, WheelOutcome, data_at,
};
use crate::scale::{Domain, LinearScale, Scale};
use crate::viewport::{Axis, AxisMask, Viewport, ViewportStore};

/// Animation duration used when none is configured.
pub const DEFAULT_ANIMATION_MS: u64 = 300;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Optional construction parameters for a [`PlotView`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotViewOptions {
    /// Viewport to start on; defaults to the dataset extent.
    pub initial_viewport: Option<Viewport>,
    /// Position and extent bounds.
    pub constraints: Constraints,
    /// Duration of animated transitions.
    pub animation_duration_ms: u64,
}

impl Default for PlotViewOptions {
    fn default() -> Self {
        Self {
            initial_viewport: None,
            constraints: Constraints::new(),
            animation_duration_ms: DEFAULT_ANIMATION_MS,
        }
    }
}

/// Viewport engine for one plot.
///
/// `PlotView` ties together the [`ViewportStore`] (authoritative state),
/// the [`GestureController`] (drag and wheel surfaces), and the [`Animator`]
/// (what is drawn). Every committed change to the authoritative viewport
/// becomes the animator's new target; while a drag is live, changes snap so
/// the plot tracks the pointer exactly.
///
/// Three families of scales are derived on demand for each axis:
/// - [`PlotView::full_scale`]: the dataset extent, for overview strips.
/// - [`PlotView::view_scale`]: the authoritative viewport.
/// - [`PlotView::animated_scale`]: the displayed, possibly mid-transition viewport.
#[derive(Debug)]
pub struct PlotView {
    store: ViewportStore,
    gestures: GestureController,
    animator: Animator,
    pixel_size: Size,
}

impl PlotView {
    /// Creates a view over the dataset extent with default options.
    pub fn new(data_x: Domain, data_y: Domain, width: f64, height: f64) -> Result<Self, ConfigError> {
        Self::with_options(data_x, data_y, width, height, PlotViewOptions::default())
    }

    /// Creates a view over the dataset extent.
    ///
    /// Fails if either extent is empty or inverted, if a pixel dimension is not
    /// positive, or if the constraints are malformed.
    pub fn with_options(
        data_x: Domain,
        data_y: Domain,
        width: f64,
        height: f64,
        options: PlotViewOptions,
    ) -> Result<Self, ConfigError> {
        let full = Viewport::new(data_x, data_y)?;
        let pixel_size = validate_pixel_size(width, height)?;
        let store = ViewportStore::new(full, options.initial_viewport, options.constraints)?;
        let animator = Animator::new(store.viewport(), options.animation_duration_ms);
        let owner = NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?full, width, height, "plot view created");
        Ok(Self {
            store,
            gestures: GestureController::new(owner),
            animator,
            pixel_size,
        })
    }

    /// Returns a snapshot of the authoritative viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.store.viewport()
    }

    /// Returns the dataset extent.
    #[must_use]
    pub fn full_extent(&self) -> Viewport {
        self.store.full_extent()
    }

    /// Returns the viewport currently drawn.
    #[must_use]
    pub fn animated_viewport(&self) -> Viewport {
        self.animator.displayed()
    }

    /// Returns the plot size in pixels.
    #[must_use]
    pub fn pixel_size(&self) -> Size {
        self.pixel_size
    }

    /// Returns the active constraints.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        self.store.constraints()
    }

    /// Number of committed viewport changes since construction.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Scale over the dataset extent.
    #[must_use]
    pub fn full_scale(&self, axis: Axis) -> LinearScale {
        self.scale_for(self.store.full_extent(), axis)
    }

    /// Scale over the authoritative viewport.
    #[must_use]
    pub fn view_scale(&self, axis: Axis) -> LinearScale {
        self.scale_for(self.store.viewport(), axis)
    }

    /// Scale over the displayed viewport.
    #[must_use]
    pub fn animated_scale(&self, axis: Axis) -> LinearScale {
        self.scale_for(self.animator.displayed(), axis)
    }

    /// Returns the data-space point under the pixel position `pointer`.
    #[must_use]
    pub fn data_at(&self, pointer: Point) -> Point {
        data_at(self.store.viewport(), self.pixel_size, pointer)
    }

    /// Shifts the viewport by a data-space delta.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> Result<(), InputError> {
        let before = self.store.revision();
        self.store.move_by(dx, dy)?;
        self.sync_animation(before);
        Ok(())
    }

    /// Shifts the viewport by a pixel delta, as if the content were dragged.
    ///
    /// Moving the content right by `delta.x` pixels reveals data to the left.
    pub fn pan_by_pixels(&mut self, delta: Vec2) -> Result<(), InputError> {
        if !delta.is_finite() {
            return Err(InputError::NonFinite);
        }
        let dx = -delta.x * self.view_scale(Axis::X).data_per_pixel();
        let dy = -delta.y * self.view_scale(Axis::Y).data_per_pixel();
        self.move_by(dx, dy)
    }

    /// Zooms by `factor` around `center` (data space; defaults to the viewport
    /// midpoint) on `axes`.
    pub fn zoom(
        &mut self,
        factor: f64,
        center: Option<Point>,
        axes: AxisMask,
    ) -> Result<(), InputError> {
        let before = self.store.revision();
        self.store.zoom(factor, center, axes)?;
        self.sync_animation(before);
        Ok(())
    }

    /// Sets the viewport to `target`, or to the dataset extent, then constrains it.
    pub fn reset(&mut self, target: Option<Viewport>) {
        let before = self.store.revision();
        self.store.reset(target);
        self.sync_animation(before);
    }

    /// Resets to the dataset extent.
    pub fn zoom_to_extent(&mut self) {
        self.reset(None);
    }

    /// Shows the data-space rectangle `rect`, for example a brushed selection.
    pub fn zoom_to_rect(&mut self, rect: Rect) -> Result<(), ConfigError> {
        let target = Viewport::from_rect(rect)?;
        self.reset(Some(target));
        Ok(())
    }

    /// Replaces all constraints and re-constrains the current viewport.
    pub fn set_constraints(&mut self, constraints: Constraints) -> Result<(), ConfigError> {
        let before = self.store.revision();
        self.store.set_constraints(constraints)?;
        self.sync_animation(before);
        Ok(())
    }

    /// Updates the plot size. The logical viewport is not touched; scales
    /// pick up the new size the next time they are requested. A live drag
    /// keeps the size it started with.
    pub fn update_pixel_dimensions(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        self.pixel_size = validate_pixel_size(width, height)?;
        Ok(())
    }

    /// Sets the duration of transitions started from now on. `0` disables
    /// animation.
    pub fn set_animation_duration(&mut self, duration_ms: u64) {
        self.animator.set_duration_ms(duration_ms);
    }

    /// Returns the configured transition duration.
    #[must_use]
    pub fn animation_duration_ms(&self) -> u64 {
        self.animator.duration_ms()
    }

    /// Advances the displayed viewport to `now_ms`. Returns `true` if another
    /// frame is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.animator.tick(now_ms)
    }

    /// Like [`PlotView::tick`], but a no-op for a superseded ticket.
    pub fn tick_ticket(&mut self, ticket: FrameTicket, now_ms: u64) -> bool {
        self.animator.tick_ticket(ticket, now_ms)
    }

    /// Ticket for the current animation; pass it back to
    /// [`PlotView::tick_ticket`] from the frame callback.
    #[must_use]
    pub fn animation_ticket(&self) -> FrameTicket {
        self.animator.ticket()
    }

    /// Returns `true` while a transition is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Binds a drag surface.
    ///
    /// `sensitivity` chooses whether pixel offsets are measured against the
    /// viewport at the press ([`Sensitivity::View`]) or the dataset extent
    /// ([`Sensitivity::Full`]). See [`Sensitivity::default_invert`] for the
    /// conventional `invert` value.
    pub fn bind_drag(
        &mut self,
        axes: AxisMask,
        invert: bool,
        sensitivity: Sensitivity,
    ) -> DragBinding {
        self.gestures.bind_drag(DragConfig {
            axes,
            invert,
            sensitivity,
        })
    }

    /// Unbinds a drag surface, ending its drag if it has one.
    pub fn unbind_drag(&mut self, binding: DragBinding) -> Result<(), InputError> {
        self.gestures.unbind_drag(binding)
    }

    /// Binds a wheel surface. `center` fixes the zoom focus in data space;
    /// `None` zooms about the point under the pointer.
    pub fn bind_wheel(
        &mut self,
        axes: AxisMask,
        center: Option<Point>,
        invert: bool,
    ) -> WheelBinding {
        self.gestures.bind_wheel(WheelConfig {
            axes,
            center,
            invert,
        })
    }

    /// Unbinds a wheel surface.
    pub fn unbind_wheel(&mut self, binding: WheelBinding) -> Result<(), InputError> {
        self.gestures.unbind_wheel(binding)
    }

    /// Pointer pressed on a drag surface. Returns `Ok(true)` if a drag started.
    pub fn on_press(&mut self, binding: &DragBinding, pointer: Point) -> Result<bool, InputError> {
        self.gestures
            .press(binding, pointer, &self.store, self.pixel_size)
    }

    /// Pointer moved over a drag surface. Returns `Ok(true)` if the viewport
    /// changed.
    pub fn on_move(&mut self, binding: &DragBinding, pointer: Point) -> Result<bool, InputError> {
        let before = self.store.revision();
        let moved = self.gestures.drag_to(binding, pointer, &mut self.store)?;
        self.sync_animation(before);
        Ok(moved)
    }

    /// Pointer released. Returns `Ok(true)` if a drag ended.
    pub fn on_release(&mut self, binding: &DragBinding) -> Result<bool, InputError> {
        self.gestures.release(binding)
    }

    /// Drag abandoned, for example because pointer capture was lost.
    pub fn on_cancel(&mut self, binding: &DragBinding) -> Result<bool, InputError> {
        self.gestures.release(binding)
    }

    /// Wheel event over a wheel surface.
    ///
    /// When this returns [`WheelOutcome::Handled`] the host should suppress
    /// default scrolling for this event only.
    pub fn on_wheel(
        &mut self,
        binding: &WheelBinding,
        pointer: Point,
        delta: f64,
    ) -> Result<WheelOutcome, InputError> {
        let before = self.store.revision();
        let outcome = self
            .gestures
            .wheel(binding, pointer, delta, &mut self.store, self.pixel_size)?;
        self.sync_animation(before);
        Ok(outcome)
    }

    /// Returns `true` while a drag is live.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    /// Returns the live drag session, if any.
    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.gestures.session()
    }

    /// Snapshot of the view state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> PlotViewDebugInfo {
        PlotViewDebugInfo {
            viewport: self.store.viewport(),
            animated_viewport: self.animator.displayed(),
            full_extent: self.store.full_extent(),
            pixel_size: self.pixel_size,
            constraints: self.store.constraints(),
            revision: self.store.revision(),
            drag_session: self.gestures.session().copied(),
            animation: self.animator.session().copied(),
            animation_duration_ms: self.animator.duration_ms(),
            surface_count: self.gestures.surface_count(),
        }
    }

    fn scale_for(&self, viewport: Viewport, axis: Axis) -> LinearScale {
        LinearScale::new(viewport.domain(axis), axis.pixel_range(self.pixel_size))
    }

    fn sync_animation(&mut self, before: u64) {
        if self.store.revision() == before {
            return;
        }
        let target = self.store.viewport();
        if self.gestures.is_dragging() {
            self.animator.snap_to(target);
        } else {
            self.animator.retarget(target);
        }
    }
}

fn validate_pixel_size(width: f64, height: f64) -> Result<Size, ConfigError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(Size::new(width, height))
    } else {
        Err(ConfigError::InvalidPixelSize { width, height })
    }
}

/// Debug snapshot of a [`PlotView`] state.
#[derive(Clone, Copy, Debug)]
pub struct PlotViewDebugInfo {
    /// Authoritative viewport.
    pub viewport: Viewport,
    /// Viewport currently drawn.
    pub animated_viewport: Viewport,
    /// Dataset extent.
    pub full_extent: Viewport,
    /// Plot size in pixels.
    pub pixel_size: Size,
    /// Active constraints.
    pub constraints: Constraints,
    /// Committed change count.
    pub revision: u64,
    /// Live drag session.
    pub drag_session: Option<DragSession>,
    /// Running animation session.
    pub animation: Option<AnimationSession>,
    /// Configured transition duration.
    pub animation_duration_ms: u64,
    /// Number of bound gesture surfaces.
    pub surface_count: usize,
}

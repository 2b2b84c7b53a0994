// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and wheel gestures turned into viewport mutations.
//!
//! ## Surfaces
//!
//! Each interactive region (the main plot, an overview strip, an axis gutter)
//! is bound as its own surface with its own axis mask, inversion, and
//! sensitivity. Binding returns a small handle; the host forwards pointer
//! events for that region together with the handle. Unbinding consumes the
//! handle and frees the surface, and handles that outlive their surface are
//! rejected with [`InputError::StaleBinding`] instead of acting on whatever
//! reuses the slot.
//!
//! ## Drag sessions
//!
//! The controller owns at most one [`DragSession`]. The state machine is
//! `Idle → press → Dragging → release | cancel → Idle`. A press while a session
//! is live, on any surface, is ignored: the first pointer wins.
//!
//! Moves are computed from the total pointer offset since the press, applied
//! to the viewport snapshot taken at the press. The data-per-pixel ratio also
//! comes from that snapshot (or from the full dataset extent), so sensitivity
//! stays constant while the viewport changes under the pointer.

use alloc::vec::Vec;
use core::str::FromStr;

use kurbo::{Point, Size, Vec2};

use crate::error::{InputError, ParseError};
use crate::scale::{Domain, LinearScale, Scale};
use crate::viewport::{Axis, AxisMask, Viewport, ViewportStore};

/// Pointer movement (in pixels, per axis) below which a drag move is ignored.
pub const DRAG_DENOISE_PX: f64 = 1.0;

/// Zoom factor for one wheel tick towards the content.
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom factor for one wheel tick away from the content.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Which domain a drag surface measures pixel offsets against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Sensitivity {
    /// The full dataset extent, for overview strips that show everything.
    Full,
    /// The viewport at the start of the drag, for the main plot.
    #[default]
    View,
}

impl Sensitivity {
    /// The inversion conventionally paired with this sensitivity.
    ///
    /// A [`View`](Self::View) surface drags the content, so the domain moves
    /// against the pointer. A [`Full`](Self::Full) surface drags the brush that
    /// marks the viewport, so the domain moves with the pointer.
    #[must_use]
    pub fn default_invert(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl FromStr for Sensitivity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "view" => Ok(Self::View),
            _ => Err(ParseError::Sensitivity),
        }
    }
}

/// Identifier for a bound gesture surface.
///
/// A slot index plus a generation; the generation increments when a freed slot
/// is reused, so an old identifier never aliases a newer surface.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SurfaceId(pub(crate) u32, pub(crate) u32);

impl SurfaceId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Configuration of a drag surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// Axes the surface pans.
    pub axes: AxisMask,
    /// Move the domain with the pointer instead of against it.
    pub invert: bool,
    /// Domain used to convert pixels to data units.
    pub sensitivity: Sensitivity,
}

/// Configuration of a wheel surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelConfig {
    /// Axes the surface zooms.
    pub axes: AxisMask,
    /// Fixed data-space zoom focus; `None` zooms about the point under the pointer.
    pub center: Option<Point>,
    /// Swap the zoom direction of the wheel.
    pub invert: bool,
}

/// Handle for a bound drag surface.
///
/// Not `Clone`: unbinding consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct DragBinding {
    pub(crate) owner: u64,
    pub(crate) id: SurfaceId,
}

impl DragBinding {
    /// Returns the surface identifier.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }
}

/// Handle for a bound wheel surface.
///
/// Not `Clone`: unbinding consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct WheelBinding {
    pub(crate) owner: u64,
    pub(crate) id: SurfaceId,
}

impl WheelBinding {
    /// Returns the surface identifier.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }
}

/// What the host should do with a wheel event after it was offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelOutcome {
    /// The event was consumed; suppress the host's default scrolling for it.
    Handled,
    /// The event carried no scroll; let the host handle it.
    Ignored,
}

/// State of a drag between press and release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Surface that owns the session.
    pub surface: SurfaceId,
    /// Pointer position at the press, in pixels.
    pub start_pointer: Point,
    /// Viewport at the press. A copy, not a live view.
    pub start_viewport: Viewport,
    /// Plot size at the press; resizes during the drag do not change its
    /// sensitivity.
    pub pixel_size: Size,
    /// Surface configuration captured at the press.
    pub config: DragConfig,
    applied: Vec2,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slot table for bound surfaces.
#[derive(Clone, Debug)]
struct Surfaces<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Surfaces<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Surfaces<T> {
    fn insert(&mut self, value: T) -> SurfaceId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            return SurfaceId(idx, slot.generation);
        }
        let idx = next_index(self.slots.len());
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        SurfaceId(idx, 1)
    }

    fn get(&self, id: SurfaceId) -> Option<&T> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.value.as_ref())
    }

    fn remove(&mut self, id: SurfaceId) -> Option<T> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        let value = slot.value.take()?;
        self.free.push(id.0);
        Some(value)
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }
}

fn next_index(len: usize) -> u32 {
    u32::try_from(len).expect("too many gesture surfaces for u32 SurfaceId")
}

/// Converts drag and wheel input into [`ViewportStore`] calls.
#[derive(Clone, Debug)]
pub struct GestureController {
    owner: u64,
    drags: Surfaces<DragConfig>,
    wheels: Surfaces<WheelConfig>,
    session: Option<DragSession>,
}

impl GestureController {
    /// Creates a controller whose bindings are only accepted by itself.
    ///
    /// `owner` distinguishes controllers so a binding from one view is never
    /// accepted by another.
    #[must_use]
    pub fn new(owner: u64) -> Self {
        Self {
            owner,
            drags: Surfaces::default(),
            wheels: Surfaces::default(),
            session: None,
        }
    }

    /// Binds a drag surface.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` surfaces have ever been live at once.
    pub fn bind_drag(&mut self, config: DragConfig) -> DragBinding {
        DragBinding {
            owner: self.owner,
            id: self.drags.insert(config),
        }
    }

    /// Unbinds a drag surface, ending its session if it has one.
    pub fn unbind_drag(&mut self, binding: DragBinding) -> Result<(), InputError> {
        self.check_owner(binding.owner)?;
        self.drags
            .remove(binding.id)
            .ok_or(InputError::StaleBinding)?;
        if self.session.is_some_and(|s| s.surface == binding.id) {
            self.session = None;
        }
        Ok(())
    }

    /// Binds a wheel surface.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` surfaces have ever been live at once.
    pub fn bind_wheel(&mut self, config: WheelConfig) -> WheelBinding {
        WheelBinding {
            owner: self.owner,
            id: self.wheels.insert(config),
        }
    }

    /// Unbinds a wheel surface.
    pub fn unbind_wheel(&mut self, binding: WheelBinding) -> Result<(), InputError> {
        self.check_owner(binding.owner)?;
        self.wheels
            .remove(binding.id)
            .ok_or(InputError::StaleBinding)?;
        Ok(())
    }

    /// Number of live drag and wheel surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.drags.len() + self.wheels.len()
    }

    /// Returns the live drag session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Returns `true` while a drag session is live.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a drag session on `binding`'s surface.
    ///
    /// Returns `Ok(false)` if another session is already live. `pixels` is the
    /// plot size used for the whole session.
    pub fn press(
        &mut self,
        binding: &DragBinding,
        pointer: Point,
        store: &ViewportStore,
        pixels: Size,
    ) -> Result<bool, InputError> {
        let config = *self.drag_config(binding)?;
        if !pointer.is_finite() {
            return Err(InputError::NonFinite);
        }
        if let Some(live) = &self.session {
            tracing::debug!(
                surface = ?binding.id,
                owner = ?live.surface,
                "press ignored: drag already in progress"
            );
            return Ok(false);
        }
        self.session = Some(DragSession {
            surface: binding.id,
            start_pointer: pointer,
            start_viewport: store.viewport(),
            pixel_size: pixels,
            config,
            applied: Vec2::ZERO,
        });
        tracing::trace!(surface = ?binding.id, ?pointer, "drag started");
        Ok(true)
    }

    /// Pans the viewport to follow the pointer.
    ///
    /// Returns `Ok(true)` if the viewport changed. Moves on a surface without a
    /// session, moves under [`DRAG_DENOISE_PX`], and moves that would produce an
    /// invalid viewport are dropped.
    pub fn drag_to(
        &mut self,
        binding: &DragBinding,
        pointer: Point,
        store: &mut ViewportStore,
    ) -> Result<bool, InputError> {
        self.drag_config(binding)?;
        if !pointer.is_finite() {
            return Err(InputError::NonFinite);
        }
        let Some(session) = self.session.as_mut().filter(|s| s.surface == binding.id) else {
            return Ok(false);
        };

        let axes = session.config.axes;
        let raw = pointer - session.start_pointer;
        let total = Vec2::new(
            if axes.includes(Axis::X) { raw.x } else { 0.0 },
            if axes.includes(Axis::Y) { raw.y } else { 0.0 },
        );
        let step = total - session.applied;
        if step.x.abs() < DRAG_DENOISE_PX && step.y.abs() < DRAG_DENOISE_PX {
            return Ok(false);
        }

        let reference = match session.config.sensitivity {
            Sensitivity::View => session.start_viewport,
            Sensitivity::Full => store.full_extent(),
        };
        let sign = if session.config.invert { 1.0 } else { -1.0 };
        let pixels = session.pixel_size;
        let current = store.viewport();
        let target = |axis: Axis, offset: f64| -> Domain {
            if !axes.includes(axis) {
                return current.domain(axis);
            }
            let scale = LinearScale::new(reference.domain(axis), axis.pixel_range(pixels));
            let delta = offset * scale.data_per_pixel() * sign;
            session.start_viewport.domain(axis).shifted(delta)
        };
        let x = target(Axis::X, total.x);
        let y = target(Axis::Y, total.y);
        if !x.is_valid() || !y.is_valid() {
            tracing::debug!(?x, ?y, "drag move discarded: numeric fault");
            return Ok(false);
        }

        session.applied = total;
        Ok(store.commit(x, y, 0.5, 0.5))
    }

    /// Ends the session owned by `binding`'s surface.
    ///
    /// Returns `Ok(true)` if a session ended. Used for both pointer release and
    /// abandoned gestures.
    pub fn release(&mut self, binding: &DragBinding) -> Result<bool, InputError> {
        self.drag_config(binding)?;
        if self.session.is_some_and(|s| s.surface == binding.id) {
            self.session = None;
            tracing::trace!(surface = ?binding.id, "drag ended");
            return Ok(true);
        }
        Ok(false)
    }

    /// Zooms one fixed step for a wheel event.
    ///
    /// `delta` follows the host convention where negative values scroll up
    /// (towards the content) and zoom in. `pointer` is in pixels.
    pub fn wheel(
        &self,
        binding: &WheelBinding,
        pointer: Point,
        delta: f64,
        store: &mut ViewportStore,
        pixels: Size,
    ) -> Result<WheelOutcome, InputError> {
        let config = *self.wheel_config(binding)?;
        if !pointer.is_finite() || !delta.is_finite() {
            return Err(InputError::NonFinite);
        }
        if delta == 0.0 {
            return Ok(WheelOutcome::Ignored);
        }

        let focus = config
            .center
            .unwrap_or_else(|| data_at(store.viewport(), pixels, pointer));
        if !focus.is_finite() {
            tracing::debug!(?pointer, ?focus, "wheel zoom discarded: numeric fault");
            return Ok(WheelOutcome::Handled);
        }
        let zoom_in = (delta < 0.0) != config.invert;
        let factor = if zoom_in { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        store.zoom(factor, Some(focus), config.axes)?;
        Ok(WheelOutcome::Handled)
    }

    fn check_owner(&self, owner: u64) -> Result<(), InputError> {
        if owner == self.owner {
            Ok(())
        } else {
            Err(InputError::StaleBinding)
        }
    }

    fn drag_config(&self, binding: &DragBinding) -> Result<&DragConfig, InputError> {
        self.check_owner(binding.owner)?;
        self.drags.get(binding.id).ok_or(InputError::StaleBinding)
    }

    fn wheel_config(&self, binding: &WheelBinding) -> Result<&WheelConfig, InputError> {
        self.check_owner(binding.owner)?;
        self.wheels.get(binding.id).ok_or(InputError::StaleBinding)
    }
}

/// Returns the data-space point under the pixel position `pointer`.
pub(crate) fn data_at(viewport: Viewport, pixels: Size, pointer: Point) -> Point {
    let x = LinearScale::new(viewport.x(), Axis::X.pixel_range(pixels));
    let y = LinearScale::new(viewport.y(), Axis::Y.pixel_range(pixels));
    Point::new(x.inverse(pointer.x), y.inverse(pointer.y))
}

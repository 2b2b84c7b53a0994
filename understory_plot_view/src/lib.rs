// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_plot_view --heading-base-level=0

//! Understory Plot View: a data-space viewport engine for interactive plots.
//!
//! This crate owns the visible window over a 2D dataset (for example aircraft
//! range against passenger capacity) and keeps it consistent under panning,
//! zooming, drag and wheel gestures, configurable constraints, and animated
//! transitions. It focuses on:
//! - Linear scales between data-space domains and pixel ranges.
//! - Pure constraint functions for positional and extent (zoom) bounds.
//! - An authoritative viewport store with move / zoom / reset.
//! - Drag and wheel surfaces with a single first-pointer-wins drag session.
//! - A presentational animator that eases towards the authoritative viewport.
//!
//! It does **not** draw anything. Callers are expected to:
//! - Read [`PlotView::view_scale`] / [`PlotView::animated_scale`] every frame to
//!   place marks, axes, gridlines, and the overview brush.
//! - Forward pointer and wheel events for each interactive region to its
//!   binding.
//! - Drive [`PlotView::tick`] from their frame loop while
//!   [`PlotView::is_animating`] is `true`.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_plot_view::{AxisMask, Domain, PlotView, Scale, Axis};
//!
//! // Range in km against seats, drawn into an 800x600 plot.
//! let mut view = PlotView::new(
//!     Domain::new(0.0, 16_000.0),
//!     Domain::new(0.0, 850.0),
//!     800.0,
//!     600.0,
//! )
//! .unwrap();
//!
//! // Zoom in 2x about 4,000 km / 200 seats.
//! view.zoom(2.0, Some(Point::new(4_000.0, 200.0)), AxisMask::Both).unwrap();
//! assert_eq!(view.viewport().x().width(), 8_000.0);
//!
//! // Rendering reads the scales.
//! let px = view.view_scale(Axis::X).forward(4_000.0);
//! assert!(px > 0.0 && px < 800.0);
//! ```
//!
//! ## Gestures
//!
//! ```rust
//! use kurbo::Point;
//! use understory_plot_view::{AxisMask, Domain, PlotView, Sensitivity, WheelOutcome};
//!
//! let mut view =
//!     PlotView::new(Domain::new(0.0, 100.0), Domain::new(0.0, 100.0), 500.0, 500.0).unwrap();
//!
//! // Main plot: drag the content, zoom about the pointer.
//! let plot_drag = view.bind_drag(AxisMask::Both, false, Sensitivity::View);
//! let plot_wheel = view.bind_wheel(AxisMask::Both, None, false);
//!
//! view.on_press(&plot_drag, Point::new(250.0, 250.0)).unwrap();
//! view.on_move(&plot_drag, Point::new(300.0, 250.0)).unwrap();
//! view.on_release(&plot_drag).unwrap();
//! assert_eq!(view.viewport().x().min, -10.0);
//!
//! let outcome = view.on_wheel(&plot_wheel, Point::new(250.0, 250.0), -1.0).unwrap();
//! assert_eq!(outcome, WheelOutcome::Handled);
//! ```
//!
//! ## Design notes
//!
//! - Constraints are applied extent first, then position.
//! - Zoom preserves the fractional position of its focus point, including
//!   through an extent clamp.
//! - Drags are measured from the press against a snapshot of the viewport, so
//!   sensitivity does not drift while the viewport moves.
//! - The animator never feeds back into the authoritative state. Retargeting
//!   starts from the displayed value, so there is no jump.
//! - Time is passed in by the host as millisecond timestamps.
//! - Y pixel ranges run from the plot height down to `0`.
//!
//! This crate is `no_std` (with `alloc`).

#![no_std]

extern crate alloc;

mod animation;
mod constraints;
mod error;
mod gesture;
mod plot_view;
mod scale;
mod viewport;

pub use animation::{AnimationSession, Animator, FrameTicket, ease_out_cubic};
pub use constraints::{Bound, Constraints, apply_all, apply_extent, apply_position};
pub use error::{ConfigError, InputError, ParseError};
pub use gesture::{
    DRAG_DENOISE_PX, DragBinding, DragConfig, DragSession, GestureController, Sensitivity,
    SurfaceId, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT, WheelBinding, WheelConfig, WheelOutcome,
};
pub use plot_view::{DEFAULT_ANIMATION_MS, PlotView, PlotViewDebugInfo, PlotViewOptions};
pub use scale::{Domain, LinearScale, MIN_SPAN, Scale};
pub use viewport::{Axis, AxisMask, Viewport, ViewportStore};

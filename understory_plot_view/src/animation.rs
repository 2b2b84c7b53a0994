// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentational smoothing of viewport changes.
//!
//! The [`Animator`] holds a second, purely visual viewport that eases towards
//! the authoritative one. Nothing in the store or the gesture controller reads
//! it; only the rendering layer does, through the animated scales.
//!
//! Time is supplied by the host as millisecond timestamps on every
//! [`Animator::tick`], so any clock works, including a virtual one in tests.
//! A new target always starts from the value that is currently displayed,
//! which keeps retargeting mid-flight free of jumps.

use crate::viewport::Viewport;

/// Ease-out cubic: `1 - (1 - t)^3`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// One interpolation from a start viewport to a target viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSession {
    /// Displayed viewport when the session began.
    pub start_viewport: Viewport,
    /// Viewport the session ends on.
    pub target_viewport: Viewport,
    /// Timestamp of the first tick after the session began.
    ///
    /// `None` until that tick, so a host that has been idle does not skip
    /// straight to the end.
    pub start_time_ms: Option<u64>,
    /// Length of the session.
    pub duration_ms: u64,
}

impl AnimationSession {
    /// Linear progress in `[0, 1]` at `now_ms`.
    #[must_use]
    pub fn progress(&self, now_ms: u64) -> f64 {
        let Some(start) = self.start_time_ms else {
            return 0.0;
        };
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(start) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    /// Eased viewport at `now_ms`.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> Viewport {
        let eased = ease_out_cubic(self.progress(now_ms));
        self.start_viewport.lerp(self.target_viewport, eased)
    }
}

/// Ticket identifying the animation a frame was requested for.
///
/// Retargeting invalidates earlier tickets; [`Animator::tick_ticket`] ignores
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

/// Time-interpolated viewport for rendering.
#[derive(Clone, Debug)]
pub struct Animator {
    duration_ms: u64,
    displayed: Viewport,
    session: Option<AnimationSession>,
    generation: u64,
}

impl Animator {
    /// Creates an animator displaying `initial`.
    #[must_use]
    pub fn new(initial: Viewport, duration_ms: u64) -> Self {
        Self {
            duration_ms,
            displayed: initial,
            session: None,
            generation: 0,
        }
    }

    /// Configured duration of new sessions.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Sets the duration used by sessions started from now on.
    ///
    /// `0` makes every retarget snap.
    pub fn set_duration_ms(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// The viewport the rendering layer should draw.
    #[must_use]
    pub fn displayed(&self) -> Viewport {
        self.displayed
    }

    /// The running session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    /// Returns `true` while a session is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Ticket for the current animation.
    #[must_use]
    pub fn ticket(&self) -> FrameTicket {
        FrameTicket(self.generation)
    }

    /// Starts easing towards `target` from the displayed viewport.
    ///
    /// Snaps instead when the configured duration is `0`.
    pub fn retarget(&mut self, target: Viewport) -> FrameTicket {
        if self.duration_ms == 0 {
            return self.snap_to(target);
        }
        if self.session.is_none() && self.displayed == target {
            return self.ticket();
        }
        self.generation += 1;
        self.session = Some(AnimationSession {
            start_viewport: self.displayed,
            target_viewport: target,
            start_time_ms: None,
            duration_ms: self.duration_ms,
        });
        tracing::trace!(?target, generation = self.generation, "animation retargeted");
        self.ticket()
    }

    /// Displays `target` immediately and drops any running session.
    pub fn snap_to(&mut self, target: Viewport) -> FrameTicket {
        if self.session.take().is_some() || self.displayed != target {
            self.generation += 1;
        }
        self.displayed = target;
        self.ticket()
    }

    /// Advances the running session to `now_ms`.
    ///
    /// Returns `true` if another frame is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.start_time_ms.get_or_insert(now_ms);
        if session.progress(now_ms) >= 1.0 {
            self.displayed = session.target_viewport;
            self.session = None;
            tracing::trace!(generation = self.generation, "animation settled");
            return false;
        }
        self.displayed = session.sample(now_ms);
        true
    }

    /// Like [`Animator::tick`], but a no-op for a superseded ticket.
    pub fn tick_ticket(&mut self, ticket: FrameTicket, now_ms: u64) -> bool {
        if ticket != self.ticket() {
            return false;
        }
        self.tick(now_ms)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for configuration, call-site validation, and parsing.

use core::fmt;

/// Error returned when a [`crate::PlotView`] or one of its parts is configured
/// with values that could never produce a valid viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A domain had `min >= max`, a non-finite bound, or a width too large to
    /// represent.
    InvalidDomain {
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },
    /// A pixel dimension was zero, negative, or not finite.
    InvalidPixelSize {
        /// Width as given.
        width: f64,
        /// Height as given.
        height: f64,
    },
    /// An extent bound had `min > max`, a non-positive maximum, or a non-finite value.
    InvalidExtentBound {
        /// Lower extent as given.
        min: Option<f64>,
        /// Upper extent as given.
        max: Option<f64>,
    },
    /// A position bound had `min > max` or a non-finite value.
    InvalidPositionBound {
        /// Lower edge as given.
        min: Option<f64>,
        /// Upper edge as given.
        max: Option<f64>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { min, max } => write!(
                f,
                "invalid domain [{min}, {max}]: min must be below max and the width finite"
            ),
            Self::InvalidPixelSize { width, height } => {
                write!(f, "invalid pixel size {width}x{height}: both must be positive")
            }
            Self::InvalidExtentBound { min, max } => {
                write!(f, "invalid extent bound [{min:?}, {max:?}]")
            }
            Self::InvalidPositionBound { min, max } => {
                write!(f, "invalid position bound [{min:?}, {max:?}]")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

impl ConfigError {
    pub(crate) fn domain(min: f64, max: f64) -> Self {
        Self::InvalidDomain { min, max }
    }
}

/// Error returned synchronously when an operation is called with arguments it
/// cannot act on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputError {
    /// A delta or coordinate was NaN or infinite.
    NonFinite,
    /// A zoom factor was zero, negative, or not finite.
    InvalidZoomFactor(f64),
    /// The binding was unbound, or belongs to another view.
    StaleBinding,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => f.write_str("value is not finite"),
            Self::InvalidZoomFactor(factor) => {
                write!(f, "invalid zoom factor {factor}: must be finite and positive")
            }
            Self::StaleBinding => f.write_str("gesture binding is no longer attached"),
        }
    }
}

impl core::error::Error for InputError {}

/// Error returned when parsing an [`crate::Axis`] or [`crate::Sensitivity`]
/// from a string literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The literal did not name an axis (`"x"`, `"y"`, or `"both"`).
    Axis,
    /// The literal did not name a sensitivity mode (`"full"` or `"view"`).
    Sensitivity,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axis => f.write_str("expected one of \"x\", \"y\", \"both\""),
            Self::Sensitivity => f.write_str("expected one of \"full\", \"view\""),
        }
    }
}

impl core::error::Error for ParseError {}

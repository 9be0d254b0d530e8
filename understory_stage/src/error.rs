// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error returned when a stage cannot be configured as asked.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum StageError {
    /// The move rate is zero, negative or not finite.
    #[error("move rate must be a finite positive number of events per second, got {0}")]
    InvalidThrottleRate(f64),
    /// The double-click window is zero.
    #[error("double-click window must be at least 1ms")]
    InvalidDoubleClickWindow,
    /// The drawing surface has no pixels, so pixel-exact hits cannot be resolved.
    #[error("surface of {width}x{height} has no pixels")]
    EmptySurface {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The drawing surface is larger than the pixel-exact hit canvas allows.
    #[error("surface of {width}x{height} is too large for the hit canvas")]
    SurfaceTooLarge {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
}

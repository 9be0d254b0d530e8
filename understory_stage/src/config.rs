// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage configuration.

use understory_event_state::click::DEFAULT_WINDOW_MS;
use understory_precise_hit::HitParams;

use crate::error::StageError;

/// Default rate limit for move events, in events per second.
pub const DEFAULT_MOVE_RATE_HZ: f64 = 80.0;

/// Tunables for a [`Stage`](crate::Stage).
///
/// ```
/// use understory_stage::StageConfig;
///
/// let config = StageConfig::default()
///     .with_double_click_window_ms(250)
///     .with_move_rate_hz(None);
/// assert!(config.validate().is_ok());
/// assert!(StageConfig::default().with_move_rate_hz(Some(0.0)).validate().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StageConfig {
    /// Maximum time between two clicks (or taps) on the same node for a double click.
    pub double_click_window_ms: u64,
    /// Maximum number of move events processed per second; `None` processes all.
    pub move_rate_hz: Option<f64>,
    /// Tolerances for analytic hit tests.
    pub hit_params: HitParams,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            double_click_window_ms: DEFAULT_WINDOW_MS,
            move_rate_hz: Some(DEFAULT_MOVE_RATE_HZ),
            hit_params: HitParams::default(),
        }
    }
}

impl StageConfig {
    /// Set the double-click window.
    pub fn with_double_click_window_ms(mut self, window_ms: u64) -> Self {
        self.double_click_window_ms = window_ms;
        self
    }

    /// Set the move rate limit.
    pub fn with_move_rate_hz(mut self, rate_hz: Option<f64>) -> Self {
        self.move_rate_hz = rate_hz;
        self
    }

    /// Set the analytic hit tolerances.
    pub fn with_hit_params(mut self, params: HitParams) -> Self {
        self.hit_params = params;
        self
    }

    /// Check the configuration for values the stage cannot honor.
    pub fn validate(&self) -> Result<(), StageError> {
        if self.double_click_window_ms == 0 {
            return Err(StageError::InvalidDoubleClickWindow);
        }
        if let Some(rate) = self.move_rate_hz
            && (!rate.is_finite() || rate <= 0.0)
        {
            return Err(StageError::InvalidThrottleRate(rate));
        }
        Ok(())
    }
}

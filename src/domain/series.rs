//! Read-only view over a time-ordered sequence of bars.

use super::bar::{Bar, Channel};
use crate::error::{GymError, Result};

/// Number of consecutive bars in an observation window
pub const LOOKBACK_WINDOW: usize = 6;

/// Validated, immutable price series
///
/// Bars must already be sorted ascending by date. The series is never mutated
/// after construction and is meant to be shared behind an `Arc` between
/// independently seeded environments.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, rejecting data too short for one window or with malformed bars
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.len() < LOOKBACK_WINDOW {
            return Err(GymError::InsufficientData {
                required: LOOKBACK_WINDOW,
                actual: bars.len(),
            });
        }

        if let Some((idx, bar)) = bars.iter().enumerate().find(|(_, b)| !b.is_well_formed()) {
            return Err(GymError::InvalidMarketData(format!(
                "bar {} ({}) has non-positive or non-finite values: \
                 open={} high={} low={} close={} volume={}",
                idx, bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            )));
        }

        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Largest step index that still leaves room for a full window
    pub fn last_valid_index(&self) -> usize {
        self.bars.len() - LOOKBACK_WINDOW
    }

    /// Bar at a step index
    ///
    /// Panics when `step` is out of range; callers keep the step within
    /// `0..=last_valid_index()`.
    pub fn bar(&self, step: usize) -> &Bar {
        &self.bars[step]
    }

    /// The `LOOKBACK_WINDOW` bars starting at `step`
    ///
    /// Panics when the window would run past the end of the series.
    pub fn window(&self, step: usize) -> &[Bar] {
        assert!(
            step <= self.last_valid_index(),
            "window start {} exceeds last valid index {}",
            step,
            self.last_valid_index()
        );
        &self.bars[step..step + LOOKBACK_WINDOW]
    }

    /// One channel of the window starting at `step`
    pub fn channel_window(&self, step: usize, channel: Channel) -> [f64; LOOKBACK_WINDOW] {
        let mut values = [0.0; LOOKBACK_WINDOW];
        for (slot, bar) in values.iter_mut().zip(self.window(step)) {
            *slot = bar.channel(channel);
        }
        values
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One OHLCV price record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Read a single channel of the bar
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Open => self.open,
            Channel::High => self.high,
            Channel::Low => self.low,
            Channel::Close => self.close,
            Channel::Volume => self.volume,
        }
    }

    /// Closed interval a trade inside this bar may fill at, lower bound first
    pub fn fill_range(&self) -> (f64, f64) {
        if self.open <= self.close {
            (self.open, self.close)
        } else {
            (self.close, self.open)
        }
    }

    /// Check that prices are finite and positive and volume is non-negative
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p > 0.0)
            && self.volume.is_finite()
            && self.volume >= 0.0
    }
}

/// Price/volume channel of a bar, in observation row order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Channel {
    /// All channels in the order they appear in an observation
    pub fn all() -> &'static [Channel] {
        &[
            Self::Open,
            Self::High,
            Self::Low,
            Self::Close,
            Self::Volume,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Open => "Open",
            Channel::High => "High",
            Channel::Low => "Low",
            Channel::Close => "Close",
            Channel::Volume => "Volume",
        }
    }

    pub fn is_price(&self) -> bool {
        !matches!(self, Channel::Volume)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

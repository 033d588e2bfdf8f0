//! Confidence bar: turns the `data-confidence` attribute of `#progress` into
//! the bar's width, its gradient and the `#confidence-value` text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::dom::{self, Page};

pub const BAR_ID: &str = "progress";
pub const TEXT_ID: &str = "confidence-value";
pub const CONFIDENCE_ATTR: &str = "data-confidence";

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Band for a clamped percentage. NaN lands in `Low`.
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ConfidenceBand::High
        } else if percentage >= 50.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn gradient(self) -> &'static str {
        match self {
            ConfidenceBand::High => "linear-gradient(90deg, #00ff88, #00bfa6)",
            ConfidenceBand::Medium => "linear-gradient(90deg, #ffbb00, #ff8800)",
            ConfidenceBand::Low => "linear-gradient(90deg, #ff4b2b, #ff416c)",
        }
    }
}

/// A confidence value normalized to a percentage in [0, 100], or NaN for unparseable input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceReading {
    percentage: f64,
}

impl ConfidenceReading {
    /// Parses a raw attribute value such as `"0.87"`, `"87"` or `"87%"`.
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.trim().replacen('%', "", 1);
        Self::from_value(parse_float_prefix(&cleaned))
    }

    /// Values up to 1 are fractions, anything larger is already a percentage.
    pub fn from_value(value: f64) -> Self {
        let scaled = if value <= 1.0 { value * 100.0 } else { value };
        Self {
            percentage: clamp_percentage(scaled),
        }
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn is_nan(&self) -> bool {
        self.percentage.is_nan()
    }

    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::for_percentage(self.percentage)
    }

    /// Rounded integer percentage, e.g. `87%`.
    pub fn text(&self) -> String {
        format!("{}%", self.percentage.round())
    }

    /// Unrounded percentage for the bar's `width` style. Below 1e-6 the
    /// number switches to exponent form, the way a browser stringifies it.
    pub fn width(&self) -> String {
        let p = self.percentage;
        if p != 0.0 && p.abs() < 1e-6 {
            format!("{:e}%", p)
        } else {
            format!("{}%", p)
        }
    }

    pub fn bar_state(&self) -> BarState {
        let band = self.band();
        BarState {
            percentage: (!self.is_nan()).then_some(self.percentage),
            text: self.text(),
            width: self.width(),
            band,
            background: band.gradient(),
        }
    }
}

/// What the bar shows for one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarState {
    pub percentage: Option<f64>,
    pub text: String,
    pub width: String,
    pub band: ConfidenceBand,
    pub background: &'static str,
}

/// Page-ready pass for the bar. Does nothing unless both `#progress` and
/// `#confidence-value` exist; returns the reading it applied.
pub fn hydrate(page: &Page) -> Option<ConfidenceReading> {
    let (Some(bar), Some(text)) = (page.element_by_id(BAR_ID), page.element_by_id(TEXT_ID))
    else {
        tracing::debug!("confidence bar elements absent; skipping");
        return None;
    };

    let Some(raw) = dom::attr(&bar, CONFIDENCE_ATTR) else {
        tracing::warn!("#{BAR_ID} has no {CONFIDENCE_ATTR} attribute; skipping");
        return None;
    };

    let reading = ConfidenceReading::parse(&raw);
    if reading.is_nan() {
        tracing::warn!(raw = %raw, "confidence is not numeric; bar will show NaN%");
    }

    dom::set_text(&text, &reading.text());
    dom::set_style_property(&bar, "width", &reading.width());
    dom::set_style_property(&bar, "background", reading.band().gradient());
    tracing::debug!(
        percentage = reading.percentage(),
        band = ?reading.band(),
        "confidence bar applied"
    );
    Some(reading)
}

/// Longest leading float literal, NaN when there is none.
fn parse_float_prefix(s: &str) -> f64 {
    FLOAT_PREFIX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn clamp_percentage(p: f64) -> f64 {
    if p.is_nan() {
        p
    } else if p <= 0.0 {
        0.0
    } else if p >= 100.0 {
        100.0
    } else {
        p
    }
}

//! Unit handling utilities
//!
//! The part layer computes exclusively in decimal inches. This module provides
//! parsing of shop-style measurements (decimal and fractional), fractional
//! display to the nearest 1/32, board-foot volume, and the scene-unit scale
//! applied only at the render boundary.

use crate::constants::{CUBIC_INCHES_PER_BOARD_FOOT, SCENE_UNITS_PER_INCH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Snap tolerance when displaying a decimal as a 32nd fraction.
const FRACTION_TOLERANCE: f64 = 0.005;

/// Measurement system for display-layer labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::Imperial
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Parse a shop measurement string to decimal inches
///
/// Accepts decimals (`"2.9375"`), plain fractions (`"3/4"`), and mixed forms
/// with a space or dash separator (`"1 1/2"`, `"1-1/2"`). A trailing inch
/// mark (`"`) is ignored.
pub fn parse_inches(input: &str) -> Result<f64, String> {
    let input = input.trim().trim_end_matches('"').trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    let (sign, body) = match input.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, input),
    };
    // "1-1/2" is the written form of "1 1/2"
    let body = body.replace('-', " ");

    let mut total_inches = 0.0;
    for part in body.split_whitespace() {
        if let Some((num, den)) = part.split_once('/') {
            let num = num
                .trim()
                .parse::<f64>()
                .map_err(|_| "Invalid numerator".to_string())?;
            let den = den
                .trim()
                .parse::<f64>()
                .map_err(|_| "Invalid denominator".to_string())?;
            if den == 0.0 {
                return Err("Division by zero".to_string());
            }
            total_inches += num / den;
        } else {
            total_inches += part
                .parse::<f64>()
                .map_err(|_| "Invalid number part".to_string())?;
        }
    }

    Ok(sign * total_inches)
}

/// Format decimal inches as a shop fraction
///
/// Snaps to the nearest 1/32 when within tolerance (`2.9375` → `"2 15/16"`,
/// `0.75` → `"3/4"`); otherwise falls back to three decimal places.
pub fn format_inches(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let value_abs = value.abs();
    let whole = value_abs.floor();
    let remainder = value_abs - whole;

    let numerator = (remainder * 32.0).round();
    if (remainder - numerator / 32.0).abs() < FRACTION_TOLERANCE {
        let whole = whole as u64 + if numerator >= 32.0 { 1 } else { 0 };
        let numerator = if numerator >= 32.0 { 0 } else { numerator as u64 };
        if numerator == 0 {
            return format!("{}{}", sign, whole);
        }
        let divisor = gcd(numerator, 32);
        let (num, den) = (numerator / divisor, 32 / divisor);
        if whole > 0 {
            return format!("{}{} {}/{}", sign, whole, num, den);
        }
        return format!("{}{}/{}", sign, num, den);
    }

    format!("{:.3}", value)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Board feet of a piece of stock (length x width x thickness, inches)
pub fn board_feet(length_in: f64, width_in: f64, thickness_in: f64) -> f64 {
    (length_in * width_in * thickness_in) / CUBIC_INCHES_PER_BOARD_FOOT
}

/// Convert inches to render-layer scene units
///
/// Only render adapters call this; no part-layer arithmetic ever mixes units.
pub fn to_scene_units(inches: f64) -> f64 {
    inches * SCENE_UNITS_PER_INCH
}

/// Convert render-layer scene units back to inches
pub fn from_scene_units(scene: f64) -> f64 {
    scene / SCENE_UNITS_PER_INCH
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

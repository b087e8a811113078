//! `rgba(...)` strings, hex colors and transparency percentages.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConfigError, Result};

static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)(?:,\s*([\d.]+))?\)").expect("static regex"));
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("static regex"));

/// An opaque RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	/// Parses `#rrggbb` (the `#` is optional).
	pub fn from_hex(hex: &str) -> Result<Self> {
		let caps = HEX_RE.captures(hex.trim()).ok_or_else(|| ConfigError::InvalidColor(hex.to_string()))?;
		let channel = |i: usize| u8::from_str_radix(&caps[i], 16).map_err(|_| ConfigError::InvalidColor(hex.to_string()));
		Ok(Self {
			r: channel(1)?,
			g: channel(2)?,
			b: channel(3)?,
		})
	}

	/// Formats as lowercase `#rrggbb`.
	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// A color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Default for Rgba {
	fn default() -> Self {
		Self { r: 0, g: 0, b: 0, a: 1.0 }
	}
}

impl Rgba {
	/// Parses `rgb(r, g, b)` or `rgba(r, g, b, a)`; a missing alpha means opaque.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = || ConfigError::InvalidColor(input.to_string());
		let caps = RGBA_RE.captures(input).ok_or_else(invalid)?;
		let channel = |i: usize| caps[i].parse::<u8>().map_err(|_| invalid());
		let a = match caps.get(4) {
			Some(m) => m.as_str().parse::<f64>().map_err(|_| invalid())?,
			None => 1.0,
		};
		Ok(Self {
			r: channel(1)?,
			g: channel(2)?,
			b: channel(3)?,
			a: a.clamp(0.0, 1.0),
		})
	}

	/// Like [`Self::parse`], falling back to opaque black.
	pub fn parse_lossy(input: &str) -> Self {
		Self::parse(input).unwrap_or_default()
	}

	/// RGB part of the color.
	pub const fn rgb(self) -> Rgb {
		Rgb { r: self.r, g: self.g, b: self.b }
	}

	/// Replaces the RGB part, keeping alpha.
	pub const fn with_rgb(self, rgb: Rgb) -> Self {
		Self {
			r: rgb.r,
			g: rgb.g,
			b: rgb.b,
			a: self.a,
		}
	}

	/// Transparency percentage shown by the settings screen: `round((1 - a) * 100)`.
	pub fn transparency(self) -> u8 {
		((1.0 - self.a) * 100.0).round().clamp(0.0, 100.0) as u8
	}

	/// Sets alpha from a transparency percentage, keeping RGB.
	pub fn with_transparency(self, percent: u8) -> Self {
		let percent = f64::from(percent.min(100));
		Self { a: 1.0 - percent / 100.0, ..self }
	}
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

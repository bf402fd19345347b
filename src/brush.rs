use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use egui::Color32;

use crate::error::{AnnotatorError, AnnotatorResult};

/// Allowed brush widths, in surface pixels.
pub const LINE_WIDTH_RANGE: RangeInclusive<f32> = 1.0..=10.0;

/// Brush color parsed from a hex string such as `#000`, `#1e90ff` or `#1e90ff80`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushColor([u8; 4]);

impl BrushColor {
    pub const BLACK: Self = Self([0, 0, 0, u8::MAX]);

    pub fn from_color32(color: Color32) -> Self {
        Self(color.to_srgba_unmultiplied())
    }

    pub fn color32(&self) -> Color32 {
        let [r, g, b, a] = self.0;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    /// Unmultiplied sRGBA channels
    pub fn rgba(&self) -> [u8; 4] {
        self.0
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when the color is not opaque
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == u8::MAX {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Default for BrushColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for BrushColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for BrushColor {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnnotatorError::InvalidColor(s.to_owned());

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        // A single nibble expands to a full byte: `f` -> `ff`
        let short = |i: usize| {
            u8::from_str_radix(&hex[i..=i], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };

        let [r, g, b, a] = match hex.len() {
            3 => [short(0)?, short(1)?, short(2)?, u8::MAX],
            6 => [channel(0)?, channel(2)?, channel(4)?, u8::MAX],
            8 => [channel(0)?, channel(2)?, channel(4)?, channel(6)?],
            _ => return Err(invalid()),
        };

        Ok(Self([r, g, b, a]))
    }
}

/// Current brush color and width, read on every rendered segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    color: BrushColor,
    line_width: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: BrushColor::default(),
            line_width: *LINE_WIDTH_RANGE.start(),
        }
    }
}

impl BrushSettings {
    pub fn new(color: BrushColor, line_width: f32) -> AnnotatorResult<Self> {
        let mut settings = Self {
            color,
            ..Self::default()
        };
        settings.set_line_width(line_width)?;
        Ok(settings)
    }

    pub fn color(&self) -> BrushColor {
        self.color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_color(&mut self, color: BrushColor) {
        self.color = color;
    }

    /// Parse and store a hex color, keeping the old one on failure
    pub fn set_color_hex(&mut self, hex: &str) -> AnnotatorResult<()> {
        self.color = hex.parse()?;
        Ok(())
    }

    /// Store a new width. Values outside [1, 10] (and NaN) are rejected.
    pub fn set_line_width(&mut self, width: f32) -> AnnotatorResult<()> {
        if !LINE_WIDTH_RANGE.contains(&width) {
            return Err(AnnotatorError::LineWidthOutOfRange(width));
        }
        self.line_width = width;
        Ok(())
    }

    /// Same as [`Self::set_line_width`] for text coming from an input field
    pub fn set_line_width_str(&mut self, text: &str) -> AnnotatorResult<()> {
        let width = text
            .trim()
            .parse::<f32>()
            .map_err(|_| AnnotatorError::NonNumericLineWidth(text.to_owned()))?;
        self.set_line_width(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        let short: BrushColor = "#000".parse().unwrap();
        assert_eq!(short, BrushColor::BLACK);

        let long: BrushColor = "#1E90FF".parse().unwrap();
        assert_eq!(long.rgba(), [0x1e, 0x90, 0xff, 0xff]);
        assert_eq!(long.color32(), Color32::from_rgb(0x1e, 0x90, 0xff));
        assert_eq!(long.to_hex(), "#1e90ff");

        let with_alpha: BrushColor = "#ff000080".parse().unwrap();
        assert_eq!(with_alpha.to_hex(), "#ff000080");

        let expanded: BrushColor = "#f0a".parse().unwrap();
        assert_eq!(expanded.to_hex(), "#ff00aa");
    }

    #[test]
    fn test_reject_bad_colors() {
        for bad in ["", "000000", "#12", "#12345", "#gggggg", "red", "#ff00ff0", "#ü12"] {
            assert!(bad.parse::<BrushColor>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut settings = BrushSettings::default();
        settings.set_color_hex("#00ff00").unwrap();
        assert!(settings.set_color_hex("not a color").is_err());
        assert_eq!(settings.color().to_hex(), "#00ff00");
    }

    #[test]
    fn test_line_width_bounds_are_inclusive() {
        let mut settings = BrushSettings::default();
        assert!(settings.set_line_width(1.0).is_ok());
        assert!(settings.set_line_width(10.0).is_ok());
        assert_eq!(settings.line_width(), 10.0);
    }

    #[test]
    fn test_line_width_rejects_out_of_range() {
        let mut settings = BrushSettings::default();
        settings.set_line_width(5.0).unwrap();

        assert!(matches!(
            settings.set_line_width(0.0),
            Err(AnnotatorError::LineWidthOutOfRange(_))
        ));
        assert!(settings.set_line_width(10.5).is_err());
        assert!(settings.set_line_width(-3.0).is_err());
        assert!(settings.set_line_width(f32::NAN).is_err());
        assert_eq!(settings.line_width(), 5.0);
    }

    #[test]
    fn test_line_width_from_text() {
        let mut settings = BrushSettings::default();
        settings.set_line_width_str(" 7 ").unwrap();
        assert_eq!(settings.line_width(), 7.0);

        assert!(matches!(
            settings.set_line_width_str("seven"),
            Err(AnnotatorError::NonNumericLineWidth(_))
        ));
        assert!(settings.set_line_width_str("").is_err());
        assert!(settings.set_line_width_str("11").is_err());
        assert_eq!(settings.line_width(), 7.0);
    }

    #[test]
    fn test_new_validates_width() {
        assert!(BrushSettings::new(BrushColor::BLACK, 0.5).is_err());
        let settings = BrushSettings::new(BrushColor::BLACK, 3.0).unwrap();
        assert_eq!(settings.line_width(), 3.0);
    }
}

use plotters::style::RGBColor;

use crate::data::record::Kth;

pub const INDIAN_RED: RGBColor = RGBColor(205, 92, 92);
pub const REBECCA_PURPLE: RGBColor = RGBColor(102, 51, 153);
pub const TEAL: RGBColor = RGBColor(0, 128, 128);
pub const DARK_GOLDENROD: RGBColor = RGBColor(184, 134, 11);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Cross,
    Plus,
}

/// Fixed color and marker per kth, identical in every panel.
pub fn kth_style(kth: Kth) -> (RGBColor, MarkerShape) {
    match kth {
        Kth::First => (INDIAN_RED, MarkerShape::Circle),
        Kth::P25 => (REBECCA_PURPLE, MarkerShape::Cross),
        Kth::Median => (TEAL, MarkerShape::Plus),
    }
}

/// Color of the category-independent expected line.
pub const EXPECTED_COLOR: RGBColor = DARK_GOLDENROD;

/// Figure geometry and stroke settings.
///
/// Sizes are expressed for an 800px reference height and scaled to the
/// actual pixel height, so an 8x8 inch figure at 300 DPI keeps the
/// proportions of the 100 DPI one.
#[derive(Clone, Debug, PartialEq)]
pub struct FigureStyle {
    pub width_px: u32,
    pub height_px: u32,
    pub instance_alpha: f64,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width_px: 2400,
            height_px: 2400,
            instance_alpha: 0.5,
        }
    }
}

impl FigureStyle {
    fn scale(&self) -> f64 {
        self.height_px as f64 / 800.0
    }

    pub(crate) fn px(&self, reference: f64) -> u32 {
        (reference * self.scale()).round().max(1.0) as u32
    }

    pub(crate) fn font(&self, reference: f64) -> f64 {
        reference * self.scale()
    }

    pub(crate) fn marker_size(&self) -> u32 {
        self.px(3.0)
    }

    pub(crate) fn line_width(&self) -> u32 {
        self.px(2.0)
    }
}

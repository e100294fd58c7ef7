use crate::classifier::StressLevel;
use plotters::style::RGBColor;

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Fill for cells whose correlation is undefined.
pub const UNDEFINED: RGBColor = RGBColor(245, 245, 245);

pub fn level_color(level: StressLevel) -> RGBColor {
    match level {
        StressLevel::High => RGBColor(214, 39, 40),
        StressLevel::Medium => RGBColor(255, 127, 14),
        StressLevel::Low => RGBColor(44, 160, 44),
    }
}

/// Diverging blue-white-red map over [-1, 1]; values outside are clamped.
pub fn coolwarm(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COOL, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Dark text on light cells, light text on saturated ones.
pub fn annotation_color(value: f64) -> RGBColor {
    if value.abs() > 0.6 {
        RGBColor(255, 255, 255)
    } else {
        RGBColor(20, 20, 20)
    }
}

//! Colour conversion for ASS override tags
//!
//! ASS colours are written blue first (`&HBBGGRR&`). Renderers treat HD
//! material as BT.709 while comment colours are authored as BT.601, so on
//! large stages the colour is moved into BT.709 primaries to look the same as
//! in the platform's player.

use crate::comment::Rgb;

/// Stages at least this wide are treated as HD
pub const HD_MIN_WIDTH: u32 = 1280;
/// Stages at least this tall are treated as HD
pub const HD_MIN_HEIGHT: u32 = 576;

/// Colour as the six hex digits of an ASS colour (`BBGGRR`)
#[must_use]
#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
pub fn ass_color(color: Rgb, stage_width: u32, stage_height: u32) -> String {
    if color == Rgb::BLACK {
        return "000000".to_string();
    }
    if color == Rgb::WHITE {
        return "FFFFFF".to_string();
    }

    let (r, g, b) = (
        f64::from(color.red()),
        f64::from(color.green()),
        f64::from(color.blue()),
    );
    if stage_width < HD_MIN_WIDTH && stage_height < HD_MIN_HEIGHT {
        return format!("{:02X}{:02X}{:02X}", color.blue(), color.green(), color.red());
    }

    let blue = clip_byte(
        r * 0.00956384088080656 + g * 0.03217254540203729 + b * 0.95826361371715607,
    );
    let green = clip_byte(
        r * -0.10493933142075390 + g * 1.17231478191855154 + b * -0.06737545049779757,
    );
    let red = clip_byte(
        r * 0.91348912373987645 + g * 0.07858536372532510 + b * 0.00792551253479842,
    );
    format!("{blue:02X}{green:02X}{red:02X}")
}

fn clip_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

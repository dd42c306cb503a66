//! Projection of positioned comments onto the stage
//!
//! Positioned comments were authored against a fixed size Flash player. Their
//! coordinates are scaled onto the stage with aspect-fit letterboxing, and the
//! player's 3D rotation model is approximated with ASS rotation and scale.

use crate::comment::{PlayerCoord, PositionedPath};
use std::f64::consts::PI;

/// Size of the player positioned comments were authored for
pub const REFERENCE_PLAYER: (f64, f64) = (672.0, 438.0);

/// Uniform scale plus letterbox offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFactor {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ZoomFactor {
    /// Fit `source` inside `target`, centring along the spare axis
    #[must_use]
    pub fn fit(source: (f64, f64), target: (f64, f64)) -> Self {
        if source.0 <= 0.0 || source.1 <= 0.0 || target.0 <= 0.0 || target.1 <= 0.0 {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }
        let source_aspect = source.0 / source.1;
        let target_aspect = target.0 / target.1;
        if target_aspect < source_aspect {
            Self {
                scale: target.0 / source.0,
                offset_x: 0.0,
                offset_y: (target.1 - target.0 / source_aspect) / 2.0,
            }
        } else if target_aspect > source_aspect {
            Self {
                scale: target.1 / source.1,
                offset_x: (target.0 - target.1 * source_aspect) / 2.0,
                offset_y: 0.0,
            }
        } else {
            Self {
                scale: target.0 / source.0,
                offset_x: 0.0,
                offset_y: 0.0,
            }
        }
    }

    #[must_use]
    pub fn project_x(&self, coord: PlayerCoord) -> f64 {
        self.project(coord, REFERENCE_PLAYER.0) + self.offset_x
    }

    #[must_use]
    pub fn project_y(&self, coord: PlayerCoord) -> f64 {
        self.project(coord, REFERENCE_PLAYER.1) + self.offset_y
    }

    fn project(&self, coord: PlayerCoord, player_dimension: f64) -> f64 {
        match coord {
            PlayerCoord::Pixels(px) => self.scale * px,
            PlayerCoord::Fraction(f) => player_dimension * self.scale * f,
        }
    }
}

/// A stage position with the ASS rotation and scale that imitate the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashProjection {
    pub x: f64,
    pub y: f64,
    pub rot_x: f64,
    pub rot_y: f64,
    pub rot_z: f64,
    /// Percent
    pub scale_x: f64,
    /// Percent
    pub scale_y: f64,
}

/// Wrap degrees into (-180, 180]
fn wrap_angle(deg: f64) -> f64 {
    180.0 - (180.0 - deg).rem_euclid(360.0)
}

/// Map a point rotated by the player's Y/Z rotation onto ASS rotations
///
/// The player rotates about the stage centre with a perspective camera; the
/// perspective is reduced to a uniform scale around the centre.
#[must_use]
pub fn convert_flash_rotation(
    rot_y: f64,
    rot_z: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> FlashProjection {
    let mut rot_y = wrap_angle(rot_y);
    let rot_z = wrap_angle(rot_z);
    // avoid a division by cos(90)
    if rot_y == 90.0 || rot_y == -90.0 {
        rot_y -= 1.0;
    }

    let (mut out_x, mut out_y, out_z);
    let rad_y = rot_y.to_radians();
    let rad_z = rot_z.to_radians();
    if rot_y == 0.0 || rot_z == 0.0 {
        out_x = 0.0;
        out_y = -rot_y;
        out_z = -rot_z;
    } else {
        out_y = (-rad_y.sin() * rad_z.cos()).atan2(rad_y.cos()).to_degrees();
        out_z = (-rad_y.cos() * rad_z.sin()).atan2(rad_z.cos()).to_degrees();
        out_x = (rad_y.sin() * rad_z.sin()).asin().to_degrees();
    }

    let (sin_y, cos_y) = rad_y.sin_cos();
    let (sin_z, cos_z) = rad_z.sin_cos();
    let tr_x = (x * cos_z + y * sin_z) / cos_y + (1.0 - cos_z / cos_y) * width / 2.0
        - sin_z / cos_y * height / 2.0;
    let tr_y =
        y * cos_z - x * sin_z + sin_z * width / 2.0 + (1.0 - cos_z) * height / 2.0;
    let tr_z = (tr_x - width / 2.0) * sin_y;

    let fov = width * (2.0 * PI / 9.0).tan() / 2.0;
    let mut scale = if (fov + tr_z).abs() < f64::EPSILON {
        tracing::warn!(tr_z, "rotation puts text at the camera plane");
        1.0
    } else {
        fov / (fov + tr_z)
    };
    let tr_x = (tr_x - width / 2.0) * scale + width / 2.0;
    let tr_y = (tr_y - height / 2.0) * scale + height / 2.0;
    if scale < 0.0 {
        tracing::warn!(tr_z, fov, "rotation puts text behind the camera");
        scale = -scale;
        out_x += 180.0;
        out_y += 180.0;
    }

    FlashProjection {
        x: tr_x,
        y: tr_y,
        rot_x: wrap_angle(out_x),
        rot_y: wrap_angle(out_y),
        rot_z: wrap_angle(out_z),
        scale_x: scale * 100.0,
        scale_y: scale * 100.0,
    }
}

/// A positioned comment fully resolved into stage coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub from: FlashProjection,
    pub to: FlashProjection,
    /// Whether the unrotated position changes over time
    pub moves: bool,
    pub delay_ms: i64,
    pub move_ms: i64,
    /// Seconds on screen
    pub lifetime: f64,
    /// ASS alpha bytes (0 = opaque) at start and end
    pub alpha: (u8, u8),
    /// Font size on the stage
    pub font_size: f64,
    pub border: bool,
    pub font: Option<String>,
}

impl ResolvedPath {
    /// Project `path` onto a stage of `stage` pixels
    #[must_use]
    pub fn resolve(path: &PositionedPath, font_size: f64, stage: (f64, f64)) -> Self {
        let zoom = ZoomFactor::fit(REFERENCE_PLAYER, stage);
        let from_x = zoom.project_x(path.from.0);
        let from_y = zoom.project_y(path.from.1);
        let to_x = zoom.project_x(path.to.0);
        let to_y = zoom.project_y(path.to.1);
        let rot_y = f64::from(path.rotate_y);
        let rot_z = f64::from(path.rotate_z);

        Self {
            from: convert_flash_rotation(rot_y, rot_z, from_x, from_y, stage.0, stage.1),
            to: convert_flash_rotation(rot_y, rot_z, to_x, to_y, stage.0, stage.1),
            moves: from_x != to_x || from_y != to_y,
            delay_ms: path.delay_ms,
            move_ms: path.move_ms,
            lifetime: path.lifetime,
            alpha: (opacity_to_alpha(path.opacity.0), opacity_to_alpha(path.opacity.1)),
            font_size: font_size * zoom.scale,
            border: path.border,
            font: path.font.clone(),
        }
    }
}

fn opacity_to_alpha(opacity: f64) -> u8 {
    255 - (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

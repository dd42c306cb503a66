//! Positioned (mode 7) comment payloads
//!
//! The text of a positioned comment is itself a JSON array describing where
//! the text appears and how it moves:
//!
//! ```text
//! [x0, y0, "a0-a1", lifetime, text, rot_z, rot_y, x1, y1, move_ms, delay_ms, border, font]
//! ```
//!
//! Only the first five elements are required. Coordinates refer to the
//! platform's own player, see [`PlayerCoord`].

use super::escape::decode_newlines;
use serde_json::Value;

/// Lifetime used when a payload omits it, in seconds
pub const DEFAULT_LIFETIME: f64 = 4.5;

/// Upper bound for motion duration and delay, in milliseconds (one day)
pub const MAX_MOTION_MS: i64 = 86_400_000;

/// A coordinate inside the reference player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCoord {
    /// Absolute pixels
    Pixels(f64),
    /// Fraction of the player dimension (0.0-1.0)
    Fraction(f64),
}

impl PlayerCoord {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                Ok(Self::Pixels(n.as_f64().unwrap_or_default()))
            }
            Value::Number(n) => n
                .as_f64()
                .map(Self::from_float)
                .ok_or_else(|| format!("coordinate out of range: {n}")),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(int) = s.parse::<i64>() {
                    Ok(Self::Pixels(int as f64))
                } else {
                    s.parse::<f64>()
                        .map(Self::from_float)
                        .map_err(|_| format!("coordinate is not a number: {s:?}"))
                }
            }
            other => Err(format!("coordinate has unexpected type: {other}")),
        }
    }

    fn from_float(value: f64) -> Self {
        if value > 1.0 {
            Self::Pixels(value)
        } else {
            Self::Fraction(value)
        }
    }
}

/// Decoded motion path of a positioned comment
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedPath {
    pub from: (PlayerCoord, PlayerCoord),
    pub to: (PlayerCoord, PlayerCoord),
    /// Opacity at the start and end (1.0 = opaque)
    pub opacity: (f64, f64),
    /// Seconds on screen
    pub lifetime: f64,
    /// Decoded text, newlines as `\n`, not yet escaped for ASS
    pub text: String,
    pub rotate_z: i32,
    pub rotate_y: i32,
    /// Duration of the movement in milliseconds, within `0..=MAX_MOTION_MS`
    pub move_ms: i64,
    /// Delay before the movement starts in milliseconds, within `0..=MAX_MOTION_MS`
    pub delay_ms: i64,
    pub border: bool,
    pub font: Option<String>,
}

impl PositionedPath {
    /// Decode a payload from comment text
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem when the payload is not a
    /// JSON array or a required element is missing or unreadable.
    pub fn parse(payload: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| format!("payload is not JSON: {e}"))?;
        let args = value
            .as_array()
            .ok_or_else(|| "payload is not a JSON array".to_string())?;
        if args.len() < 5 {
            return Err(format!("payload has {} elements, need 5", args.len()));
        }

        let from_x = PlayerCoord::from_value(&args[0])?;
        let from_y = PlayerCoord::from_value(&args[1])?;
        let to_x = args
            .get(7)
            .map_or(Ok(from_x), PlayerCoord::from_value)?;
        let to_y = args
            .get(8)
            .map_or(Ok(from_y), PlayerCoord::from_value)?;

        let opacity = parse_opacity(args.get(2))?;
        let lifetime = args
            .get(3)
            .map_or(Ok(DEFAULT_LIFETIME), |v| float_arg(v, "lifetime"))?;
        let text = decode_newlines(&string_arg(&args[4])).into_owned();
        let rotate_z = args.get(5).map_or(Ok(0), |v| int_arg(v, "rotate_z"))? as i32;
        let rotate_y = args.get(6).map_or(Ok(0), |v| int_arg(v, "rotate_y"))? as i32;
        let move_ms = args
            .get(9)
            .map_or(Ok((lifetime * 1000.0) as i64), |v| int_arg(v, "move_ms"))?
            .clamp(0, MAX_MOTION_MS);
        let delay_ms = args
            .get(10)
            .map_or(Ok(0), |v| int_arg(v, "delay_ms"))?
            .clamp(0, MAX_MOTION_MS);
        let border = !matches!(args.get(11), Some(Value::Bool(false)))
            && args.get(11).and_then(Value::as_str) != Some("false");
        let font = args
            .get(12)
            .map(string_arg)
            .filter(|f| !f.is_empty() && f != "null");

        Ok(Self {
            from: (from_x, from_y),
            to: (to_x, to_y),
            opacity,
            lifetime,
            text,
            rotate_z,
            rotate_y,
            move_ms,
            delay_ms,
            border,
            font,
        })
    }
}

fn string_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn float_arg(value: &Value, name: &str) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed
        .filter(|f: &f64| f.is_finite())
        .ok_or_else(|| format!("{name} is not a number: {value}"))
}

fn int_arg(value: &Value, name: &str) -> Result<i64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| format!("{name} is not an integer: {value}"))
}

fn parse_opacity(value: Option<&Value>) -> Result<(f64, f64), String> {
    let raw = value.map_or_else(|| "1".to_string(), string_arg);
    let mut parts = raw.split('-');
    let from = parts
        .next()
        .unwrap_or("1")
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("alpha is not a number: {raw:?}"))?;
    let to = match parts.next() {
        Some(part) => part
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("alpha is not a number: {raw:?}"))?,
        None => from,
    };
    Ok((from, to))
}

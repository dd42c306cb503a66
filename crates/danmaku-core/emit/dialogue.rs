//! `Dialogue:` lines for placed comments

use super::color::ass_color;
use crate::comment::{Comment, Rgb};
use crate::config::CanvasConfig;
use crate::layout::{Edge, PlacedComment, ResolvedPath, Trajectory};
use crate::utils::format_timestamp;
use core::fmt::Write as _;

/// Layer of lane-based comments
pub const LANE_LAYER: i32 = 2;
/// Layer of positioned comments, drawn beneath everything else
pub const POSITIONED_LAYER: i32 = -1;

bitflags::bitflags! {
    /// Inline overrides a comment needs on top of the base style
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Overrides: u8 {
        /// Font size differs from the style by at least one pixel
        const FONT_SIZE = 1 << 0;
        /// Text colour is not white
        const COLOR = 1 << 1;
        /// Black text gets a white outline to stay readable
        const OUTLINE_COLOR = 1 << 2;
    }
}

impl Overrides {
    /// Overrides needed by `comment` against a style of `base_font_size`
    #[must_use]
    pub fn for_comment(comment: &Comment, base_font_size: f64) -> Self {
        let mut flags = Self::empty();
        if (comment.font_size - base_font_size).abs() >= 1.0 {
            flags |= Self::FONT_SIZE;
        }
        flags |= Self::color_flags(comment.color);
        flags
    }

    fn color_flags(color: Rgb) -> Self {
        if color == Rgb::WHITE {
            Self::empty()
        } else if color == Rgb::BLACK {
            Self::COLOR | Self::OUTLINE_COLOR
        } else {
            Self::COLOR
        }
    }
}

/// Builder for one `Dialogue:` line
#[derive(Debug, Default, Clone)]
pub struct DialogueBuilder<'a> {
    layer: i32,
    start: Option<&'a str>,
    end: Option<&'a str>,
    style: Option<&'a str>,
    tags: String,
    text: Option<&'a str>,
}

impl<'a> DialogueBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layer (higher layers render on top)
    pub fn layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Set start and end times (`H:MM:SS.cc`)
    pub fn times(mut self, start: &'a str, end: &'a str) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set style name
    pub fn style(mut self, style: &'a str) -> Self {
        self.style = Some(style);
        self
    }

    /// Set override tags, written as one `{...}` block before the text
    pub fn tags(mut self, tags: String) -> Self {
        self.tags = tags;
        self
    }

    /// Set escaped dialogue text
    pub fn text(mut self, text: &'a str) -> Self {
        self.text = Some(text);
        self
    }

    /// Build the event line, without a trailing newline
    pub fn build(&self) -> String {
        let layer = self.layer;
        let start = self.start.unwrap_or("0:00:00.00");
        let end = self.end.unwrap_or("0:00:05.00");
        let style = self.style.unwrap_or("Default");
        let text = self.text.unwrap_or("");
        if self.tags.is_empty() {
            format!("Dialogue: {layer},{start},{end},{style},,0,0,0,,{text}")
        } else {
            let tags = &self.tags;
            format!("Dialogue: {layer},{start},{end},{style},,0,0,0,,{{{tags}}}{text}")
        }
    }
}

/// Render the event line of a placed comment
#[must_use]
pub fn dialogue_line(placed: &PlacedComment<'_>, config: &CanvasConfig) -> String {
    let comment = placed.comment;
    let (layer, tags) = match &placed.trajectory {
        Trajectory::Positioned(path) => (POSITIONED_LAYER, positioned_tags(comment, path, config)),
        trajectory => (LANE_LAYER, lane_tags(comment, trajectory, config)),
    };
    let start = format_timestamp(placed.start);
    let end = format_timestamp(placed.end);
    DialogueBuilder::new()
        .layer(layer)
        .times(&start, &end)
        .style(&config.style_name)
        .tags(tags)
        .text(&comment.text)
        .build()
}

fn lane_tags(comment: &Comment, trajectory: &Trajectory, config: &CanvasConfig) -> String {
    let mut tags = String::new();
    match *trajectory {
        Trajectory::Anchored { x, y, edge } => {
            let align = match edge {
                Edge::Top => 8,
                Edge::Bottom => 2,
            };
            let _ = write!(tags, "\\an{align}\\pos({x:.0}, {y:.0})");
        }
        Trajectory::Scroll { from_x, to_x, y } => {
            let _ = write!(tags, "\\move({from_x:.0}, {y:.0}, {to_x:.0}, {y:.0})");
        }
        Trajectory::Positioned(_) => {}
    }

    let overrides = Overrides::for_comment(comment, config.font_size);
    if overrides.contains(Overrides::FONT_SIZE) {
        let _ = write!(tags, "\\fs{:.0}", comment.font_size);
    }
    push_color_tags(&mut tags, comment.color, overrides, config);
    tags
}

fn push_color_tags(tags: &mut String, color: Rgb, overrides: Overrides, config: &CanvasConfig) {
    if overrides.contains(Overrides::COLOR) {
        let _ = write!(
            tags,
            "\\c&H{}&",
            ass_color(color, config.width, config.height)
        );
    }
    if overrides.contains(Overrides::OUTLINE_COLOR) {
        tags.push_str("\\3c&HFFFFFF&");
    }
}

fn positioned_tags(comment: &Comment, path: &ResolvedPath, config: &CanvasConfig) -> String {
    let (from, to) = (&path.from, &path.to);
    let delay = path.delay_ms;
    let until = path.delay_ms.saturating_add(path.move_ms);
    let mut tags = String::new();

    let _ = write!(tags, "\\org({}, {})", config.width / 2, config.height / 2);
    if from.x == to.x && from.y == to.y {
        let _ = write!(tags, "\\pos({:.0}, {:.0})", from.x, from.y);
    } else {
        let _ = write!(
            tags,
            "\\move({:.0}, {:.0}, {:.0}, {:.0}, {delay}, {until})",
            from.x, from.y, to.x, to.y
        );
    }
    let _ = write!(
        tags,
        "\\frx{:.0}\\fry{:.0}\\frz{:.0}\\fscx{:.0}\\fscy{:.0}",
        from.rot_x, from.rot_y, from.rot_z, from.scale_x, from.scale_y
    );
    if path.moves {
        let _ = write!(
            tags,
            "\\t({delay}, {until}, \\frx{:.0}\\fry{:.0}\\frz{:.0}\\fscx{:.0}\\fscy{:.0})",
            to.rot_x, to.rot_y, to.rot_z, to.scale_x, to.scale_y
        );
    }
    if let Some(font) = &path.font {
        let _ = write!(tags, "\\fn{}", escape_tag_argument(font));
    }
    let _ = write!(tags, "\\fs{:.0}", path.font_size);
    push_color_tags(
        &mut tags,
        comment.color,
        Overrides::color_flags(comment.color),
        config,
    );

    let lifetime_ms = path.lifetime * 1000.0;
    match path.alpha {
        (from_alpha, to_alpha) if from_alpha == to_alpha => {
            let _ = write!(tags, "\\alpha&H{from_alpha:02X}");
        }
        (255, 0) => {
            let _ = write!(tags, "\\fad({lifetime_ms:.0},0)");
        }
        (0, 255) => {
            let _ = write!(tags, "\\fad(0, {lifetime_ms:.0})");
        }
        (from_alpha, to_alpha) => {
            let _ = write!(
                tags,
                "\\fade({from_alpha}, {to_alpha}, {to_alpha}, 0, {lifetime_ms:.0}, {lifetime_ms:.0}, {lifetime_ms:.0})"
            );
        }
    }
    if !path.border {
        tags.push_str("\\bord0");
    }
    tags
}

/// Font names end at the override block; drop characters that would break it
fn escape_tag_argument(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\\' | '{' | '}' | '\n'))
        .collect()
}

//! `[Script Info]` and `[V4+ Styles]` sections

use crate::config::CanvasConfig;
use crate::utils::{CoreError, Result};
use core::fmt::Write as _;

/// Field order of every style line written by this crate
pub const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Field order of every event line written by this crate
pub const EVENT_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Builder for the `[Script Info]` section
#[derive(Debug, Default, Clone)]
pub struct ScriptInfo {
    comments: Vec<String>,
    fields: Vec<(String, String)>,
}

impl ScriptInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `; comment` line, written before any field
    pub fn comment(mut self, text: &str) -> Self {
        self.comments.push(text.to_string());
        self
    }

    /// Add a `Key: value` field
    pub fn field<V: ToString>(mut self, key: &str, value: V) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    /// Set `PlayResX`, `PlayResY` and the matching aspect ratio
    pub fn play_res(self, width: u32, height: u32) -> Self {
        self.field("PlayResX", width)
            .field("PlayResY", height)
            .field("Aspect Ratio", format!("{width}:{height}"))
    }

    /// Render the section, terminated by a blank line
    pub fn build(&self) -> String {
        let mut out = String::from("[Script Info]\n");
        for comment in &self.comments {
            let _ = writeln!(out, "; {comment}");
        }
        for (key, value) in &self.fields {
            let _ = writeln!(out, "{key}: {value}");
        }
        out.push('\n');
        out
    }
}

/// Builder for a single `Style:` line
#[derive(Debug, Default, Clone)]
pub struct StyleBuilder {
    name: Option<String>,
    fontname: Option<String>,
    fontsize: Option<f64>,
    primary_colour: Option<String>,
    secondary_colour: Option<String>,
    outline_colour: Option<String>,
    back_colour: Option<String>,
    bold: bool,
    italic: bool,
    border_style: Option<u32>,
    outline: Option<f64>,
    shadow: Option<f64>,
    alignment: Option<u32>,
    margin_l: u32,
    margin_r: u32,
    margin_v: u32,
    encoding: u32,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set style name
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set font face and size
    pub fn font(mut self, font: &str, size: f64) -> Self {
        self.fontname = Some(font.to_string());
        self.fontsize = Some(size);
        self
    }

    /// Set primary text colour (`&HAABBGGRR`)
    pub fn color(mut self, color: &str) -> Self {
        self.primary_colour = Some(color.to_string());
        self
    }

    /// Set secondary (karaoke) colour
    pub fn secondary_color(mut self, color: &str) -> Self {
        self.secondary_colour = Some(color.to_string());
        self
    }

    /// Set outline colour
    pub fn outline_color(mut self, color: &str) -> Self {
        self.outline_colour = Some(color.to_string());
        self
    }

    /// Set shadow/background colour
    pub fn back_color(mut self, color: &str) -> Self {
        self.back_colour = Some(color.to_string());
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set border style (1=outline+shadow, 3=opaque box)
    pub fn border_style(mut self, style: u32) -> Self {
        self.border_style = Some(style);
        self
    }

    /// Set outline and shadow widths in pixels
    pub fn outline(mut self, outline: f64, shadow: f64) -> Self {
        self.outline = Some(outline);
        self.shadow = Some(shadow);
        self
    }

    /// Set alignment (1-9, numpad style)
    pub fn align(mut self, alignment: u32) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set left, right and vertical margins
    pub fn margins(mut self, left: u32, right: u32, vertical: u32) -> Self {
        self.margin_l = left;
        self.margin_r = right;
        self.margin_v = vertical;
        self
    }

    /// Set font encoding (1 = default)
    pub fn encoding(mut self, encoding: u32) -> Self {
        self.encoding = encoding;
        self
    }

    /// Build the style line
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] when the name is missing or a text field
    /// contains a comma, which would shift every following field.
    pub fn build(&self) -> Result<String> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| CoreError::config("style name is required"))?;
        let fontname = self.fontname.as_deref().unwrap_or("Arial");
        if name.contains(',') || fontname.contains(',') {
            return Err(CoreError::config(format!(
                "style name and font must not contain commas: {name:?}, {fontname:?}"
            )));
        }

        let fontsize = self.fontsize.unwrap_or(20.0);
        let primary = self.primary_colour.as_deref().unwrap_or("&H00FFFFFF");
        let secondary = self.secondary_colour.as_deref().unwrap_or("&H000000FF");
        let outline_colour = self.outline_colour.as_deref().unwrap_or("&H00000000");
        let back = self.back_colour.as_deref().unwrap_or("&H00000000");
        let bold = if self.bold { -1 } else { 0 };
        let italic = if self.italic { -1 } else { 0 };
        let border_style = self.border_style.unwrap_or(1);
        let outline = self.outline.unwrap_or(2.0);
        let shadow = self.shadow.unwrap_or(0.0);
        let alignment = self.alignment.unwrap_or(2);
        let (margin_l, margin_r, margin_v) = (self.margin_l, self.margin_r, self.margin_v);
        let encoding = self.encoding;

        Ok(format!(
            "Style: {name},{fontname},{fontsize:.0},{primary},{secondary},{outline_colour},{back},{bold},{italic},0,0,100,100,0.00,0.00,{border_style},{outline:.0},{shadow:.0},{alignment},{margin_l},{margin_r},{margin_v},{encoding}"
        ))
    }
}

/// Full header for a danmaku conversion: script info, the comment style and
/// the events format line
///
/// # Errors
///
/// Returns [`CoreError::Config`] when the style cannot be written.
pub fn danmaku_header(config: &CanvasConfig) -> Result<String> {
    let alpha = config.alpha_byte();
    let outline = (config.font_size / 25.0).max(1.0);
    let style = StyleBuilder::new()
        .name(&config.style_name)
        .font(&config.font_name, config.font_size)
        .color(&format!("&H{alpha:02X}FFFFFF"))
        .secondary_color(&format!("&H{alpha:02X}FFFFFF"))
        .outline_color(&format!("&H{alpha:02X}000000"))
        .back_color(&format!("&H{alpha:02X}000000"))
        .outline(outline, 0.0)
        .align(7)
        .build()?;

    let mut out = ScriptInfo::new()
        .comment("Script generated by danmaku-ass")
        .field("ScriptType", "v4.00+")
        .play_res(config.width, config.height)
        .field("Collisions", "Normal")
        .field("WrapStyle", 2)
        .field("ScaledBorderAndShadow", "yes")
        .field("YCbCr Matrix", "TV.601")
        .build();
    out.push_str("[V4+ Styles]\n");
    out.push_str(STYLE_FORMAT);
    out.push('\n');
    out.push_str(&style);
    out.push_str("\n\n[Events]\n");
    out.push_str(EVENT_FORMAT);
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn danmaku_header_layout() {
        let config = CanvasConfig::new(1920, 1080).with_opacity(0.8);
        let header = danmaku_header(&config).unwrap();
        let expected = "[Script Info]\n\
            ; Script generated by danmaku-ass\n\
            ScriptType: v4.00+\n\
            PlayResX: 1920\n\
            PlayResY: 1080\n\
            Aspect Ratio: 1920:1080\n\
            Collisions: Normal\n\
            WrapStyle: 2\n\
            ScaledBorderAndShadow: yes\n\
            YCbCr Matrix: TV.601\n\
            \n\
            [V4+ Styles]\n";
        assert!(header.starts_with(expected));
        assert!(header.contains(
            "Style: Danmaku,Simsun,25,&H33FFFFFF,&H33FFFFFF,&H33000000,&H33000000,0,0,0,0,100,100,0.00,0.00,1,1,0,7,0,0,0,0\n"
        ));
        assert!(header.ends_with(&format!("[Events]\n{EVENT_FORMAT}\n")));
    }

    #[test]
    fn outline_scales_with_font() {
        let config = CanvasConfig::new(1920, 1080).with_font("Noto Sans", 50.0);
        let header = danmaku_header(&config).unwrap();
        assert!(header.contains("Style: Danmaku,Noto Sans,50,&H00FFFFFF"));
        assert!(header.contains(",1,2,0,7,0,0,0,0\n"));
    }

    #[test]
    fn style_requires_name() {
        assert!(StyleBuilder::new().build().is_err());
        assert!(StyleBuilder::new().name("a,b").build().is_err());
        let line = StyleBuilder::new()
            .name("Default")
            .font("Arial", 48.0)
            .bold(true)
            .margins(10, 10, 20)
            .encoding(1)
            .build()
            .unwrap();
        assert_eq!(
            line,
            "Style: Default,Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,-1,0,0,0,100,100,0.00,0.00,1,2,0,2,10,10,20,1"
        );
    }
}

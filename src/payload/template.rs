use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::core::Fps;
use crate::frame::video::FrameInfo;

/// Payload layout of the original element: one `key=value` line per field.
pub const LEGACY_TEMPLATE: &str =
    "clock=%c\ntimestamp=%t\nframe=%n\nwidth=%w\nheight=%h\nfps=%r\nformat=%f\n";

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "%t";

/// Per-frame values available to payload templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataSnapshot {
    /// Wall-clock time in microseconds since the Unix epoch.
    pub clock_us: u64,
    /// Presentation timestamp in microseconds.
    pub pts_us: u64,
    /// Monotonically increasing frame sequence number.
    pub frame_number: u64,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

impl MetadataSnapshot {
    /// Snapshot `info` together with the current wall-clock time.
    pub fn capture(info: &FrameInfo, pts_us: u64, frame_number: u64, fps: Fps) -> Self {
        let clock_us = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self {
            clock_us,
            pts_us,
            frame_number,
            format: info.format_name.clone(),
            width: info.width,
            height: info.height,
            fps,
        }
    }
}

/// A metadata field addressed by a `%` escape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Clock,
    Pts,
    FrameNumber,
    Format,
    Width,
    Height,
    Framerate,
}

impl Field {
    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'c' => Field::Clock,
            't' => Field::Pts,
            'n' => Field::FrameNumber,
            'f' => Field::Format,
            'w' => Field::Width,
            'h' => Field::Height,
            'r' => Field::Framerate,
            _ => return None,
        })
    }

    fn write(self, out: &mut String, meta: &MetadataSnapshot) {
        // Writing into a String cannot fail.
        let _ = match self {
            Field::Clock => write!(out, "{}", meta.clock_us),
            Field::Pts => write!(out, "{}", meta.pts_us),
            Field::FrameNumber => write!(out, "{}", meta.frame_number),
            Field::Format => write!(out, "{}", meta.format),
            Field::Width => write!(out, "{}", meta.width),
            Field::Height => write!(out, "{}", meta.height),
            Field::Framerate => write!(out, "{:.2}", meta.fps.as_f64()),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// An escape the scanner consumed without output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DroppedEscape {
    /// Byte offset of the `%`.
    pub offset: usize,
    /// The character after `%`, `None` when the template ends with `%`.
    pub code: Option<char>,
}

/// A payload template, scanned once and rendered per frame.
///
/// Literal characters are copied verbatim. `%` followed by one of `c t n f w h r` expands to
/// the matching [`MetadataSnapshot`] field. Any other `%X` pair, and a `%` at the very end,
/// is dropped from the output; see [`Template::dropped`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    dropped: Vec<DroppedEscape>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut dropped = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((offset, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let code = chars.next().map(|(_, code)| code);
            match code.and_then(Field::from_code) {
                Some(field) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                None => dropped.push(DroppedEscape { offset, code }),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: source.to_owned(),
            segments,
            dropped,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Escapes that were consumed without producing output.
    pub fn dropped(&self) -> &[DroppedEscape] {
        &self.dropped
    }

    /// Fields referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(*f),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, meta: &MetadataSnapshot) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(f) => f.write(&mut out, meta),
            }
        }
        out
    }
}

/// Expand `template` against `meta` in one go.
pub fn format_payload(template: &str, meta: &MetadataSnapshot) -> String {
    Template::parse(template).render(meta)
}

#[cfg(test)]
#[path = "../../tests/unit/payload/template.rs"]
mod tests;

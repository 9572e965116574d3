//! JFL parser
//!
//! Line-oriented state machine. Header and other boilerplate lines that do
//! not fit the coordinate grammar are skipped, so files written by other
//! tools load as long as their segments follow the protocol.
//!
//! Rules, checked in order for each trimmed line:
//! 1. a line starting with `*` arms three-coordinate mode; an active
//!    segment switches to `X Z W` records right away
//! 2. a purely alphabetic line opens a segment, consuming an armed marker;
//!    reopening a label clears its records but keeps its position
//! 3. anything else is matched against `X <x> Z <z> [W <w>]`; the first
//!    record after a marker consumes it

use std::sync::OnceLock;

use lensprofile_core::{
    CoordinateKind, NamedPolyline, ProfileDocument, ProtocolFormat, XzPoint, XzwPoint,
    MARKER_PREFIX,
};
use regex::Regex;
use tracing::debug;

fn coordinate_regex() -> &'static Regex {
    static COORD_REGEX: OnceLock<Regex> = OnceLock::new();
    COORD_REGEX.get_or_init(|| {
        Regex::new(r"X\s*([-+]?[\d.]+)\s*Z\s*([-+]?[\d.]+)(?:\s*W\s*([\d.-]+))?")
            .expect("invalid regex pattern")
    })
}

/// One coordinate record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinates {
    Xz(XzPoint),
    Xzw(XzwPoint),
}

impl Coordinates {
    pub fn kind(&self) -> CoordinateKind {
        match self {
            Self::Xz(_) => CoordinateKind::Xz,
            Self::Xzw(_) => CoordinateKind::Xzw,
        }
    }
}

/// Parse a coordinate line, `None` when it does not fit the grammar
pub fn parse_coordinates(line: &str) -> Option<Coordinates> {
    let caps = coordinate_regex().captures(line)?;
    let x = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let z = caps.get(2)?.as_str().parse::<f64>().ok()?;
    match caps.get(3) {
        Some(w) => {
            let w = w.as_str().parse::<f64>().ok()?;
            Some(Coordinates::Xzw(XzwPoint::new(x, z, w)))
        }
        None => Some(Coordinates::Xz(XzPoint::new(x, z))),
    }
}

fn is_label(line: &str) -> bool {
    !line.is_empty() && line.chars().all(char::is_alphabetic)
}

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// No segment opened yet
    #[default]
    Idle,
    /// Collecting records of the given layout for the active segment
    InSegment(CoordinateKind),
}

#[derive(Debug, Default)]
struct SegmentBuffer {
    name: String,
    xz: Vec<XzPoint>,
    xzw: Vec<XzwPoint>,
}

/// Incremental JFL parser
#[derive(Debug, Default)]
pub struct JflParser {
    state: ParserState,
    three_coord_pending: bool,
    active: Option<usize>,
    segments: Vec<SegmentBuffer>,
    skipped_lines: usize,
}

impl JflParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Whether a marker line is waiting for its label
    pub fn three_coord_pending(&self) -> bool {
        self.three_coord_pending
    }

    /// Non-blank lines ignored so far
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Feed one line of input
    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if line.starts_with(MARKER_PREFIX) {
            self.three_coord_pending = true;
            if self.active.is_some() {
                self.state = ParserState::InSegment(CoordinateKind::Xzw);
            }
            return;
        }

        if is_label(line) {
            self.open_segment(line);
            return;
        }

        let Some(coords) = parse_coordinates(line) else {
            self.skipped_lines += 1;
            return;
        };
        if self.active.is_some() {
            self.three_coord_pending = false;
        }

        match (self.state, self.active, coords) {
            (ParserState::InSegment(CoordinateKind::Xz), Some(index), Coordinates::Xz(p)) => {
                self.segments[index].xz.push(p);
            }
            (ParserState::InSegment(CoordinateKind::Xzw), Some(index), Coordinates::Xzw(p)) => {
                self.segments[index].xzw.push(p);
            }
            _ => self.skipped_lines += 1,
        }
    }

    fn open_segment(&mut self, name: &str) {
        let index = match self.segments.iter().position(|s| s.name == name) {
            Some(index) => {
                let segment = &mut self.segments[index];
                segment.xz.clear();
                segment.xzw.clear();
                index
            }
            None => {
                self.segments.push(SegmentBuffer {
                    name: name.to_string(),
                    ..SegmentBuffer::default()
                });
                self.segments.len() - 1
            }
        };

        let kind = if self.three_coord_pending {
            CoordinateKind::Xzw
        } else {
            CoordinateKind::Xz
        };
        self.three_coord_pending = false;
        self.active = Some(index);
        self.state = ParserState::InSegment(kind);
    }

    /// Finish parsing; empty lists are dropped
    pub fn finish(self, format: ProtocolFormat) -> ProfileDocument {
        debug!(
            segments = self.segments.len(),
            skipped_lines = self.skipped_lines,
            "Finished parsing JFL text"
        );

        let mut document = ProfileDocument::with_format(format);
        for segment in self.segments {
            if !segment.xz.is_empty() {
                document.insert(NamedPolyline::xz(segment.name.clone(), segment.xz));
            }
            if !segment.xzw.is_empty() {
                document.insert(NamedPolyline::xzw(segment.name, segment.xzw));
            }
        }
        document
    }
}

/// Parse JFL text with the default protocol boilerplate
pub fn parse(text: &str) -> ProfileDocument {
    parse_with_format(text, ProtocolFormat::default())
}

/// Parse JFL text, attaching `format` to the resulting document
pub fn parse_with_format(text: &str, format: ProtocolFormat) -> ProfileDocument {
    let mut parser = JflParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish(format)
}

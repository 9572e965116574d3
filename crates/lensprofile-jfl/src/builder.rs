//! JFL document builder
//!
//! Serializes a [`ProfileDocument`] into the text read by the lens lathe
//! controller. Every coordinate is written as a 12 character field with 9
//! fractional digits; the controller reads fixed columns.

use std::fmt::Write;

use lensprofile_core::{NamedPolyline, Points, ProfileDocument, ProtocolFormat};

/// Width of a coordinate field, sign and decimal point included
pub const FIELD_WIDTH: usize = 12;

/// Fractional digits of a coordinate field
pub const FRACTION_DIGITS: usize = 9;

/// Format one coordinate value
pub fn format_value(value: f64) -> String {
    format!("{:0width$.prec$}", value, width = FIELD_WIDTH, prec = FRACTION_DIGITS)
}

/// Serialize a document to JFL text
pub fn build(document: &ProfileDocument) -> String {
    let mut out = String::with_capacity(estimate_size(document));
    out.push_str(&document.format.header);
    for polyline in document {
        write_polyline(&mut out, &document.format, polyline);
    }
    out.push_str(&document.format.footer);
    out
}

fn write_polyline(out: &mut String, format: &ProtocolFormat, polyline: &NamedPolyline) {
    match &polyline.points {
        Points::Xz(points) => {
            push_line(out, &polyline.name);
            for p in points {
                let _ = writeln!(out, "X {} Z {}", format_value(p.x), format_value(p.z));
            }
        }
        Points::Xzw(points) => {
            push_line(out, &format.three_coord_marker);
            if format.label_xzw_segments {
                push_line(out, &polyline.name);
            }
            for p in points {
                let _ = writeln!(
                    out,
                    "X {} Z {} W {}",
                    format_value(p.x),
                    format_value(p.z),
                    format_value(p.w)
                );
            }
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn estimate_size(document: &ProfileDocument) -> usize {
    let points: usize = document.iter().map(NamedPolyline::len).sum();
    document.format.header.len() + points * 45 + 64
}

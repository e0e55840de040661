//! Standalone SVG rendering of a dial frame.

use std::fmt::Write as _;

use super::{num, DialFrame, Hands, Primitive, CENTER_X, CENTER_Y, DIAL_RADIUS, VIEW_SIZE};
use crate::resolver::Summary;

const HOUR_HAND_LENGTH: f64 = 50.0;
const MINUTE_HAND_LENGTH: f64 = 72.0;
const SECOND_HAND_LENGTH: f64 = 85.0;

/// Escape text for use in SVG character data and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn hand(out: &mut String, id: &str, length: f64, width: f64, angle: f64) {
    let _ = writeln!(
        out,
        r#"  <line id="{id}" x1="{cx}" y1="{cy}" x2="{cx}" y2="{tip}" stroke="currentColor" stroke-width="{w}" stroke-linecap="round" transform="rotate({a}, {cx}, {cy})"/>"#,
        cx = num(CENTER_X),
        cy = num(CENTER_Y),
        tip = num(CENTER_Y - length),
        w = num(width),
        a = num(angle),
    );
}

/// Serialise a frame, the hand positions and the caption to an SVG document.
///
/// The root element carries `day-mode` or `night-mode`, plus
/// `transition-warning` while the ending-soon pulse is active.
pub fn document(frame: &DialFrame, hands: &Hands, summary: &Summary, pulse: bool) -> String {
    let mut out = String::new();
    let size = num(VIEW_SIZE);
    let mut class = format!("{}-mode", frame.mode);
    if pulse {
        class.push_str(" transition-warning");
    }

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}" class="{class}">"#
    );
    let _ = writeln!(out, "  <title>{}</title>", escape(&summary.lines().join(" / ")));
    let _ = writeln!(
        out,
        r#"  <circle cx="{}" cy="{}" r="{}" fill="none" stroke="currentColor" stroke-width="1"/>"#,
        num(CENTER_X),
        num(CENTER_Y),
        num(DIAL_RADIUS)
    );

    out.push_str("  <g id=\"sectors\">\n");
    for primitive in &frame.primitives {
        match primitive {
            Primitive::Sector { path, fill, opacity, current, .. } => {
                let class = if *current { " class=\"current-activity\"" } else { "" };
                let _ = writeln!(
                    out,
                    r#"    <path d="{path}" fill="{}" opacity="{}"{class}/>"#,
                    escape(fill),
                    num(*opacity)
                );
            }
            Primitive::Icon { x, y, glyph, font_size, current, .. } => {
                let class = if *current { " class=\"current-icon\"" } else { "" };
                let _ = writeln!(
                    out,
                    r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-size="{font_size}"{class}>{}</text>"#,
                    num(*x),
                    num(*y),
                    escape(glyph)
                );
            }
        }
    }
    out.push_str("  </g>\n");

    hand(&mut out, "hour-hand", HOUR_HAND_LENGTH, 4.0, hands.hour);
    hand(&mut out, "minute-hand", MINUTE_HAND_LENGTH, 3.0, hands.minute);
    hand(&mut out, "second-hand", SECOND_HAND_LENGTH, 1.0, hands.second);

    out.push_str("</svg>\n");
    out
}

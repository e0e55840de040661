//! Dial geometry.
//!
//! The dial is a 12-hour analog face in a 200×200 logical square. Each
//! interval becomes a pie-slice sector from the centre to the rim, plus an
//! optional icon near the rim at the sector's angular midpoint. Rendering is
//! a pure function of the interval list and the highlighted index; painting
//! is left to whatever consumes the [`Primitive`]s (see [`svg`]).

pub mod svg;

use serde::{Deserialize, Serialize};

use crate::schedule::{Bucket, Interval, Mode, TimeOfDay};

/// Width and height of the logical canvas.
pub const VIEW_SIZE: f64 = 200.0;
pub const CENTER_X: f64 = 100.0;
pub const CENTER_Y: f64 = 100.0;
pub const DIAL_RADIUS: f64 = 98.0;
pub const ICON_RADIUS: f64 = 83.0;

pub const CURRENT_OPACITY: f64 = 0.9;
pub const RESTING_OPACITY: f64 = 0.6;
pub const CURRENT_ICON_SIZE: u32 = 16;
pub const RESTING_ICON_SIZE: u32 = 14;

/// A drawable element of the dial face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Sector {
        index: usize,
        /// SVG path data for the wedge.
        path: String,
        start_angle: f64,
        end_angle: f64,
        large_arc: bool,
        fill: String,
        opacity: f64,
        current: bool,
    },
    Icon {
        index: usize,
        x: f64,
        y: f64,
        glyph: String,
        font_size: u32,
        current: bool,
    },
}

impl Primitive {
    pub fn is_current(&self) -> bool {
        match self {
            Primitive::Sector { current, .. } | Primitive::Icon { current, .. } => *current,
        }
    }
}

/// A fully built dial face for one mode/bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialFrame {
    pub mode: Mode,
    pub bucket: Bucket,
    pub active_index: Option<usize>,
    pub primitives: Vec<Primitive>,
}

/// Rotation of the three clock hands, in degrees clockwise from 12.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hands {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl Hands {
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour: (hour % 12) as f64 * 30.0 + minute as f64 * 0.5,
            minute: minute as f64 * 6.0 + second as f64 * 0.1,
            second: second as f64 * 6.0,
        }
    }
}

/// Angle of a time of day on a 12-hour face.
pub fn clock_angle(time: TimeOfDay) -> f64 {
    (time.hour() % 12) as f64 * 30.0 + time.minute() as f64 * 0.5
}

/// Start and end angle of an interval, with the end pushed a full turn
/// forward when it does not lie after the start.
pub fn sweep(interval: &Interval) -> (f64, f64) {
    let start = clock_angle(interval.start);
    let mut end = clock_angle(interval.end);
    if end <= start {
        end += 360.0;
    }
    (start, end)
}

/// Point at `angle` degrees clockwise from 12 o'clock, `radius` from centre.
pub fn polar(angle: f64, radius: f64) -> (f64, f64) {
    let rad = (angle - 90.0).to_radians();
    (CENTER_X + radius * rad.cos(), CENTER_Y + radius * rad.sin())
}

/// Format a coordinate compactly: at most three decimals, no trailing zeros.
pub(crate) fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut s = format!("{rounded:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Wedge path from the centre sweeping clockwise from `start` to `end`.
///
/// A sweep of a full turn is drawn as a disc from two half arcs, since an arc
/// whose endpoints coincide draws nothing.
pub fn sector_path(start: f64, end: f64) -> (String, bool) {
    let span = end - start;
    let (cx, cy, r) = (num(CENTER_X), num(CENTER_Y), num(DIAL_RADIUS));

    if span >= 360.0 {
        let top = num(CENTER_Y - DIAL_RADIUS);
        let bottom = num(CENTER_Y + DIAL_RADIUS);
        let path = format!("M {cx} {top} A {r} {r} 0 1 1 {cx} {bottom} A {r} {r} 0 1 1 {cx} {top} Z");
        return (path, true);
    }

    let large_arc = span > 180.0;
    let (x1, y1) = polar(start, DIAL_RADIUS);
    let (x2, y2) = polar(end, DIAL_RADIUS);
    let path = format!(
        "M {cx} {cy} L {} {} A {r} {r} 0 {} 1 {} {} Z",
        num(x1),
        num(y1),
        u8::from(large_arc),
        num(x2),
        num(y2)
    );
    (path, large_arc)
}

/// Build the dial primitives for `intervals`, highlighting `active`.
///
/// Emits one sector per interval followed by its icon, when it has one.
pub fn render(intervals: &[Interval], active: Option<usize>) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(intervals.len() * 2);

    for (index, interval) in intervals.iter().enumerate() {
        let current = active == Some(index);
        let (start, end) = sweep(interval);
        let (path, large_arc) = sector_path(start, end);

        out.push(Primitive::Sector {
            index,
            path,
            start_angle: start,
            end_angle: end,
            large_arc,
            fill: interval.color.clone(),
            opacity: if current { CURRENT_OPACITY } else { RESTING_OPACITY },
            current,
        });

        if let Some(glyph) = interval.icon.as_deref().filter(|g| !g.is_empty()) {
            let mid = start + (end - start) / 2.0;
            let (x, y) = polar(mid, ICON_RADIUS);
            out.push(Primitive::Icon {
                index,
                x,
                y,
                glyph: glyph.to_string(),
                font_size: if current { CURRENT_ICON_SIZE } else { RESTING_ICON_SIZE },
                current,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn iv(start: &str, end: &str) -> Interval {
        Interval::new("x", t(start), t(end), "#123456")
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn angles_use_twelve_hour_face() {
        assert!(close(clock_angle(t("00:00")), 0.0));
        assert!(close(clock_angle(t("03:00")), 90.0));
        assert!(close(clock_angle(t("15:00")), 90.0));
        assert!(close(clock_angle(t("08:30")), 255.0));
        assert!(close(clock_angle(t("21:15")), 277.5));
    }

    #[test]
    fn sweep_wraps_across_twelve() {
        let (s, e) = sweep(&iv("21:15", "07:00"));
        assert!(close(s, 277.5));
        assert!(close(e, 570.0));

        let (s, e) = sweep(&iv("11:30", "12:30"));
        assert!(close(s, 345.0));
        assert!(close(e, 375.0));
    }

    #[test]
    fn large_arc_flag_follows_span() {
        let (path, large) = sector_path(0.0, 90.0);
        assert!(!large);
        assert_eq!(path, "M 100 100 L 100 2 A 98 98 0 0 1 198 100 Z");

        let (path, large) = sector_path(0.0, 270.0);
        assert!(large);
        assert!(path.contains(" 0 1 1 "));
    }

    #[test]
    fn full_turn_is_a_disc() {
        let (start, end) = sweep(&iv("20:00", "08:00"));
        assert!(close(end - start, 360.0));
        let (path, large) = sector_path(start, end);
        assert!(large);
        assert_eq!(path, "M 100 2 A 98 98 0 1 1 100 198 A 98 98 0 1 1 100 2 Z");
    }

    #[test]
    fn render_highlights_active() {
        let list = vec![
            iv("07:00", "07:30").with_icon("⏰"),
            iv("07:30", "08:00"),
        ];
        let prims = render(&list, Some(0));
        assert_eq!(prims.len(), 3);

        match &prims[0] {
            Primitive::Sector { opacity, current, fill, .. } => {
                assert!(*current);
                assert!(close(*opacity, CURRENT_OPACITY));
                assert_eq!(fill, "#123456");
            }
            other => panic!("expected sector, got {other:?}"),
        }
        match &prims[1] {
            Primitive::Icon { glyph, font_size, index, .. } => {
                assert_eq!(glyph, "⏰");
                assert_eq!(*font_size, CURRENT_ICON_SIZE);
                assert_eq!(*index, 0);
            }
            other => panic!("expected icon, got {other:?}"),
        }
        match &prims[2] {
            Primitive::Sector { opacity, current, index, .. } => {
                assert!(!*current);
                assert_eq!(*index, 1);
                assert!(close(*opacity, RESTING_OPACITY));
            }
            other => panic!("expected sector, got {other:?}"),
        }
    }

    #[test]
    fn render_without_active_has_no_highlight() {
        let prims = render(&[iv("07:00", "07:30")], None);
        assert!(prims.iter().all(|p| !p.is_current()));
    }

    #[test]
    fn icon_sits_at_midpoint_near_rim() {
        let prims = render(&[iv("12:00", "03:00").with_icon("*")], None);
        let Primitive::Icon { x, y, font_size, .. } = &prims[1] else {
            panic!("expected icon");
        };
        let offset = ICON_RADIUS * std::f64::consts::FRAC_1_SQRT_2;
        assert!((x - (CENTER_X + offset)).abs() < 1e-6);
        assert!((y - (CENTER_Y - offset)).abs() < 1e-6);
        assert_eq!(*font_size, RESTING_ICON_SIZE);
    }

    #[test]
    fn render_is_deterministic() {
        let list = crate::schedule::Schedule::default().mon_fri.night;
        assert_eq!(render(&list, Some(3)), render(&list, Some(3)));
    }

    #[test]
    fn hand_angles() {
        let hands = Hands::at(15, 30, 30);
        assert!(close(hands.hour, 105.0));
        assert!(close(hands.minute, 183.0));
        assert!(close(hands.second, 180.0));
    }

    #[test]
    fn num_trims_zeros() {
        assert_eq!(num(100.0), "100");
        assert_eq!(num(41.3106), "41.311");
        assert_eq!(num(-0.0001), "0");
    }
}

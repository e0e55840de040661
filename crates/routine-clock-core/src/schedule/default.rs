//! The built-in routine.

use super::{BucketSchedule, Interval, Schedule, TimeOfDay};

type Row = (&'static str, (u8, u8), (u8, u8), &'static str, &'static str);

const MON_FRI_DAY: &[Row] = &[
    ("Wake Up", (7, 0), (7, 30), "#A8BED4", "⏰"),
    ("Get Ready", (7, 30), (8, 0), "#E0D5CB", "👕"),
    ("Leave School", (8, 0), (8, 30), "#C5D4C9", "🚗"),
    ("School", (8, 30), (9, 6), "#B5C9D4", "🏫"),
    ("School", (9, 6), (15, 15), "#B5C9D4", "🏫"),
    ("Arrive Home", (15, 15), (15, 45), "#C5D4C5", "🏠"),
    ("Snack", (15, 45), (16, 15), "#E8E0D0", "🍎"),
    ("Play Time", (16, 15), (17, 0), "#D0D8C5", "🪀"),
    ("Mom Home", (17, 0), (17, 30), "#C9BED4", "👩‍👦"),
    ("Make Dinner", (17, 30), (18, 0), "#E0D0BF", "👩‍🍳"),
    ("Eat Dinner", (18, 0), (18, 30), "#D8C9B8", "🍽️"),
    ("Bath Time", (18, 30), (19, 0), "#B8D4D8", "🛁"),
];

const MON_FRI_NIGHT: &[Row] = &[
    ("Screen Time", (19, 0), (20, 0), "#8B7E99", "📺"),
    ("Wind Down", (20, 0), (21, 0), "#736680", "📖"),
    ("Lights Out", (21, 0), (21, 15), "#5C5266", "🛌"),
    ("Sleeping", (21, 15), (7, 0), "#4A3F52", "🌙"),
];

const WEEKEND_DAY: &[Row] = &[
    ("Wake Up", (8, 0), (8, 30), "#A8BED4", "⏰"),
    ("Breakfast", (8, 30), (9, 30), "#E8CFC0", "🥞"),
    ("Play Time", (9, 30), (12, 30), "#D0D8C5", "🧸"),
    ("Lunch", (12, 30), (13, 30), "#D8C9B8", "🥪"),
    ("Play Time", (13, 30), (17, 0), "#D0D8C5", "🧸"),
    ("Make Dinner", (17, 0), (18, 0), "#E8CFD8", "👩‍🍳"),
    ("Eat Dinner", (18, 0), (18, 30), "#D8C9B8", "🍽️"),
    ("Bath Time", (18, 30), (19, 0), "#B8D4D8", "🛁"),
    ("Screen Time", (19, 0), (20, 0), "#8B7E99", "📺"),
];

const WEEKEND_NIGHT: &[Row] = &[("Sleep", (20, 0), (8, 0), "#4A3F52", "🌙")];

fn clock(hm: (u8, u8)) -> TimeOfDay {
    TimeOfDay::from_minutes(hm.0 as u32 * 60 + hm.1 as u32)
}

fn segment(rows: &[Row]) -> Vec<Interval> {
    rows.iter()
        .map(|&(label, start, end, color, icon)| {
            Interval::new(label, clock(start), clock(end), color).with_icon(icon)
        })
        .collect()
}

pub(super) fn routine() -> Schedule {
    Schedule {
        mon_fri: BucketSchedule {
            day: segment(MON_FRI_DAY),
            night: segment(MON_FRI_NIGHT),
        },
        weekend: BucketSchedule {
            day: segment(WEEKEND_DAY),
            night: segment(WEEKEND_NIGHT),
        },
    }
}

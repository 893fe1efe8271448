//! Slot grid and time-of-day helpers for the demand selector.
//!
//! A day is split into fixed-width slots (30 minutes by default, 48 slots).
//! Times travel through the UI as zero-padded `HH:MM` strings; the value
//! `24:00` only ever appears as the exclusive end of a range.

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const DEFAULT_SLOT_MINUTES: u32 = 30;
/// Marker rendered for `slot == total_slots`.
pub const END_OF_DAY: &str = "24:00";

/// Discretization of a 24-hour day into equal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    slot_minutes: u32,
}

impl SlotGrid {
    /// Create a grid with the given slot width.
    ///
    /// Returns `None` unless the width divides an hour evenly, which also
    /// keeps every hour boundary on a slot boundary.
    pub fn new(slot_minutes: u32) -> Option<Self> {
        if slot_minutes == 0 || 60 % slot_minutes != 0 {
            return None;
        }
        Some(Self { slot_minutes })
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Number of slots in a day (48 for 30-minute slots).
    pub fn total_slots(&self) -> usize {
        (MINUTES_PER_DAY / self.slot_minutes) as usize
    }

    /// Map a time string to its slot index.
    ///
    /// Accepts `HH:MM`, `H:M` and full date-time strings such as
    /// `2024-01-01T05:30:00`. Minutes are floored to the grid resolution.
    /// The result is not clamped; `24:00` maps to `total_slots()`.
    pub fn time_to_slot_index(&self, time: &str) -> Option<usize> {
        let (hours, minutes) = parse_time_of_day(time)?;
        Some(((hours * 60 + minutes) / self.slot_minutes) as usize)
    }

    /// Render the start boundary of a slot as `HH:MM`.
    pub fn slot_index_to_time(&self, slot: usize) -> String {
        let total = slot as u32 * self.slot_minutes;
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    /// Start and exclusive end time covering every slot between `a` and `b`.
    pub fn drag_time_range(&self, a: usize, b: usize) -> (String, String) {
        let (start, end) = ordered(a, b);
        (self.slot_index_to_time(start), self.slot_index_to_time(end + 1))
    }

    /// Clamp an index into `[0, total_slots - 1]`.
    pub fn clamp_slot(&self, slot: usize) -> usize {
        slot.min(self.total_slots() - 1)
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

pub(crate) fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Strip a leading date from a date-time string.
fn time_component(input: &str) -> &str {
    let input = input.trim();
    if let Some((_, time)) = input.split_once('T') {
        return time;
    }
    match input.rsplit_once(' ') {
        Some((_, time)) => time,
        None => input,
    }
}

/// Parse the hour and minute fields of a time or date-time string.
pub fn parse_time_of_day(input: &str) -> Option<(u32, u32)> {
    let mut parts = time_component(input).split(':');
    let hours = parse_digits(parts.next()?)?;
    let minutes = parse_digits(parts.next()?)?;
    Some((hours, minutes))
}

fn parse_digits(field: &str) -> Option<u32> {
    if field.is_empty() || field.len() > 2 || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Normalize user input to zero-padded `HH:MM`.
///
/// Unparsable input is returned unchanged so validation can reject it.
pub fn normalize_time(input: &str) -> String {
    match parse_time_of_day(input) {
        Some((hours, minutes)) => format!("{:02}:{:02}", hours, minutes),
        None => input.to_string(),
    }
}

/// Check for a 24-hour `H:MM` or `HH:MM` time between 00:00 and 23:59.
pub fn is_valid_time(time: &str) -> bool {
    let Some((hours, minutes)) = time.split_once(':') else {
        return false;
    };
    let hours_ok = match hours.as_bytes() {
        [h] => h.is_ascii_digit(),
        [b'0' | b'1', h] => h.is_ascii_digit(),
        [b'2', h] => (b'0'..=b'3').contains(h),
        _ => false,
    };
    let minutes_ok = matches!(minutes.as_bytes(), [b'0'..=b'5', m] if m.is_ascii_digit());
    hours_ok && minutes_ok
}

/// Number of days in the weekly grid (Monday through Friday).
pub const DAYS_PER_WEEK: usize = 5;

/// Display names for the weekday columns, in grid order.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = ["월", "화", "수", "목", "금"];

/// A cell address in the weekly grid: day column, hour row and half-hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCoordinate {
    pub day: usize,
    pub hour_index: usize,
    pub half: usize,
}

/// Converts a grid coordinate to its linear bit index.
/// Layout: all cells of day 0 first, two half-hour cells per hour.
/// Callers are responsible for keeping inputs inside their domains;
/// an out-of-domain input simply yields an index past the bitmap end,
/// which downstream operations treat as a no-op.
pub fn to_index(day: usize, hour_index: usize, half: usize, hours_per_day: usize) -> usize {
    day * hours_per_day * 2 + hour_index * 2 + half
}

/// Inverse of `to_index` for a grid with the given hour range.
pub fn from_index(index: usize, hours_per_day: usize) -> SlotCoordinate {
    let slots_per_day = hours_per_day * 2;
    SlotCoordinate {
        day: index / slots_per_day,
        hour_index: (index % slots_per_day) / 2,
        half: index % 2,
    }
}

/// Formats an hour row label, e.g. hour 12 -> "12:00-13:00".
pub fn hour_label(hour: u32) -> String {
    format!("{}:00-{}:00", hour, hour + 1)
}

/// Formats a half-hour cell label, e.g. (12, 1) -> "12:30".
pub fn half_label(hour: u32, half: usize) -> String {
    format!("{}:{}", hour, if half == 0 { "00" } else { "30" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_layout_matches_grid_order() {
        // 2-hour day: Mon 12:00 is bit 0, Mon 12:30 is bit 1, Tue 12:00 is bit 4
        assert_eq!(to_index(0, 0, 0, 2), 0);
        assert_eq!(to_index(0, 0, 1, 2), 1);
        assert_eq!(to_index(0, 1, 0, 2), 2);
        assert_eq!(to_index(1, 0, 0, 2), 4);
        assert_eq!(to_index(4, 1, 1, 2), 19);
    }

    #[test]
    fn from_index_inverts_to_index() {
        let hours_per_day = 6;
        for day in 0..DAYS_PER_WEEK {
            for hour_index in 0..hours_per_day {
                for half in 0..2 {
                    let index = to_index(day, hour_index, half, hours_per_day);
                    let coord = from_index(index, hours_per_day);
                    assert_eq!(coord, SlotCoordinate { day, hour_index, half });
                }
            }
        }
    }

    #[test]
    fn labels_format_as_expected() {
        assert_eq!(hour_label(12), "12:00-13:00");
        assert_eq!(half_label(9, 0), "9:00");
        assert_eq!(half_label(9, 1), "9:30");
    }
}

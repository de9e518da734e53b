use super::bitmap::{AvailabilityBitmap, Cell};

/// Cell state as shown in the grid. `Buffer` marks an available cell that
/// sits next to an unavailable one within the same day; it exists only in
/// this derived view and never reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCell {
    Available,
    Unavailable,
    Buffer,
}

impl From<Cell> for DisplayCell {
    fn from(cell: Cell) -> DisplayCell {
        match cell {
            Cell::Available => DisplayCell::Available,
            Cell::Unavailable => DisplayCell::Unavailable,
        }
    }
}

/// Indices of the same-day neighbors of `index`. Day boundaries are never
/// crossed: the first cell of a day has no left neighbor and the last has
/// no right neighbor.
fn same_day_neighbors(index: usize, slots_per_day: usize) -> [Option<usize>; 2] {
    let day = index / slots_per_day;
    let left = index
        .checked_sub(1)
        .filter(|&n| n / slots_per_day == day);
    let right = Some(index + 1).filter(|&n| n / slots_per_day == day);
    [left, right]
}

/// Derives the display view of a bitmap. With `apply` set, every available
/// cell adjacent (same day) to an unavailable cell is shown as `Buffer`;
/// unavailable neighbors stay unavailable. The view is recomputed from the
/// canonical bitmap on every call and is never persisted.
pub fn display_overlay(bitmap: &AvailabilityBitmap, apply: bool) -> Vec<DisplayCell> {
    let mut view: Vec<DisplayCell> = bitmap.cells().iter().map(|&c| c.into()).collect();
    if !apply {
        return view;
    }
    let slots_per_day = bitmap.hours_per_day() * 2;
    for (index, &cell) in bitmap.cells().iter().enumerate() {
        if cell != Cell::Unavailable {
            continue;
        }
        for neighbor in same_day_neighbors(index, slots_per_day).into_iter().flatten() {
            if bitmap.get(neighbor) == Some(Cell::Available) {
                view[neighbor] = DisplayCell::Buffer;
            }
        }
    }
    view
}

/// Folds the buffer into the canonical bitmap: every same-day neighbor of
/// an unavailable cell becomes unavailable. Used by the optimizer when the
/// travel-buffer option is on; submissions never go through this, so a
/// participant's stored availability always stays what they drew.
pub fn commit_buffer(bitmap: &AvailabilityBitmap) -> AvailabilityBitmap {
    let slots_per_day = bitmap.hours_per_day() * 2;
    let mut committed = bitmap.clone();
    for (index, &cell) in bitmap.cells().iter().enumerate() {
        if cell != Cell::Unavailable {
            continue;
        }
        for neighbor in same_day_neighbors(index, slots_per_day).into_iter().flatten() {
            committed = committed.toggle(neighbor, Some(Cell::Unavailable));
        }
    }
    committed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap_with_unavailable(hours_per_day: usize, indices: &[usize]) -> AvailabilityBitmap {
        let mut bitmap = AvailabilityBitmap::new(hours_per_day);
        for &index in indices {
            bitmap = bitmap.toggle(index, Some(Cell::Unavailable));
        }
        bitmap
    }

    #[test]
    fn overlay_marks_both_neighbors_within_a_day() {
        let bitmap = bitmap_with_unavailable(2, &[1]);
        let view = display_overlay(&bitmap, true);
        assert_eq!(view[0], DisplayCell::Buffer);
        assert_eq!(view[1], DisplayCell::Unavailable);
        assert_eq!(view[2], DisplayCell::Buffer);
        assert_eq!(view[3], DisplayCell::Available);
    }

    #[test]
    fn overlay_never_crosses_a_day_boundary() {
        // 2 hours/day -> 4 slots/day; index 4 is the first cell of Tuesday
        let bitmap = bitmap_with_unavailable(2, &[4]);
        let view = display_overlay(&bitmap, true);
        assert_eq!(view[3], DisplayCell::Available, "Monday's last cell must not buffer");
        assert_eq!(view[5], DisplayCell::Buffer);

        let bitmap = bitmap_with_unavailable(2, &[3]);
        let view = display_overlay(&bitmap, true);
        assert_eq!(view[2], DisplayCell::Buffer);
        assert_eq!(view[4], DisplayCell::Available, "Tuesday's first cell must not buffer");
    }

    #[test]
    fn overlay_keeps_unavailable_neighbors_unavailable() {
        let bitmap = bitmap_with_unavailable(2, &[1, 2]);
        let view = display_overlay(&bitmap, true);
        assert_eq!(view[1], DisplayCell::Unavailable);
        assert_eq!(view[2], DisplayCell::Unavailable);
        assert_eq!(view[0], DisplayCell::Buffer);
        assert_eq!(view[3], DisplayCell::Buffer);
    }

    #[test]
    fn overlay_is_a_pure_function_of_the_canonical_bitmap() {
        let bitmap = bitmap_with_unavailable(3, &[2, 7, 13]);
        let first = display_overlay(&bitmap, true);
        let second = display_overlay(&bitmap, true);
        assert_eq!(first, second);
    }

    #[test]
    fn overlay_without_apply_mirrors_the_bitmap() {
        let bitmap = bitmap_with_unavailable(2, &[1]);
        let view = display_overlay(&bitmap, false);
        assert!(!view.contains(&DisplayCell::Buffer));
        assert_eq!(view[1], DisplayCell::Unavailable);
    }

    #[test]
    fn commit_buffer_forces_neighbors_unavailable() {
        let bitmap = bitmap_with_unavailable(2, &[1]);
        let committed = commit_buffer(&bitmap);
        assert_eq!(committed.get(0), Some(Cell::Unavailable));
        assert_eq!(committed.get(1), Some(Cell::Unavailable));
        assert_eq!(committed.get(2), Some(Cell::Unavailable));
        assert_eq!(committed.get(3), Some(Cell::Available));
        // the source bitmap is untouched
        assert_eq!(bitmap.get(0), Some(Cell::Available));
    }

    #[test]
    fn commit_buffer_respects_day_boundaries() {
        let bitmap = bitmap_with_unavailable(2, &[4]);
        let committed = commit_buffer(&bitmap);
        assert_eq!(committed.get(3), Some(Cell::Available));
        assert_eq!(committed.get(5), Some(Cell::Unavailable));
    }
}

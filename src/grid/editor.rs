use super::bitmap::{AvailabilityBitmap, Cell};

/// Drag gesture state. The target value is captured once at pointer-down
/// so a drag paints one consistent value no matter how often the pointer
/// re-enters a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { target: Cell },
}

/// Interprets pointer gestures over an availability bitmap as paint-style
/// multi-cell edits. All edits are local; nothing here touches the network.
#[derive(Debug, Clone)]
pub struct GridEditor {
    bitmap: AvailabilityBitmap,
    state: DragState,
}

impl GridEditor {
    /// Starts an editor over an all-available bitmap.
    pub fn new(hours_per_day: usize) -> GridEditor {
        GridEditor {
            bitmap: AvailabilityBitmap::new(hours_per_day),
            state: DragState::Idle,
        }
    }

    /// Starts an editor over an existing bitmap, e.g. a prior submission.
    pub fn from_bitmap(bitmap: AvailabilityBitmap) -> GridEditor {
        GridEditor {
            bitmap,
            state: DragState::Idle,
        }
    }

    pub fn bitmap(&self) -> &AvailabilityBitmap {
        &self.bitmap
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Replaces the working bitmap and drops any in-flight gesture.
    pub fn load(&mut self, bitmap: AvailabilityBitmap) {
        self.bitmap = bitmap;
        self.state = DragState::Idle;
    }

    /// Resets to all-available for the given hour range.
    pub fn reset(&mut self, hours_per_day: usize) {
        self.load(AvailabilityBitmap::new(hours_per_day));
    }

    /// Pointer-down on a cell: capture the negation of its current value
    /// as the gesture target and apply it immediately. A down outside the
    /// grid leaves the editor idle.
    pub fn pointer_down(&mut self, index: usize) {
        let Some(current) = self.bitmap.get(index) else {
            return;
        };
        let target = current.flipped();
        self.state = DragState::Dragging { target };
        self.bitmap = self.bitmap.toggle(index, Some(target));
    }

    /// Pointer-enter while dragging paints the captured target into the
    /// entered cell; re-entering an already painted cell is idempotent.
    /// Outside a drag this is a no-op.
    pub fn pointer_enter(&mut self, index: usize) {
        if let DragState::Dragging { target } = self.state {
            self.bitmap = self.bitmap.toggle(index, Some(target));
        }
    }

    /// Ends the gesture. Pointer-up and the pointer leaving the grid
    /// container are treated identically so a drag can never get stuck.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Discrete click: flip the cell without a forced value.
    pub fn click(&mut self, index: usize) {
        self.bitmap = self.bitmap.toggle(index, None);
    }
}

use super::bitmap::AvailabilityBitmap;
use super::buffer::{display_overlay, DisplayCell};
use super::editor::GridEditor;

/// What a submit sends over the wire once the session passes validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub participant_name: String,
    pub availability_binary: String,
}

/// Editing state for one participant's grid: the name being edited and the
/// drag editor over their bitmap. One session exists per open schedule
/// view; components receive it by reference instead of sharing globals.
#[derive(Debug, Clone)]
pub struct EditorSession {
    participant_name: String,
    editor: GridEditor,
    hours_per_day: usize,
}

impl EditorSession {
    pub fn new(hours_per_day: usize) -> EditorSession {
        EditorSession {
            participant_name: String::new(),
            editor: GridEditor::new(hours_per_day),
            hours_per_day,
        }
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub fn editor(&mut self) -> &mut GridEditor {
        &mut self.editor
    }

    pub fn bitmap(&self) -> &AvailabilityBitmap {
        self.editor.bitmap()
    }

    /// Switches the active participant. A prior submission under that name
    /// is loaded verbatim (no buffer transform); otherwise the grid resets
    /// to all-available for the current schedule.
    pub fn switch_participant(&mut self, name: &str, prior: Option<&AvailabilityBitmap>) {
        self.participant_name = name.to_string();
        match prior {
            Some(bitmap) => self.editor.load(bitmap.clone()),
            None => self.editor.reset(self.hours_per_day),
        }
    }

    /// Clears the name and resets the grid, e.g. after a successful submit.
    pub fn clear(&mut self) {
        self.participant_name.clear();
        self.editor.reset(self.hours_per_day);
    }

    /// Display view of the current bitmap, with or without the buffer overlay.
    pub fn display(&self, apply_buffer: bool) -> Vec<DisplayCell> {
        display_overlay(self.editor.bitmap(), apply_buffer)
    }

    /// Validates submit preconditions and serializes the canonical bitmap.
    /// The buffer overlay is display-only and is never folded in here.
    pub fn prepare_submission(&self) -> Result<SubmissionPayload, String> {
        let name = self.participant_name.trim();
        if name.is_empty() {
            return Err("participant name is required".to_string());
        }
        if self.editor.bitmap().is_empty() {
            return Err("availability grid is empty".to_string());
        }
        Ok(SubmissionPayload {
            participant_name: name.to_string(),
            availability_binary: self.editor.bitmap().to_wire(),
        })
    }
}

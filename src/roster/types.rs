use serde::{Deserialize, Serialize};

use crate::grid::slot::{hour_label, DAYS_PER_WEEK};

/// Constraint options for the optimizer, editable by the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOptions {
    pub min_hours_per_participant: Option<u32>,
    pub max_hours_per_participant: Option<u32>,
    pub participants_per_slot: u32,
}

impl Default for ScheduleOptions {
    fn default() -> ScheduleOptions {
        ScheduleOptions {
            min_hours_per_participant: Some(1),
            max_hours_per_participant: Some(2),
            participants_per_slot: 2,
        }
    }
}

/// One recurring weekly schedule, addressed by its join code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub code: String,
    pub title: String,
    pub start_hour: u32,
    pub end_hour: u32,
    #[serde(flatten)]
    pub options: ScheduleOptions,
}

impl Schedule {
    /// Checks the hour-range invariant relied on by all grid math.
    pub fn validate(&self) -> Result<(), String> {
        if self.end_hour <= self.start_hour {
            return Err(format!(
                "end hour ({}) must be after start hour ({})",
                self.end_hour, self.start_hour
            ));
        }
        if self.end_hour > 24 {
            return Err("end hour must be at most 24".to_string());
        }
        Ok(())
    }

    pub fn hours_per_day(&self) -> usize {
        (self.end_hour - self.start_hour) as usize
    }

    /// Length of the availability wire string for this schedule.
    pub fn bits_len(&self) -> usize {
        DAYS_PER_WEEK * self.hours_per_day() * 2
    }
}

/// The hour slot an assignment points at, with its display labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSlot {
    pub day: usize,
    pub hour_index: usize,
    pub start: String,
    pub end: String,
}

impl AssignedSlot {
    pub fn new(day: usize, hour_index: usize, start_hour: u32) -> AssignedSlot {
        let hour = start_hour + hour_index as u32;
        AssignedSlot {
            day,
            hour_index,
            start: format!("{}:00", hour),
            end: format!("{}:00", hour + 1),
        }
    }

    /// Hour row label for this slot, e.g. "12:00-13:00".
    pub fn hour_label(&self, start_hour: u32) -> String {
        hour_label(start_hour + self.hour_index as u32)
    }
}

/// One optimizer result: a participant placed in one hour slot. The set of
/// assignments for a schedule is a snapshot, replaced whole on every
/// optimize call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub slot: AssignedSlot,
    pub assignee: String,
}

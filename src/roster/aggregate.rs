use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::types::{AssignedSlot, Assignment};
use crate::grid::slot::{DAYS_PER_WEEK, DAY_NAMES};

/// Assignee names per grid slot: `[day][hour_index] -> sorted names`.
pub type SlotAssignees = Vec<Vec<Vec<String>>>;

/// One row of the per-participant summary table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub name: String,
    /// Number of hour slots assigned to this participant.
    pub count: u32,
    /// Set when `count` falls short of the schedule's minimum hours.
    pub below_min: bool,
    /// This participant's slots, ascending by day then start hour.
    pub slots: Vec<AssignedSlot>,
    /// Compact labels for `slots`, e.g. "월 12-13".
    pub slot_labels: Vec<String>,
}

/// Groups assignments by grid slot. Out-of-range slots and empty assignee
/// names are dropped; each slot's name list is sorted for deterministic
/// display and export.
pub fn group_by_slot(assignments: &[Assignment], hours_count: usize) -> SlotAssignees {
    let mut grouped: SlotAssignees = vec![vec![Vec::new(); hours_count]; DAYS_PER_WEEK];
    for assignment in assignments {
        let slot = &assignment.slot;
        if slot.day < DAYS_PER_WEEK && slot.hour_index < hours_count && !assignment.assignee.is_empty() {
            grouped[slot.day][slot.hour_index].push(assignment.assignee.clone());
        }
    }
    for day in &mut grouped {
        for names in day {
            names.sort();
        }
    }
    grouped
}

/// Hour number parsed from a label like "12:00"; slots sort by this.
fn parsed_start_hour(slot: &AssignedSlot) -> u32 {
    slot.start
        .split(':')
        .next()
        .and_then(|h| h.parse().ok())
        .unwrap_or(0)
}

/// Builds the per-participant summary. `known_names` is everyone who has
/// ever submitted availability; participants without assignments still get
/// a row with count 0 and are flagged below-minimum whenever the minimum
/// is positive. Row order follows first appearance: assignees first, then
/// remaining submitters.
pub fn summarize(
    assignments: &[Assignment],
    known_names: &[String],
    min_hours: u32,
) -> Vec<ParticipantSummary> {
    let mut per_participant: HashMap<&str, Vec<&Assignment>> = HashMap::new();
    for assignment in assignments {
        per_participant
            .entry(assignment.assignee.as_str())
            .or_default()
            .push(assignment);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<&str> = Vec::new();
    for name in assignments
        .iter()
        .map(|a| a.assignee.as_str())
        .chain(known_names.iter().map(|n| n.as_str()))
    {
        if seen.insert(name) {
            ordered.push(name);
        }
    }

    ordered
        .into_iter()
        .map(|name| {
            let mut slots: Vec<AssignedSlot> = per_participant
                .get(name)
                .map(|assigned| assigned.iter().map(|a| a.slot.clone()).collect())
                .unwrap_or_default();
            slots.sort_by(|a, b| {
                a.day
                    .cmp(&b.day)
                    .then(parsed_start_hour(a).cmp(&parsed_start_hour(b)))
            });
            let count = slots.len() as u32;
            let slot_labels = slots.iter().map(slot_summary_label).collect();
            ParticipantSummary {
                name: name.to_string(),
                count,
                below_min: count < min_hours,
                slots,
                slot_labels,
            }
        })
        .collect()
}

/// Compact slot label for the summary table, e.g. "월 12-13".
pub fn slot_summary_label(slot: &AssignedSlot) -> String {
    let day = DAY_NAMES.get(slot.day).copied().unwrap_or("?");
    let start = slot.start.split(':').next().unwrap_or(&slot.start);
    let end = slot.end.split(':').next().unwrap_or(&slot.end);
    format!("{} {}-{}", day, start, end)
}

use std::collections::HashMap;

use rand::seq::SliceRandom;
use serde::Deserialize;

use super::types::{AssignedSlot, Assignment, Schedule};
use crate::grid::bitmap::{AvailabilityBitmap, Cell};
use crate::grid::buffer::commit_buffer;
use crate::grid::slot::{to_index, DAYS_PER_WEEK};
use crate::store::AvailabilityRecord;

/// Caller-selectable optimizer behavior.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeOptions {
    /// Treat the cells around unavailable ones as unavailable too, leaving
    /// travel slack between a participant's commitments and their shifts.
    #[serde(default)]
    pub apply_travel_buffer: bool,
}

struct Candidate {
    name: String,
    bitmap: AvailabilityBitmap,
    open_slots: usize,
}

impl Candidate {
    /// A participant can take an hour slot only when both of its half-hour
    /// cells are available.
    fn can_take(&self, day: usize, hour_index: usize, hours_per_day: usize) -> bool {
        (0..2).all(|half| {
            self.bitmap.get(to_index(day, hour_index, half, hours_per_day))
                == Some(Cell::Available)
        })
    }
}

/// Greedy capacity assignment over the weekly grid. Slots are filled in
/// grid order up to `participants_per_slot`; for each slot, participants
/// with the fewest hours so far go first (pulling everyone toward the
/// minimum), with scarce availability as the tie-break. `max_hours` caps
/// any one participant. The result is a full snapshot; callers replace
/// prior assignments wholesale.
pub fn optimize(
    schedule: &Schedule,
    records: &[AvailabilityRecord],
    options: &OptimizeOptions,
) -> Vec<Assignment> {
    let hours_per_day = schedule.hours_per_day();
    let max_hours = schedule.options.max_hours_per_participant.unwrap_or(u32::MAX);
    let capacity = schedule.options.participants_per_slot as usize;

    let mut candidates: Vec<Candidate> = Vec::new();
    for record in records {
        match AvailabilityBitmap::from_wire(&record.availability_bits, hours_per_day) {
            Ok(bitmap) => {
                let bitmap = if options.apply_travel_buffer {
                    commit_buffer(&bitmap)
                } else {
                    bitmap
                };
                let open_slots = (0..DAYS_PER_WEEK)
                    .flat_map(|day| (0..hours_per_day).map(move |hour| (day, hour)))
                    .filter(|&(day, hour)| {
                        (0..2).all(|half| {
                            bitmap.get(to_index(day, hour, half, hours_per_day))
                                == Some(Cell::Available)
                        })
                    })
                    .count();
                candidates.push(Candidate {
                    name: record.participant_name.clone(),
                    bitmap,
                    open_slots,
                });
            }
            Err(reason) => {
                // stale submission from before an hour-range change
                log::warn!(
                    "skipping availability of {}: {}",
                    record.participant_name,
                    reason
                );
            }
        }
    }

    let mut assigned_hours: HashMap<String, u32> = HashMap::new();
    let mut assignments: Vec<Assignment> = Vec::new();
    let mut rng = rand::thread_rng();

    for day in 0..DAYS_PER_WEEK {
        for hour_index in 0..hours_per_day {
            let mut eligible: Vec<&Candidate> = candidates
                .iter()
                .filter(|c| {
                    assigned_hours.get(&c.name).copied().unwrap_or(0) < max_hours
                        && c.can_take(day, hour_index, hours_per_day)
                })
                .collect();
            // shuffle before the stable sort so equal candidates rotate
            // between runs instead of always favoring submission order
            eligible.shuffle(&mut rng);
            eligible.sort_by_key(|c| {
                (assigned_hours.get(&c.name).copied().unwrap_or(0), c.open_slots)
            });

            for candidate in eligible.into_iter().take(capacity) {
                *assigned_hours.entry(candidate.name.clone()).or_insert(0) += 1;
                assignments.push(Assignment {
                    slot: AssignedSlot::new(day, hour_index, schedule.start_hour),
                    assignee: candidate.name.clone(),
                });
            }
        }
    }

    assignments
}

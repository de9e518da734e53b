use chrono::{DateTime, Utc};
use serde::Serialize;

/// One participant's stored submission for a schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub id: u64,
    pub participant_name: String,
    pub availability_bits: String,
    pub submitted_at: DateTime<Utc>,
}

/// In-memory submission set for one schedule. Names are unique: submitting
/// again under the same name overwrites the prior record (last write wins),
/// keeping its id so open views can still address it.
#[derive(Debug, Default)]
pub struct AvailabilityStore {
    records: Vec<AvailabilityRecord>,
    next_id: u64,
}

impl AvailabilityStore {
    pub fn new() -> AvailabilityStore {
        AvailabilityStore::default()
    }

    pub fn records(&self) -> &[AvailabilityRecord] {
        &self.records
    }

    pub fn find_by_name(&self, name: &str) -> Option<&AvailabilityRecord> {
        self.records.iter().find(|r| r.participant_name == name)
    }

    /// All submitter names, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.participant_name.clone()).collect()
    }

    /// Validates and stores a submission. `expected_len` is the schedule's
    /// wire length; anything else is rejected before touching state.
    pub fn submit(
        &mut self,
        participant_name: &str,
        availability_bits: &str,
        expected_len: usize,
    ) -> Result<&AvailabilityRecord, String> {
        let name = participant_name.trim();
        if name.is_empty() {
            return Err("participant name is required".to_string());
        }
        if availability_bits.is_empty() {
            return Err("availability bits are required".to_string());
        }
        if availability_bits.chars().count() != expected_len {
            return Err(format!(
                "availability bits must be {} characters, got {}",
                expected_len,
                availability_bits.chars().count()
            ));
        }
        if !availability_bits.chars().all(|c| c == '0' || c == '1') {
            return Err("availability bits may only contain '0' and '1'".to_string());
        }

        let now = Utc::now();
        if let Some(index) = self.records.iter().position(|r| r.participant_name == name) {
            let record = &mut self.records[index];
            record.availability_bits = availability_bits.to_string();
            record.submitted_at = now;
            return Ok(&self.records[index]);
        }

        self.next_id += 1;
        self.records.push(AvailabilityRecord {
            id: self.next_id,
            participant_name: name.to_string(),
            availability_bits: availability_bits.to_string(),
            submitted_at: now,
        });
        Ok(self.records.last().expect("record was just pushed"))
    }

    /// Removes the record with the given id; false when no such record.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }
}

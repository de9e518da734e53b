use csv::WriterBuilder;

use super::aggregate::group_by_slot;
use super::types::Assignment;
use crate::grid::slot::{hour_label, DAYS_PER_WEEK, DAY_NAMES};
use crate::store::AvailabilityRecord;

/// Download filename for the optimized-schedule export.
pub const EXPORT_FILENAME: &str = "schedule_optimized.csv";

/// UTF-8 byte-order mark, prepended so spreadsheet apps render Korean
/// participant names correctly.
const BOM: &str = "\u{FEFF}";

/// Serializes the optimized assignment grid as CSV: a time-label column
/// followed by one column per weekday, one row per hour. Day cells hold
/// the sorted ", "-joined assignee list and are always quoted so a
/// multi-name cell survives as a single column. Pure function of its
/// inputs; identical inputs give byte-identical output.
pub fn export_optimized_csv(assignments: &[Assignment], start_hour: u32, end_hour: u32) -> String {
    let hours_count = end_hour.saturating_sub(start_hour) as usize;
    let grouped = group_by_slot(assignments, hours_count);

    let mut csv = String::from(BOM);
    csv.push_str("시간");
    for day in DAY_NAMES {
        csv.push(',');
        csv.push_str(day);
    }
    csv.push('\n');

    for hour_index in 0..hours_count {
        csv.push_str(&hour_label(start_hour + hour_index as u32));
        for day in 0..DAYS_PER_WEEK {
            let names = grouped[day][hour_index].join(", ");
            csv.push_str(",\"");
            csv.push_str(&names.replace('"', "\"\""));
            csv.push('"');
        }
        csv.push('\n');
    }
    csv
}

/// Serializes the raw submission list for a coordinator download.
pub fn export_availability_csv(records: &[AvailabilityRecord]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut out = BOM.as_bytes().to_vec();
    let mut wtr = WriterBuilder::new().from_writer(&mut out);
    wtr.write_record(["id", "participantName", "submittedAt", "availabilityBits"])?;
    for record in records {
        wtr.write_record([
            record.id.to_string().as_str(),
            &record.participant_name,
            &record.submitted_at.to_rfc3339(),
            &record.availability_bits,
        ])?;
    }
    wtr.flush()?;
    drop(wtr);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::types::AssignedSlot;

    fn assignment(day: usize, hour_index: usize, assignee: &str) -> Assignment {
        Assignment {
            slot: AssignedSlot::new(day, hour_index, 12),
            assignee: assignee.to_string(),
        }
    }

    #[test]
    fn monday_cell_holds_sorted_quoted_names() {
        let assignments = vec![assignment(0, 0, "Kim"), assignment(0, 0, "Lee")];
        let csv = export_optimized_csv(&assignments, 12, 14);
        let body = csv.strip_prefix(BOM).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "시간,월,화,수,목,금");
        assert_eq!(lines[1], "12:00-13:00,\"Kim, Lee\",\"\",\"\",\"\",\"\"");
        assert_eq!(lines[2], "13:00-14:00,\"\",\"\",\"\",\"\",\"\"");
    }

    #[test]
    fn export_starts_with_a_byte_order_mark() {
        let csv = export_optimized_csv(&[], 12, 13);
        assert!(csv.starts_with('\u{FEFF}'));
    }

    #[test]
    fn export_is_deterministic() {
        let assignments = vec![
            assignment(1, 0, "박지현"),
            assignment(1, 0, "김민수"),
            assignment(4, 1, "Lee"),
        ];
        let first = export_optimized_csv(&assignments, 12, 14);
        let second = export_optimized_csv(&assignments, 12, 14);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_cells_are_still_quoted() {
        let csv = export_optimized_csv(&[], 9, 10);
        assert!(csv.contains("9:00-10:00,\"\",\"\",\"\",\"\",\"\""));
    }

    #[test]
    fn availability_export_lists_every_record() {
        use chrono::Utc;
        let records = vec![AvailabilityRecord {
            id: 1,
            participant_name: "김민수".to_string(),
            availability_bits: "1".repeat(20),
            submitted_at: Utc::now(),
        }];
        let bytes = export_availability_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{FEFF}'));
        assert!(text.contains("id,participantName,submittedAt,availabilityBits"));
        assert!(text.contains("김민수"));
    }
}

pub mod aggregate;
pub mod export;
pub mod optimizer;
pub mod types;

pub use aggregate::{group_by_slot, slot_summary_label, summarize, ParticipantSummary};
pub use export::{export_availability_csv, export_optimized_csv, EXPORT_FILENAME};
pub use optimizer::{optimize, OptimizeOptions};
pub use types::{AssignedSlot, Assignment, Schedule, ScheduleOptions};

//! Weekly availability coordination: a Mon-Fri half-hour availability
//! grid with a drag-select editor, an assignment optimizer over the
//! collected submissions, and CSV export of the optimized roster.

pub mod grid;
pub mod roster;
pub mod store;
pub mod web;

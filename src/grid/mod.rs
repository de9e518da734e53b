pub mod bitmap;
pub mod buffer;
pub mod editor;
pub mod session;
pub mod slot;

pub use bitmap::{AvailabilityBitmap, Cell};
pub use buffer::{commit_buffer, display_overlay, DisplayCell};
pub use editor::{DragState, GridEditor};
pub use session::EditorSession;
pub use slot::{DAYS_PER_WEEK, DAY_NAMES};

pub mod media;
pub mod media_ids;
pub mod report;
pub mod watch_history;

pub use media::{CatalogEntity, MediaKind};
pub use media_ids::ExternalIds;
pub use report::{Reason, Report, ReportItem, UserWatch};
pub use watch_history::{HistoryEvent, HistoryMediaKind, RawHistoryEntry};

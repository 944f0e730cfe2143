pub mod error;
pub mod normalize;
pub mod history;
pub mod keyed;
pub mod activity;
pub mod watch;
pub mod exceptions;
pub mod evaluate;
pub mod ranking;
pub mod scan;
pub mod report;
pub mod enrich;

pub use error::{CoreError, Result};
pub use normalize::{normalize_title, normalize_title_with_year};
pub use history::{extract_ids, parse_history_entry, watch_seconds};
pub use keyed::{EntityKey, KeyedIndex};
pub use activity::{ActivityIndex, ActivityWindow};
pub use watch::{UserSeconds, WatchIndex};
pub use exceptions::{clean_path, ExceptionIndex};
pub use evaluate::{evaluate, DecisionPolicy, LowWatchRule};
pub use ranking::{sort_report, SortKey, SortOrder};
pub use scan::{ScanInput, ScanOptions};
pub use report::Summary;
pub use enrich::enrich_exceptions;

pub mod record;
pub mod storage;

pub use record::{header_row, LogRecord, HEADER, TIER_HEADER};
pub use storage::{ResultLog, DEFAULT_LOG_FILE};

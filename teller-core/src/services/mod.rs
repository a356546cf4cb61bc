//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions.

mod bank;
pub mod logging;
pub mod status;

pub use bank::{Bank, Credentials, LoadReport};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService, SKIPPED_RECORD_EVENT};
pub use status::{AccountSummary, StatusSummary};

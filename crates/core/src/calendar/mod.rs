//! Calendar intent execution

pub mod format;
pub mod ports;
pub mod service;

pub use format::format_outcome;
pub use ports::CalendarBackend;
pub use service::CalendarService;

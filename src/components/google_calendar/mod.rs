mod actor;
mod handle;
pub mod models;

pub use handle::GoogleCalendarHandle;
pub use models::{CalendarEvent, EventDateTime, EventFilter, OrderBy};

mod format;
mod stopwatch;
mod ticker;

pub use format::format_time;
pub use stopwatch::{Clock, TickToken};
pub use ticker::Ticker;

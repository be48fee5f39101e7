mod machine;
mod snapshot;
mod tracker;
mod transition;

pub use machine::SessionStateMachine;
pub use snapshot::SessionSnapshot;
pub use tracker::WordIndexTracker;
pub use transition::{Command, Phase};

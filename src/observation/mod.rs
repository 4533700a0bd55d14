//! Layout events and the chronicle written alongside each run.

mod chronicle;
mod events;

pub use chronicle::{narrate, Chronicle};
pub use events::LayoutEvent;

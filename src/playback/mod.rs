//! Which day is shown, and whether it advances on its own.

pub mod controller;
pub mod session;
pub mod ticker;

pub use controller::{PlayState, PlaybackController, PlaybackState, TickToken};
pub use session::PlaybackSession;
pub use ticker::Ticker;

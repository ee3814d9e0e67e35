//! Platform abstraction layer
//!
//! Frame scheduling lives here so the game can stop and resume its own
//! loop; the browser and native hosts only ask whether to request another
//! frame.

pub mod scheduler;

pub use scheduler::FrameScheduler;

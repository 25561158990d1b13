//! CollabCanvas session runner
//!
//! Replays scripted host events (pointer, keyboard, focus, network and
//! document-stream signals) through the interaction core and reports the
//! resulting state.

pub mod script;
pub mod session;

pub use script::{Script, ScriptError, ScriptEvent};
pub use session::{Session, StepRecord, Summary};

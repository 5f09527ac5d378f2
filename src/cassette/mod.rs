//! Cassette format for recording and replaying subprocess interactions.
//!
//! Setting `SCAFFOLD_RECORD=<file>` records every git and shell call made by
//! the initializer; the resulting YAML can be replayed with
//! [`crate::context::ServiceContext::replaying`].

pub mod format;
pub mod recorder;
pub mod replayer;

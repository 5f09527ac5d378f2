//! Adapter implementations of the port traits.
//!
//! - `live`: real disk, processes and clock.
//! - `memory`: an in-memory filesystem test double.
//! - `recording`: wraps live adapters and writes a cassette.
//! - `replaying`: serves git and shell calls from a cassette.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;

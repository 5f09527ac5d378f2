//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the scaffold pipeline and an
//! external system (time, filesystem, git, shell). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod git;
pub mod shell;

pub use clock::Clock;
pub use filesystem::{FileSystem, WalkEntry, WalkFilter, WalkIter};
pub use git::GitRepo;
pub use shell::{ShellExecutor, ShellOutput};

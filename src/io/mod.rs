//! I/O operations module
//!
//! Contains the filesystem abstraction used by workers and the random
//! payload they write.

pub mod disk;
pub mod payload;

pub use disk::{
    read_until_full, DirEntryInfo, DiskIO, EntryKind, PlatformDiskIO, ReadOutcome, ReadStep,
};
pub use payload::Payload;

//! swcvox-io: File I/O for swcvox.
//!
//! This crate reads SWC files through memory-mapped I/O via memmap2,
//! loads JSON import configuration, and writes rendered scenes, skeleton
//! volumes and point tables.
//!

pub mod config;
mod error;
mod reader;
mod writer;

pub use config::ImportConfig;
pub use error::{Error, Result};
pub use reader::{MappedFileReader, SwcFileImporter};
pub use writer::{write_skeleton_header, DataFileWriter, SkeletonHeader};

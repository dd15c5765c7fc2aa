//! Track document format version.

/// Major version of the JSON track document format understood by this crate.
pub const TRACK_FORMAT_MAJOR: u32 = 1;

/// Minor version written by tools targeting this crate.
pub const TRACK_FORMAT_MINOR: u32 = 0;

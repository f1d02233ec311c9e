//! INI codec for engine configuration files.
//!
//! Engine INI files are edited by hand, by the editor and by other plugins.
//! [`document::IniDocument`] therefore keeps every line it does not touch
//! byte-for-byte (comments, blank lines, `+Key=` array entries, unknown
//! syntax) and only rewrites the entries it is asked to change.

pub mod document;

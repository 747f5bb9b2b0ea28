//! Checks that a rewritten program still behaves like its source.

pub mod equiv;

//! Levelwatch — replay and reporting glue shared by the binary and its tests.

pub mod replay;

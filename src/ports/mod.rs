//! Port traits: the effectful boundaries of a run.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;

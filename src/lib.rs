//! # factq
//!
//! Order-preserving parallel evaluation of text records.
//!
//! Each input line is classified as an integer or opaque text. Integers get
//! their factorial computed with arbitrary precision on a fixed-size worker
//! pool. A sequencer writes one row per input line, in input order.

pub mod compute;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod telemetry;

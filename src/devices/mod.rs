//! Sensor protocol implementations

pub mod mmwave;

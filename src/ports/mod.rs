//! Boundary traits the domain consumes; adapters implement them.

pub mod data_port;

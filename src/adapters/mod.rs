//! Concrete implementations of the port traits.

pub mod csv_adapter;

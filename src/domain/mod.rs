//! Core domain types and logic.

pub mod num;
pub mod bar;
pub mod series;
pub mod slicer;
pub mod indicator;
pub mod strategy;
pub mod strategies;
pub mod trade;
pub mod runner;
pub mod criteria;
pub mod error;

// src/models/mod.rs

pub mod attempt;
pub mod dashboard;
pub mod exam;
pub mod user;

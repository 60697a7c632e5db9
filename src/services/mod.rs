// src/services/mod.rs

pub mod dashboard;
pub mod exam_engine;

pub use dashboard::DashboardAggregator;
pub use exam_engine::ExamEngine;

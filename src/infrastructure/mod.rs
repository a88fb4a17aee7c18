//! Infrastructure layer - External service implementations

pub mod agent;
pub mod dataset;
pub mod llm;
pub mod logging;
pub mod registry;
pub mod storage;

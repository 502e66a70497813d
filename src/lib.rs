// Core personalization engine
pub mod merge;

// Infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Application layer
pub mod api;
pub mod server;

//! Builders to construct runners.

pub mod runner_builder;

pub use runner_builder::TasksRunnerBuilder;

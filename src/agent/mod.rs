//! Agents that make up a crew.

pub mod agent;

pub use agent::Agent;

//! Domain layer for style-guard
//!
//! CDD Principle: Domain Model - Pure business logic for style enforcement
//! - Contains the violation, location and report entities
//! - Independent of infrastructure concerns like file systems or terminals
//! - Expresses the ubiquitous language of rules, findings and verdicts

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;

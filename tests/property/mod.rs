//! Property-based tests for treesnap

mod determinism;

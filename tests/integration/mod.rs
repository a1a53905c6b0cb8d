//! Integration tests for treesnap

mod store_roundtrip;
mod tree_determinism;
mod tree_structure;

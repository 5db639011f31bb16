//! Property-based tests for registry and substitutability guarantees

mod substitutability;

//! Unit tests for the rental SDK

pub mod breaker_tests;

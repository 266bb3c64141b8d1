//! Shared test helpers for `famcal-core` integration tests.
//!
//! Lightweight in-memory mocks for the three ports so tests can focus on
//! service behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod chat;

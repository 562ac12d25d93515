//! Shared fixtures for the integration tests.

// Each integration test binary compiles this module separately, so
// helpers unused by one binary would otherwise warn.
#![allow(dead_code)]

pub mod audio_fixtures;

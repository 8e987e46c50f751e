//! Integration tests for the processor module
//!
//! Tests the complete import pipeline using snapshot fixtures on disk.

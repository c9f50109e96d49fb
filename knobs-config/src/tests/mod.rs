//! Integration tests for the Knobs configuration system

pub mod file_formats;

//! Voice Gate - confidence-gated spreadsheet command interpreter

pub mod command;
pub mod core;
pub mod llm;

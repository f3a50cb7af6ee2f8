//! Built-in node implementations registered at startup.

pub mod code_review;

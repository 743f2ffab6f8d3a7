//! Unit tests for the chat module.
//!
//! Tests are organised by concern, covering happy paths, rejections, and
//! the edge cases of timestamp handling.

//! Server URL template matcher.
//!
//! Parses server URL templates with `{name}` placeholders and matches
//! concrete URLs against them, capturing placeholder values in template
//! order. Matching is a single linear scan with no backtracking.

pub mod template;

pub use template::{match_template, parameter_names, strip_query, TemplateError, TemplateMatch};

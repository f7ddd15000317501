//! Table Uniformity Method (TUM) for delimiter detection.
//!
//! Scoring follows "Wrangling Messy CSV Files by Detecting Row and Type
//! Patterns" by van den Burg, Nazábal, and Sutton (2019): each candidate
//! dialect parses the sample into a table whose field-count uniformity and
//! per-column type consistency decide the winner.

pub mod potential_dialects;
pub mod regexes;
pub mod score;
pub mod table;
pub mod type_detection;
pub mod uniformity;

//! Input validation and sanitization for review submissions

pub mod rating;
pub mod review_text;

//! Matching engine — scores candidates against job postings and explains skill gaps.
//!
//! Data flows one way: records → documents → TF-IDF vectors → similarity →
//! composite scores → filtered, ranked, annotated results.

pub mod document;
pub mod handlers;
pub mod ranking;
pub mod scoring;
pub mod skill_gap;
pub mod stopwords;
pub mod vector_space;

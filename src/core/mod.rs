//! Core traversal logic: path types, segmentation, resolution, reshaping and
//! shape documents.

pub mod parser;
pub mod reshape;
pub mod resolver;
pub mod segment;
pub mod types;

//! Open-addressing containers with prime-number capacities.
//!
//! # primetable::OpenTable
//! A dynamically resizing open-addressing hash table using double hashing, with
//! growth, shrinkage, and tombstone compaction all realized by a single rebuild
//! operation.
//!
//! # primetable::SparseMatrix
//! A sparse two-dimensional `f32` matrix that stores only its non-zero cells in an
//! [`OpenTable`] keyed by packed coordinates.

mod equivalent;
pub use equivalent::Equivalent;

pub mod open_table;
pub use open_table::OpenTable;

pub mod sparse_matrix;
pub use sparse_matrix::SparseMatrix;

#[cfg(test)]
mod tests;

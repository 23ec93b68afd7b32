pub mod capella;
pub mod error;
pub mod unphased;

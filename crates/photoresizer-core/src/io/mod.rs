pub mod gallery;
pub mod probe;

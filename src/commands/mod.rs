pub mod clone;
pub mod sync;

pub mod collector;
pub mod source;
pub mod summary;

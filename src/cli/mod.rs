pub mod build;
pub mod show;
pub mod validate;

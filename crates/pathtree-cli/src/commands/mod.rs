pub mod build;
pub mod graft;
pub mod merge;
pub mod walk;

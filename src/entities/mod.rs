pub mod prelude;

pub mod ai_operations;
pub mod images;
pub mod projects;

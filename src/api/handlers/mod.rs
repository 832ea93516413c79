pub mod files;
pub mod health;
pub mod images;
pub mod operations;
pub mod projects;

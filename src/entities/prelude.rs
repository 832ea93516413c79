pub use super::ai_operations::Entity as AiOperations;
pub use super::images::Entity as Images;
pub use super::projects::Entity as Projects;

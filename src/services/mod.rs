pub mod image_service;
pub mod metadata;
pub mod operation_service;
pub mod processor;
pub mod project_service;
pub mod storage;
pub mod worker;

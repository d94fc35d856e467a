// Error mapping, the response envelope and JSON helpers shared by every route

pub mod error_handler;
pub mod json;
pub mod response_handler;

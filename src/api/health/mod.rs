// Health check route group

pub mod handler;
pub mod routes;

// HTTP surface: route groups and request middleware

pub mod health;
pub mod middleware;
pub mod topics;

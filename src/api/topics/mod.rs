// Topic suggestion endpoints

pub mod handler;
pub mod routes;

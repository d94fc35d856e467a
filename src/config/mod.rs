// Environment configuration and the shared application state built from it

pub mod environment;
pub mod state;

// Request middleware

pub mod viewer;

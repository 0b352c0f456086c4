pub mod auth;
pub mod core;
pub mod courses;
pub mod invoices;
pub mod learners;
pub mod resources;
pub mod tracks;

// JSON API and router assembly
pub mod handlers;
pub mod models;
pub mod routes;

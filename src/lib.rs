pub mod catalog;
pub mod common;
pub mod models;
pub mod payments;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod usecases;

pub mod catalog;
pub mod query;
pub mod root_route;

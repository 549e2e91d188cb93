pub mod catalog_response;
pub mod list_indexes_route;
pub mod list_namespaces_route;

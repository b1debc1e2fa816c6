pub mod auth;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod data_service;
pub mod entity_form;
pub mod entity_list;
pub mod entity_schema;
pub mod rest_data_service;
pub mod session;
pub mod sqlite_data_service;

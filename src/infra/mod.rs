pub mod http_client;
pub mod table_store;

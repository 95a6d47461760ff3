pub mod api_handler;
pub mod http;
pub mod in_memory;

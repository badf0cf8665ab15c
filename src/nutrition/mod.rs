pub mod aggregate;
pub mod client;
pub mod dto;
pub mod enrich;

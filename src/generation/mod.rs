pub mod client;
pub mod parser;
pub mod prompt;

pub mod http;
pub mod output;
pub mod parser;
pub mod progress;

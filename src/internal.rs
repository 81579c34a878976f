pub mod downloader;
pub mod http_client;
pub mod resolver;
pub mod states;

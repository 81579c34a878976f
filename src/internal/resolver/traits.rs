pub mod resolve;

pub use resolve::ResourceResolver;

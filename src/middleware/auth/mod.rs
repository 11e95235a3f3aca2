pub mod access;
mod context;

pub use context::HttpRequestContext;

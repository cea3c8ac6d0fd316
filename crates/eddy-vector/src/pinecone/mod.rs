//! Pinecone vector store backend.

mod backend;
mod config;

pub use backend::PineconeBackend;
pub use config::PineconeConfig;

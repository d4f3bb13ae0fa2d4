mod client;
mod store;
mod types;

pub use client::{API_KEY_HEADER, RemoteClient, RemoteSettings, auth_headers, normalize_base_url};
pub use store::RemoteStore;
pub use types::{ListingPage, MetadataNode, NodeType, ResourceType};

//! Discovery Layer
//!
//! Catalog listing, description fetching and resource-tree flattening.

pub mod client;
pub mod tree;

pub use client::{CatalogPage, DirectoryClient, DiscoveryApi, HttpDiscovery, SharedDiscovery};
pub use tree::{ApiDescription, extract_methods, extract_methods_with_depth};

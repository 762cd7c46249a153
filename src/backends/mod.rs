// Host service implementations built on the crate's own dependency stack
// Hosts with native networking or storage supply their own implementations of the service traits

pub mod datastore;
pub mod image_utils;
pub mod network;

pub use datastore::InMemoryDataStore;
pub use image_utils::{HttpImageFetcher, ImageCacheConfig};
pub use network::ReqwestNetworkService;

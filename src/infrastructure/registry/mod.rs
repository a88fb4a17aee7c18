//! Remote dataset registry client

mod archive;
mod client;
mod transport;

pub use archive::{ArchiveEntry, build_archive, read_archive};
pub use client::{
    DEFAULT_APP_URL, DEFAULT_REGISTRY_URL, REGISTRY_API_KEY_ENV, REGISTRY_URL_ENV, RegistryClient,
    RegistryConfig,
};
pub use transport::{HttpRegistryTransport, RegistryTransport, TransportResponse};

#[cfg(test)]
pub use transport::mock;

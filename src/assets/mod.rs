//! Frame resources: naming scheme, fetching and decoding.

/// Frame decoding into paint-ready images.
pub mod decode;
/// Byte sources for frame resources.
pub mod fetch;
/// Frame naming scheme and request construction.
pub mod naming;

//! End-to-end scenarios through the `Mappin` facade.
//!
//! Every test drives the full stack: executor, security layer, domain
//! components and the in-memory stores.
//!
//! ```bash
//! cargo test --test service_scenarios
//! ```

mod test_utils;

mod engagement;
mod feed;
mod friends;
mod profile;
mod sessions;

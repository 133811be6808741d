//! Stream Deck host integration.
//!
//! The host launches the plugin with a port and registration details, then
//! talks JSON over a local WebSocket. Lifecycle events are routed to the
//! [`MonitorRegistry`](crate::MonitorRegistry); rendered tiles go back as
//! `setImage` / `setTitle` frames through [`HostDisplay`].

mod connection;
mod image;
pub mod protocol;

pub use connection::{run, HostDisplay, RegistrationParams, Router};
pub use image::{data_url, encode_bmp};

// #![warn(missing_docs)]

//! Server side websocket upgrade over raw streams.
//!
//! ## Features
//! - Upgrade an http request to a websocket connection, taking the
//!   underlying stream over from the http layer.
//! - Send and receive unfragmented text frames.
//! - Deadline and cancellation on top of any blocking transport.
//! - Logging through an injected [`log::Log`] implementation.
//!
//! Fragmented messages, binary/ping/pong frames and extensions
//! are not supported: such frames are rejected with an error.
//!
//! ## High-level API
//!
//! - [`http`]
//! - [`negotiate`]
//! - [`conn`]
//!
//! ```ignore
//! {
//!     // read an http request from a raw stream
//!     let mut headers = HttpHeader::new_storage();
//!     let mut request = Request::new(&mut headers);
//!     let mut w = http::read_request(tcp, &mut buf, &mut request)?;
//!     // handshake
//!     let mut conn = negotiate(&request, &mut w)?;
//!     // echo
//!     let message = conn.receive()?;
//!     conn.send(&message)?;
//! }
//! ```
//!
//! ## Low-level API
//!
//! - [`frame`]
//! - [`codec`]
//! - [`handshake`]
//!
//! ```ignore
//! {
//!     // encode a server frame
//!     let bytes = codec::encode(OpCode::Text, b"hello");
//!
//!     // decode a frame from a transport
//!     let frame = codec::decode(&mut io, &Config::new())?;
//!
//!     // decode a frame head
//!     let (head, offset) = FrameHead::decode(&buf)?;
//! }
//! ```

mod bleed;

pub mod config;
pub mod error;
pub mod frame;
pub mod codec;
pub mod handshake;
pub mod http;
pub mod logger;
pub mod transport;
pub mod negotiate;
pub mod conn;

pub use config::Config;
pub use conn::FramedConnection;
pub use error::Error;
pub use logger::Logger;
pub use negotiate::{negotiate, Negotiator};

//! Line-delimited JSON transport for the toolkit.
//!
//! Each request is `{"id", "method", "body"}` on one line; each reply is
//! `{"id", "ok": true, "body"}` or `{"id", "ok": false, "error": {code, message}}`.

pub mod router;
pub mod server;

pub use server::LineServer;

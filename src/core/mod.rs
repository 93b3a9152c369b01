//! Protocol-level building blocks shared by the service layer:
//! configuration, error taxonomy, request signing, wire envelopes, and
//! the message codec.

pub mod codec;
pub mod config;
pub mod errors;
pub mod signer;
pub mod types;

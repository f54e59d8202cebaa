//! Programmable DNS server.
//!
//! # Matched domains
//!
//! fakedns answers queries whose name matches one of the configured domain
//! patterns. The patterns are joined into a single alternation and compiled
//! once at startup; matching is unanchored, so wildcard-style entries work:
//!
//! ```json
//! { "domains": ["example.org", "test.*"], ... }
//! ```
//!
//! # A/AAAA round-robin
//!
//! `A` and `AAAA` queries for matched names are answered from the per-family
//! address pools, cycling through the configured order one address per query:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 +short example.org A
//! 127.0.0.1
//! ❯ dig @127.0.0.1 -p 5353 +short example.org A
//! 10.0.0.1
//! ```
//!
//! # Rebinding
//!
//! With a `rebind` block configured, each domain's queries are counted and,
//! once the count exceeds the threshold, the decoy address is served instead
//! of the pool:
//!
//! ```json
//! { "rebind": { "ipv4": "10.10.10.10", "threshold": 1 }, ... }
//! ```
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 +short example.org A
//! 127.0.0.1
//! ❯ dig @127.0.0.1 -p 5353 +short example.org A
//! 10.10.10.10
//! ```
//!
//! # TXT and MX
//!
//! Matched `TXT` queries serve the configured strings verbatim; matched `MX`
//! queries serve the configured exchange host at preference 10. Any other
//! record type gets an authoritative empty answer.
//!
//! # Upstream fallback
//!
//! Queries outside the matched set are relayed to the configured `upstream`
//! resolver and its answers adopted verbatim, making the responder
//! transparent for out-of-scope domains. Without an upstream the responder
//! stays authoritative-silent for them.

mod forwarder;
mod handlers;
pub mod server;

pub use handlers::Handler;
pub use server::new;

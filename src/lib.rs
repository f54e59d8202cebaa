//! fakedns
//!
//! A programmable DNS responder for security testing: simulate
//! attacker-controlled name resolution for a set of domain patterns while
//! staying transparent for everything else.
//!
//! For matched domains it serves attacker-chosen `A`/`AAAA` answers from
//! round-robin pools (optionally flipping to a decoy address after a query
//! threshold, emulating a [DNS-rebinding] attack) plus static `TXT`/`MX`
//! records; all non-matching queries are forwarded to a real upstream
//! resolver. See the [DNS server][crate::dns] module docs for query
//! behavior and the [`Config`][crate::config::Config] for the knobs.
//!
//! [DNS-rebinding]: https://en.wikipedia.org/wiki/DNS_rebinding
//!
#![warn(clippy::pedantic)]

#[doc(hidden)]
pub mod banner;
pub mod config;
pub mod dns;
pub mod error;
pub mod matcher;
pub mod pool;
pub mod rebind;

pub use config::{Config, SharedConfig};
pub use dns::new as new_dns;
pub use dns::Handler;
pub use matcher::DomainMatcher;
pub use pool::RoundRobin;
pub use rebind::Rebind;

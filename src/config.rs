use crate::error::Error;
use crate::matcher::DomainMatcher;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_server::client::rr::Name;

pub type SharedConfig = Arc<Config>;

/// TTL applied to every synthesized answer record when the config does not
/// specify one.
pub const DEFAULT_TTL: u32 = 60;

/// Appended to the upstream resolver address when no port is given.
pub const DEFAULT_DNS_PORT: u16 = 53;

const DEFAULT_REBIND_THRESHOLD: u32 = 1;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Domain patterns owned by this responder, joined into one alternation
    /// and compiled once at startup. An empty list matches every name.
    pub domains: Vec<String>,
    pub dns_udp_bind_addr: SocketAddr,
    pub dns_tcp_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub dns_tcp_timeout: Duration,
    /// Optional TLS stream listener. When absent the server only answers
    /// over UDP and plain TCP.
    pub dns_tls: Option<TlsConfig>,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    /// Round-robin pool of v4 answers for matched `A` questions.
    #[serde(default)]
    pub ipv4_addrs: Vec<Ipv4Addr>,
    /// Round-robin pool of v6 answers for matched `AAAA` questions.
    #[serde(default)]
    pub ipv6_addrs: Vec<Ipv6Addr>,
    pub rebind: Option<RebindConfig>,
    /// Static TXT strings served verbatim for matched `TXT` questions.
    #[serde(default)]
    pub txt: Vec<String>,
    /// Static MX exchange host for matched `MX` questions.
    pub mx: Option<String>,
    /// Upstream resolver (`ip:port`, or a bare IP that gets port 53) for
    /// questions outside the matched set. Without one, unmatched questions
    /// are answered authoritative-silent.
    pub upstream: Option<String>,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Deserialize, Debug, Clone)]
pub struct TlsConfig {
    pub bind_addr: SocketAddr,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Rebinding setup: a decoy address per family plus the query-count
/// threshold above which the decoy is served instead of the pool.
#[allow(clippy::module_name_repetitions)]
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RebindConfig {
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    #[serde(default = "default_rebind_threshold")]
    pub threshold: u32,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_rebind_threshold() -> u32 {
    DEFAULT_REBIND_THRESHOLD
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.validate()?;
        Ok(conf)
    }

    /// Compile the configured domain patterns.
    pub fn matcher(&self) -> Result<DomainMatcher, Error> {
        DomainMatcher::new(&self.domains)
    }

    /// The upstream resolver as a socket address, with the default DNS port
    /// appended when the config leaves it out.
    pub fn upstream_addr(&self) -> Result<Option<SocketAddr>, Error> {
        match &self.upstream {
            None => Ok(None),
            Some(upstream) => {
                if let Ok(addr) = upstream.parse() {
                    return Ok(Some(addr));
                }
                format!("{upstream}:{DEFAULT_DNS_PORT}")
                    .parse()
                    .map(Some)
                    .map_err(|_| Error::InvalidUpstream(upstream.clone()))
            }
        }
    }

    /// The MX exchange as a fully qualified name, growing a trailing root
    /// separator when the config leaves it out.
    pub fn mx_name(&self) -> Result<Option<Name>, Error> {
        match &self.mx {
            None => Ok(None),
            Some(mx) => {
                let fqdn = match mx.strip_suffix('.') {
                    Some(_) => Cow::Borrowed(mx.as_str()),
                    None => Cow::Owned(format!("{mx}.")),
                };
                Ok(Some(Name::from_str(&fqdn)?))
            }
        }
    }

    // Configuration errors are fatal at startup: a config that deserialized
    // but holds an uncompilable pattern, a bad upstream address or a bad MX
    // host must never reach the serving loop.
    fn validate(&self) -> Result<(), Error> {
        self.matcher()?;
        self.upstream_addr()?;
        self.mx_name()?;
        Ok(())
    }
}

use crate::error::Error;
use regex::Regex;

/// Compiled matcher deciding whether a query name is owned by this responder.
///
/// The configured domain strings are joined with `|` and compiled once at
/// startup; matching is unanchored, so `example.org` also matches
/// `sub.example.org` and wildcard-style entries like `example.*` work the way
/// the pattern syntax says they do. The compiled pattern is immutable and
/// shared read-only across all concurrent query handlers.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    re: Regex,
}

impl DomainMatcher {
    /// Compile `domains` into a matcher. A bad pattern is a configuration
    /// error; it is surfaced here, before the server starts serving.
    ///
    /// An empty domain list compiles to the empty pattern, which matches
    /// every name.
    pub fn new(domains: &[String]) -> Result<Self, Error> {
        let re = Regex::new(&domains.join("|"))?;
        Ok(DomainMatcher { re })
    }

    /// Whether `name` is owned by this responder. At most one trailing root
    /// separator is stripped before matching.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let name = name.strip_suffix('.').unwrap_or(name);
        self.re.is_match(name)
    }
}

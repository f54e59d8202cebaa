use crate::config::SharedConfig;
use crate::dns::forwarder;
use crate::error::Error;
use crate::matcher::DomainMatcher;
use crate::pool::RoundRobin;
use crate::rebind::Rebind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, error};
use trust_dns_proto::rr::rdata::MX;
use trust_dns_server::authority::MessageResponseBuilder;
use trust_dns_server::client::op::{Header, MessageType, OpCode, ResponseCode};
use trust_dns_server::client::rr::rdata::TXT;
use trust_dns_server::client::rr::{Name, RData, Record, RecordType};
use trust_dns_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};

const DEFAULT_MX_PREFERENCE: u16 = 10;

/// The per-question decision engine.
///
/// Each incoming question is matched against the compiled domain patterns.
/// Matched questions are answered from the address pools (or the rebind decoy
/// once a domain crosses the threshold) and the static TXT/MX config; all
/// other questions are relayed to the upstream resolver when one is
/// configured. A reply is always sent, empty or not.
#[derive(Clone)]
pub struct Handler {
    config: SharedConfig,
    matcher: DomainMatcher,
    v4_pool: Arc<RoundRobin<Ipv4Addr>>,
    v6_pool: Arc<RoundRobin<Ipv6Addr>>,
    rebind: Option<Arc<Rebind>>,
    mx: Option<Name>,
    upstream: Option<SocketAddr>,
}

impl Handler {
    pub fn new(config: SharedConfig) -> Result<Self, Error> {
        let matcher = config.matcher()?;
        let mx = config.mx_name()?;
        let upstream = config.upstream_addr()?;
        let rebind = config
            .rebind
            .map(|r| Arc::new(Rebind::new(r.ipv4, r.ipv6, r.threshold)));
        Ok(Handler {
            matcher,
            v4_pool: Arc::new(RoundRobin::new(config.ipv4_addrs.clone())),
            v6_pool: Arc::new(RoundRobin::new(config.ipv6_addrs.clone())),
            rebind,
            mx,
            upstream,
            config,
        })
    }

    async fn dispatch_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response: R,
    ) -> Result<ResponseInfo, Error> {
        // If it isn't a query, return NOTIMPL.
        if request.op_code() != OpCode::Query || request.message_type() != MessageType::Query {
            return self.handle_notimpl(request, response).await;
        }

        let name = request.query().name().to_string();
        let domain = name.strip_suffix('.').unwrap_or(&name);
        debug!(
            "received question: {} {}",
            request.query().query_type(),
            name
        );

        match self.resolve(domain, request.query().query_type()) {
            Some(rdata) => self.send_auth_resp(request, response, rdata).await,
            None => self.handle_fallback(request, response).await,
        }
    }

    /// Resolve one question against the configured domain set.
    ///
    /// Returns `Some` with the synthesized answer data when the name is owned
    /// by this responder (possibly empty: unhandled record types and drained
    /// pools answer silence, not errors), and `None` when the name is outside
    /// the matched set and belongs to the fallback path.
    ///
    /// When rebind tracking is configured, every question reaching the
    /// resolver is counted, before the match decision; counts for unmatched
    /// names are inert bookkeeping.
    fn resolve(&self, domain: &str, query_type: RecordType) -> Option<Vec<RData>> {
        if let Some(rebind) = &self.rebind {
            rebind.observe(domain);
        }

        if !self.matcher.matches(domain) {
            return None;
        }

        Some(match query_type {
            RecordType::A if self.v4_pool.has_entries() => vec![RData::A(self.ipv4(domain))],
            RecordType::AAAA if self.v6_pool.has_entries() => {
                vec![RData::AAAA(self.ipv6(domain))]
            }
            RecordType::TXT if !self.config.txt.is_empty() => {
                vec![RData::TXT(TXT::new(self.config.txt.clone()))]
            }
            RecordType::MX => match &self.mx {
                Some(mx) => vec![RData::MX(MX::new(DEFAULT_MX_PREFERENCE, mx.clone()))],
                None => Vec::new(),
            },
            _ => Vec::new(),
        })
    }

    fn ipv4(&self, domain: &str) -> Ipv4Addr {
        if let Some(rebind) = &self.rebind {
            if let Some(decoy) = rebind.active_v4(domain) {
                return decoy;
            }
        }
        self.v4_pool.next()
    }

    fn ipv6(&self, domain: &str) -> Ipv6Addr {
        if let Some(rebind) = &self.rebind {
            if let Some(decoy) = rebind.active_v6(domain) {
                return decoy;
            }
        }
        self.v6_pool.next()
    }

    // Relay a question outside the matched set to the upstream resolver and
    // adopt its answers verbatim. A failed exchange, or no upstream at all,
    // yields an authoritative empty reply.
    async fn handle_fallback<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let answers = match self.upstream {
            Some(upstream) => {
                let name: Name = request.query().name().into();
                match forwarder::exchange(
                    upstream,
                    request.header().id(),
                    name,
                    request.query().query_type(),
                )
                .await
                {
                    Ok(answers) => answers,
                    Err(err) => {
                        debug!("upstream exchange failed: {err}");
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };
        self.send_records(request, response_handle, answers).await
    }

    async fn handle_notimpl<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let response = MessageResponseBuilder::from_message_request(request);
        Ok(response_handle
            .send_response(response.error_msg(request.header(), ResponseCode::NotImp))
            .await?)
    }

    async fn send_auth_resp<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
        rdata: Vec<RData>,
    ) -> Result<ResponseInfo, Error> {
        let records: Vec<Record> = rdata
            .iter()
            .map(|rd| {
                Record::from_rdata(request.query().name().into(), self.config.ttl, rd.clone())
            })
            .collect();
        self.send_records(request, response_handle, records).await
    }

    async fn send_records<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
        records: Vec<Record>,
    ) -> Result<ResponseInfo, Error> {
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(header, records.iter(), &[], &[], &[]);
        Ok(response_handle.send_response(response).await?)
    }
}

#[async_trait::async_trait]
impl RequestHandler for Handler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        match self.dispatch_request(request, response_handle).await {
            Ok(info) => info,
            Err(error) => {
                error!("error in RequestHandler: {:?}", error);
                let mut header = Header::new();
                header.set_response_code(ResponseCode::ServFail);
                header.into()
            }
        }
    }
}

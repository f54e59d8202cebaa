use crate::config::{SharedConfig, TlsConfig};
use crate::dns::handlers::Handler;
use crate::error::Error;
use rustls::{Certificate, PrivateKey};
use std::fs::File;
use std::io::BufReader;
use tokio::net::{TcpListener, UdpSocket};
use trust_dns_server::ServerFuture;

pub async fn new(config: SharedConfig) -> anyhow::Result<ServerFuture<Handler>> {
    let udp_addr = config.dns_udp_bind_addr;
    let tcp_addr = config.dns_tcp_bind_addr;
    let tcp_timeout = config.dns_tcp_timeout;
    let tls = config.dns_tls.clone();
    let dns_handler = Handler::new(config)?;
    let mut dns_server = ServerFuture::new(dns_handler);
    dns_server.register_socket(UdpSocket::bind(udp_addr).await?);
    dns_server.register_listener(TcpListener::bind(tcp_addr).await?, tcp_timeout);
    if let Some(tls) = tls {
        let identity = tls_identity(&tls)?;
        dns_server.register_tls_listener(
            TcpListener::bind(tls.bind_addr).await?,
            tcp_timeout,
            identity,
        )?;
    }
    Ok(dns_server)
}

// Bad TLS material is a configuration error: surfaced here, before the
// server starts serving.
fn tls_identity(tls: &TlsConfig) -> Result<(Vec<Certificate>, PrivateKey), Error> {
    let mut cert_reader = BufReader::new(File::open(&tls.cert_path)?);
    let certs = rustls_pemfile::certs(&mut cert_reader)?
        .into_iter()
        .map(Certificate)
        .collect();

    let mut key_reader = BufReader::new(File::open(&tls.key_path)?);
    let mut keys = rustls_pemfile::pkcs8_private_keys(&mut key_reader)?;
    if keys.is_empty() {
        let mut key_reader = BufReader::new(File::open(&tls.key_path)?);
        keys = rustls_pemfile::rsa_private_keys(&mut key_reader)?;
    }
    let key = keys
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingTlsKey(tls.key_path.clone()))?;
    Ok((certs, PrivateKey(key)))
}

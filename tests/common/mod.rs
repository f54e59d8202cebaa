//! Shared test infrastructure for loopback integration tests.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use fakedns::{Config, Handler};
use tokio::net::UdpSocket;
use trust_dns_proto::op::{Message, MessageType, OpCode, Query};
use trust_dns_proto::rr::{Name, RData, Record, RecordType};
use trust_dns_server::ServerFuture;

pub fn base_config() -> Config {
    Config {
        domains: vec!["example.org".to_string()],
        dns_udp_bind_addr: "127.0.0.1:0".parse().unwrap(),
        dns_tcp_bind_addr: "127.0.0.1:0".parse().unwrap(),
        dns_tcp_timeout: Duration::from_secs(5),
        dns_tls: None,
        ttl: 60,
        ipv4_addrs: Vec::new(),
        ipv6_addrs: Vec::new(),
        rebind: None,
        txt: Vec::new(),
        mx: None,
        upstream: None,
    }
}

/// Start a real `ServerFuture` for `config` on a loopback UDP socket and
/// return the bound address.
pub async fn start_server(config: Config) -> SocketAddr {
    let handler = Handler::new(Arc::new(config)).expect("valid test config");
    let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = udp.local_addr().unwrap();
    let mut server = ServerFuture::new(handler);
    server.register_socket(udp);
    tokio::spawn(async move { server.block_until_done().await });
    addr
}

/// Send one UDP question to `server` and parse the reply.
pub async fn query(server: SocketAddr, name: &str, query_type: RecordType) -> Message {
    let mut msg = Message::new();
    msg.set_id(0x1234)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(Name::from_ascii(name).unwrap(), query_type));

    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket
        .send_to(&msg.to_vec().unwrap(), server)
        .await
        .unwrap();

    // Longer than the server's upstream exchange deadline, so a swallowed
    // upstream timeout still yields an observable (empty) reply here.
    let mut buf = vec![0_u8; 4096];
    let (len, _) = tokio::time::timeout(Duration::from_secs(10), socket.recv_from(&mut buf))
        .await
        .expect("no reply within deadline")
        .unwrap();
    Message::from_vec(&buf[..len]).unwrap()
}

/// Stub upstream resolver answering every question with a fixed A record at
/// TTL 300.
pub async fn start_stub_upstream(answer: Ipv4Addr) -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = vec![0_u8; 4096];
        loop {
            let Ok((len, src)) = socket.recv_from(&mut buf).await else {
                break;
            };
            let Ok(request) = Message::from_vec(&buf[..len]) else {
                continue;
            };
            let mut reply = Message::new();
            reply
                .set_id(request.id())
                .set_message_type(MessageType::Response)
                .set_op_code(OpCode::Query)
                .set_recursion_available(true);
            if let Some(q) = request.queries().first() {
                reply.add_query(q.clone());
                reply.add_answer(Record::from_rdata(
                    q.name().clone(),
                    300,
                    RData::A(answer),
                ));
            }
            let _ = socket.send_to(&reply.to_vec().unwrap(), src).await;
        }
    });
    addr
}

/// The A record payloads of a reply, in answer order.
pub fn a_answers(msg: &Message) -> Vec<Ipv4Addr> {
    msg.answers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::A(ip)) => Some(*ip),
            _ => None,
        })
        .collect()
}

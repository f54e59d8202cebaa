use crate::error::Error;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use trust_dns_proto::op::{Message, MessageType, OpCode, Query};
use trust_dns_proto::rr::{Name, Record, RecordType};

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_RESPONSE_SIZE: usize = 4096;

/// Relay a single question to `upstream` and return its answer records
/// verbatim. The exchange is bounded by [`EXCHANGE_TIMEOUT`]; callers treat
/// any error as "no answers" for the question being relayed.
pub(super) async fn exchange(
    upstream: SocketAddr,
    id: u16,
    name: Name,
    query_type: RecordType,
) -> Result<Vec<Record>, Error> {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, query_type));

    let bind_addr = match upstream {
        SocketAddr::V4(_) => "0.0.0.0:0",
        SocketAddr::V6(_) => "[::]:0",
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(upstream).await?;
    socket.send(&message.to_vec()?).await?;

    let mut buf = vec![0_u8; MAX_RESPONSE_SIZE];
    let len = tokio::time::timeout(EXCHANGE_TIMEOUT, socket.recv(&mut buf))
        .await
        .map_err(|_| Error::UpstreamTimeout(upstream))??;

    let mut reply = Message::from_vec(&buf[..len])?;
    Ok(reply.take_answers())
}

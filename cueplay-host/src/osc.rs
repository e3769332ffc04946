//! OSC client for AbletonOSC
//!
//! AbletonOSC listens on UDP 11000 and replies to 11001 using the same
//! address as the query. Replies are routed to whoever is waiting on that
//! address; several concurrent queries for the same address all get the
//! next reply.

use rosc::{OscMessage, OscPacket, OscType};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Largest UDP datagram; cue point lists for long sets don't fit the OSC MTU
const RECV_BUFFER_SIZE: usize = 65_536;

type Waiters = Arc<Mutex<HashMap<String, Vec<oneshot::Sender<Vec<OscType>>>>>>;

pub struct OscClient {
    socket: Arc<UdpSocket>,
    remote: SocketAddr,
    waiters: Waiters,
    receiver: JoinHandle<()>,
}

impl OscClient {
    /// Bind the reply port and start routing replies
    pub async fn connect(remote: SocketAddr, reply_port: u16) -> Result<Self> {
        let socket = Arc::new(UdpSocket::bind(("0.0.0.0", reply_port)).await?);
        let waiters: Waiters = Arc::new(Mutex::new(HashMap::new()));

        let receiver = tokio::spawn(receive_loop(Arc::clone(&socket), Arc::clone(&waiters)));
        debug!("OSC client bound to {} -> {}", socket.local_addr()?, remote);

        Ok(Self {
            socket,
            remote,
            waiters,
            receiver,
        })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    /// Fire-and-forget message
    pub async fn send_message(&self, address: &str, args: Vec<OscType>) -> Result<()> {
        let packet = OscPacket::Message(OscMessage {
            addr: address.to_string(),
            args,
        });
        let bytes = rosc::encoder::encode(&packet).map_err(|e| Error::Osc(format!("{:?}", e)))?;

        trace!("OSC send {}", address);
        self.socket.send_to(&bytes, self.remote).await?;
        Ok(())
    }

    /// Send `address` and wait up to `timeout` for the reply on the same address
    pub async fn query(
        &self,
        address: &str,
        args: Vec<OscType>,
        timeout: Duration,
    ) -> Result<Vec<OscType>> {
        let (tx, rx) = oneshot::channel();
        self.waiters
            .lock()
            .await
            .entry(address.to_string())
            .or_default()
            .push(tx);

        if let Err(e) = self.send_message(address, args).await {
            self.forget_closed(address).await;
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            _ => {
                // Our sender was dropped or is still registered; clean up either way
                self.forget_closed(address).await;
                Err(Error::Timeout(address.to_string()))
            }
        }
    }

    /// Drop waiters whose query already gave up
    async fn forget_closed(&self, address: &str) {
        let mut waiters = self.waiters.lock().await;
        if let Some(pending) = waiters.get_mut(address) {
            pending.retain(|tx| !tx.is_closed());
            if pending.is_empty() {
                waiters.remove(address);
            }
        }
    }
}

impl Drop for OscClient {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

async fn receive_loop(socket: Arc<UdpSocket>, waiters: Waiters) {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        let (len, from) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                // e.g. ICMP port unreachable surfaced on Windows while Live is down
                debug!("OSC receive error: {}", e);
                continue;
            }
        };

        let packet = match rosc::decoder::decode_udp(&buf[..len]) {
            Ok((_, packet)) => packet,
            Err(e) => {
                warn!("Undecodable OSC packet from {}: {:?}", from, e);
                continue;
            }
        };

        let mut messages = Vec::new();
        flatten(packet, &mut messages);

        let mut waiters = waiters.lock().await;
        for message in messages {
            trace!("OSC recv {} ({} args)", message.addr, message.args.len());
            match waiters.remove(&message.addr) {
                Some(pending) => {
                    for tx in pending {
                        let _ = tx.send(message.args.clone());
                    }
                }
                None => trace!("No waiter for {}", message.addr),
            }
        }
    }
}

/// Bundles may nest; collect every message in order
fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(message) => out.push(message),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                flatten(inner, out);
            }
        }
    }
}

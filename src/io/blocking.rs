// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of the blocking I/O provider.

// NOTE: In this provider, a failed *receive* ends the worker, since a
// socket that cannot receive is of no further use. Failed *sends* are
// logged and ignored, so we keep processing incoming messages as long
// as receiving continues to work.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, error, info};

use crate::server::Responder;
use crate::thread::ThreadGroup;

/// A blocking I/O provider.
///
/// This provider uses blocking I/O on a single UDP socket, employing a
/// configurable number of worker threads for concurrency. To shut it
/// down gracefully, shut down the [`ThreadGroup`] in which it was
/// started (see [`BlockingIoProvider::start`]); workers notice within
/// about a second.
pub struct BlockingIoProvider {
    config: BlockingIoConfig,
    udp_socket: UdpSocket,
}

/// Configuration options for the [`BlockingIoProvider`].
#[derive(Clone, Debug)]
pub struct BlockingIoConfig {
    /// The number of UDP worker threads to run.
    pub udp_workers: usize,
}

impl Default for BlockingIoConfig {
    fn default() -> Self {
        Self { udp_workers: 1 }
    }
}

impl BlockingIoProvider {
    /// Creates a new `BlockingIoProvider`. This call binds the UDP
    /// socket in preparation, but does not start serving.
    pub fn bind(config: BlockingIoConfig, addr: SocketAddr) -> io::Result<Self> {
        let udp_socket = UdpSocket::bind(addr)?;
        udp_socket.set_read_timeout(Some(CHECK_FOR_SHUTDOWN_TIMEOUT))?;
        Ok(Self { config, udp_socket })
    }

    /// Returns the address the socket is bound to. This is useful when
    /// binding to port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.udp_socket.local_addr()
    }

    /// Starts serving on the provided [`ThreadGroup`].
    ///
    /// The provider can be shut down later simply by shutting down the
    /// [`ThreadGroup`] provided here.
    pub fn start(
        self,
        responder: &Arc<Responder>,
        group: &Arc<ThreadGroup>,
    ) -> Result<(), crate::thread::Error> {
        for i in 0..self.config.udp_workers.max(1) {
            let name = format!("udp worker {i}");
            let group_clone = group.clone();
            let responder = responder.clone();
            let udp_socket = self.udp_socket.try_clone()?;
            let task = move || {
                log_io_errors(run_udp_worker(&group_clone, &responder, &udp_socket));
            };
            group.start_oneshot(Some(name), task)?;
        }
        info!(
            "Serving on {} with {} UDP workers",
            self.local_addr()?,
            self.config.udp_workers.max(1)
        );
        Ok(())
    }
}

/// This defines the timeout on UDP receive operations. UDP worker
/// threads check for thread group shutdown between every receive, so
/// this defines the *maximum* interval between such checks.
/// Consequently, it is the maximum amount of time the shutdown
/// procedure will have to wait for these threads to finish up.
const CHECK_FOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// The size of the receive buffer. This is the maximum UDP payload size
/// in unextended DNS.
const UDP_PAYLOAD_SIZE: usize = 512;

/// The UDP receive/handle/send loop.
fn run_udp_worker(
    group: &Arc<ThreadGroup>,
    responder: &Responder,
    socket: &UdpSocket,
) -> io::Result<()> {
    let mut received_buf = [0; UDP_PAYLOAD_SIZE];

    loop {
        if group.is_shutting_down() {
            return Ok(());
        }

        // Receive a DNS message. If interrupted, we skip the rest of
        // the loop body and check whether the group is shutting down
        // again before retrying. Otherwise, repeated interruptions
        // could in theory prevent the call from ever timing out.
        let (received_len, src) = match socket.recv_from(&mut received_buf) {
            Ok(pair) => pair,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        debug!("Received {} octets from {}", received_len, src);

        // Process the DNS message and send the response, if any.
        if let Some(response) = responder.handle_message(&received_buf[..received_len]) {
            // Don't exit the task if the send fails. (See the note at
            // the beginning of the module.)
            log_io_errors(retry_if_interrupted(|| socket.send_to(&response, src)));
        }
    }
}

/// Executes `f`, retrying the operation if it is interrupted.
fn retry_if_interrupted<F, R>(mut f: F) -> io::Result<R>
where
    F: FnMut() -> io::Result<R>,
{
    loop {
        match f() {
            Ok(r) => return Ok(r),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Logs errors if a task exits with an I/O error.
fn log_io_errors<T>(result: io::Result<T>) {
    if let Err(e) = result {
        let current_thread = thread::current();
        let thread_name = current_thread.name().unwrap_or("anonymous thread");
        error!("I/O error in thread {}: {}", thread_name, e);
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    use crate::class::Class;
    use crate::message::{Message, Question};
    use crate::rr::{Ttl, Type};

    #[test]
    fn serves_and_shuts_down() {
        let config = BlockingIoConfig { udp_workers: 2 };
        let provider = BlockingIoProvider::bind(config, (Ipv4Addr::LOCALHOST, 0).into()).unwrap();
        let server_addr = provider.local_addr().unwrap();
        let responder = Arc::new(Responder::new(Ipv4Addr::new(192, 0, 2, 7), Ttl::from(60)));
        let group = ThreadGroup::new();
        provider.start(&responder, &group).unwrap();
        assert_eq!(group.thread_count(), 2);

        let client = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let query = Message::new_query(
            Question {
                qname: "test.example.".parse().unwrap(),
                qtype: Type::A,
                qclass: Class::IN,
            },
            false,
        );
        client.send_to(&query.to_wire().unwrap(), server_addr).unwrap();
        let mut buf = [0; 512];
        let (len, _) = client.recv_from(&mut buf).unwrap();
        let response = Message::from_wire(&buf[..len]).unwrap();
        assert_eq!(response.header.id, query.header.id);
        assert_eq!(
            response.answers[0].rdata.display_as(Type::A).to_string(),
            "192.0.2.7"
        );

        group.shut_down();
        group.await_shutdown();
    }
}

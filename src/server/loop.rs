// Server loop module
// Owns the listening socket and runs the accept loop until shutdown

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use super::listener::create_listener;
use crate::config::AppState;
use crate::error::BindError;
use crate::logger;

/// A bound file server, ready to run
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket
    pub fn bind(addr: SocketAddr, state: Arc<AppState>) -> Result<Self, BindError> {
        let listener = create_listener(addr).map_err(|source| BindError { addr, source })?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` is notified
    ///
    /// Connections are served on local tasks, so this must run inside a
    /// `LocalSet`. Once shutdown fires no further connections are accepted
    /// and the listener is closed.
    #[allow(clippy::ignored_unit_patterns)]
    pub async fn run(self, shutdown: Arc<Notify>) -> io::Result<()> {
        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(stream, peer_addr, &self.state);
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                _ = shutdown.notified() => {
                    logger::log_shutdown();
                    break;
                }
            }
        }

        drop(self.listener);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_state(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::load().unwrap();
        cfg.logging.access_log = false;
        Arc::new(AppState::with_root(cfg, root).unwrap())
    }

    async fn roundtrip(addr: SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_serves_over_tcp_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        let state = test_state(dir.path());

        let server = Server::bind("127.0.0.1:0".parse().unwrap(), state).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let handle = tokio::task::spawn_local(server.run(Arc::clone(&shutdown)));

                let response = roundtrip(
                    addr,
                    b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
                assert!(response
                    .to_ascii_lowercase()
                    .contains("access-control-allow-origin: *"));
                assert!(response.ends_with("<h1>Hi</h1>"));

                let response = roundtrip(
                    addr,
                    b"POST /index.html HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 405"), "{response}");

                shutdown.notify_one();
                handle.await.unwrap().unwrap();
            })
            .await;

        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let first = Server::bind("127.0.0.1:0".parse().unwrap(), Arc::clone(&state)).unwrap();
        let addr = first.local_addr().unwrap();
        let err = Server::bind(addr, state).err().unwrap();
        assert_eq!(err.addr, addr);
        assert_eq!(err.source.kind(), io::ErrorKind::AddrInUse);
    }
}

//! Hyper server setup and request handling.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::server::conn::http1;
use hyper::{Request, Response, Result as HyperResult};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::router::Router;
use crate::store::Store;

/// HTTP server for the stub API.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Binds the listener. Use port 0 for an ephemeral port.
    pub async fn bind(addr: SocketAddr, router: Router) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accepts connections until the task is dropped or accepting fails.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        loop {
            let (stream, _) = self.listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            tokio::task::spawn(async move {
                if let Err(err) = http1::Builder::new()
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router.clone())),
                    )
                    .await
                {
                    tracing::warn!("Error serving connection: {}", err);
                }
            });
        }
    }
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> HyperResult<Response<Full<Bytes>>> {
    let response = match router.route(req).await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!("stub request rejected: {}", err);
            Response::from(err)
        }
    };
    Ok(response.map(Full::new))
}

/// A running stub bound to `127.0.0.1` on an ephemeral port.
///
/// The server task is aborted when the handle is dropped.
pub struct StubServer {
    addr: SocketAddr,
    store: Arc<Store>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Starts serving `store` on the current tokio runtime.
    pub async fn start(store: Store) -> Result<Self, std::io::Error> {
        let store = Arc::new(store);
        let server = Server::bind(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            Router::new(Arc::clone(&store)),
        )
        .await?;
        let addr = server.local_addr()?;

        let task = tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                tracing::error!("Stub server error: {}", e);
            }
        });

        Ok(Self { addr, store, task })
    }

    /// Base URL without the `/rest/v1` prefix.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

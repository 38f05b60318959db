//! Control-plane HTTP server: translates simulator requests into
//! [`labu_core::Controller`] calls.

mod dto;
mod error;
mod extract;
mod results;
mod routes;

pub use results::flush_results;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::Router;
use labu_core::Controller;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

async fn trace_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(%method, %path, %status, "request failed");
    } else {
        tracing::debug!(%method, %path, %status, "request handled");
    }
    response
}

pub fn router(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/clients", get(routes::list_clients))
        .route("/testsuite", post(routes::create_suite))
        .route("/testsuite/:suite", delete(routes::end_suite))
        .route("/testsuite/:suite/test", post(routes::create_test))
        .route("/testsuite/:suite/test/:test", post(routes::end_test))
        .route(
            "/testsuite/:suite/test/:test/node",
            post(routes::launch_node),
        )
        .route(
            "/testsuite/:suite/test/:test/node/:node",
            get(routes::node_info).delete(routes::remove_node),
        )
        .route(
            "/testsuite/:suite/test/:test/node/:node/exec",
            post(routes::node_exec),
        )
        .route(
            "/testsuite/:suite/network/:name",
            post(routes::create_network).delete(routes::remove_network),
        )
        .route(
            "/testsuite/:suite/network/:name/:node",
            post(routes::connect_network)
                .delete(routes::disconnect_network)
                .get(routes::network_ip),
        )
        .fallback(routes::not_found)
        .layer(middleware::from_fn(trace_requests))
        .with_state(controller)
}

/// A server bound and running in the background; `shutdown` drives graceful
/// teardown via the `oneshot` the driver holds the sender half of.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl ServerHandle {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.join.await {
            tracing::warn!(error = %e, "control-plane server task panicked");
        }
    }
}

/// Binds to `127.0.0.1:0` and spawns the server on a background task,
/// returning once the concrete port is known.
pub async fn spawn(controller: Arc<Controller>) -> std::io::Result<ServerHandle> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let app = router(controller);

    let join = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "control-plane server exited with an error");
        }
    });

    tracing::debug!(%addr, "control-plane server listening");
    Ok(ServerHandle {
        addr,
        shutdown: Some(tx),
        join,
    })
}

use crate::commands::Out;
use crate::source::FIXTURE_JSON;
use crate::Result;
use anyhow::Context;
use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// The routes of the fixture server: `GET /api/data` returns the bundled dataset.
pub fn router() -> Router {
    // The dashboard may be opened from any origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let api_routes = Router::new().route("/data", get(get_data));

    Router::new().nest("/api", api_routes).layer(cors)
}

async fn get_data() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], FIXTURE_JSON)
}

/// Serves the bundled dataset on `addr` until Ctrl-C is pressed.
pub async fn serve(addr: SocketAddr) -> Result<Out<String>> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to listen on {addr}"))?;
    serve_listener(listener, async {
        // An error here means the signal could not be installed, stop right away in that case.
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;
    Ok("The server has stopped".into())
}

/// Serves the bundled dataset on an already bound `listener` until `shutdown` completes.
pub async fn serve_listener<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("Unable to read the listener address")?;
    info!("Serving the bundled dataset at http://{addr}/api/data");
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("The server failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{self, RemoteSource, Source, SourceKind};
    use tokio::sync::oneshot;
    use url::Url;

    async fn start() -> (Url, oneshot::Sender<()>, tokio::task::JoinHandle<Result<()>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve_listener(listener, async {
            let _ = rx.await;
        }));
        let url = Url::parse(&format!("http://{addr}/api/data")).unwrap();
        (url, tx, handle)
    }

    #[tokio::test]
    async fn test_remote_source_against_fixture_server() {
        let (url, stop, handle) = start().await;

        let remote = RemoteSource::new(url.clone()).unwrap().fetch().await.unwrap();
        let fixture = source::load(SourceKind::Fixture, &url).await.unwrap();
        assert_eq!(remote, fixture);

        stop.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unknown_path_is_an_error() {
        let (url, stop, handle) = start().await;

        let missing = url.join("/api/nothing").unwrap();
        let err = RemoteSource::new(missing).unwrap().fetch().await.unwrap_err();
        assert!(err.to_string().contains("404"));

        stop.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}

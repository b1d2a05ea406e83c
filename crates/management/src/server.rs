//! Ads API server: the management router behind CORS and HTTP tracing.

use crate::handlers::ManagementState;
use crate::router::management_router;
use ads_core::config::ServerConfig;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ManagementServer {
    config: ServerConfig,
    state: ManagementState,
}

impl ManagementServer {
    pub fn new(config: ServerConfig) -> Self {
        let state = ManagementState::new(config.token_ttl_hours, config.seed_demo_data);
        Self { config, state }
    }

    pub fn state(&self) -> &ManagementState {
        &self.state
    }

    pub fn router(&self) -> Router {
        management_router(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(SocketAddr::new(self.config.host.parse()?, self.config.port))
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn start_http(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let addr = self.addr()?;
        info!(addr = %addr, "Starting HTTP server");
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener. Tests bind port 0 and read the
    /// address back before calling this.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("HTTP server stopped");
        Ok(())
    }

    /// Start the Prometheus exporter when a metrics port is configured.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        let Some(port) = self.config.metrics_port else {
            return Ok(());
        };
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(self.config.host.parse()?, port))
            .install()?;
        info!(port, "Metrics exporter started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_from_config() {
        let server = ManagementServer::new(ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8085,
            ..ServerConfig::default()
        });
        assert_eq!(server.addr().unwrap(), "127.0.0.1:8085".parse().unwrap());

        let bad = ManagementServer::new(ServerConfig {
            host: "not an ip".to_string(),
            ..ServerConfig::default()
        });
        assert!(bad.addr().is_err());
    }

    #[test]
    fn test_metrics_disabled_without_port() {
        let server = ManagementServer::new(ServerConfig::default());
        assert!(server.start_metrics().is_ok());
    }

    #[tokio::test]
    async fn test_router_shares_server_state() {
        use axum::body::Body;
        use axum::http::{header, Request, StatusCode};
        use tower::ServiceExt;

        let server = ManagementServer::new(ServerConfig {
            seed_demo_data: false,
            ..ServerConfig::default()
        });
        assert!(!server.state().seed_demo_data);
        assert_eq!(server.state().auth.user_count(), 0);

        let request = Request::post("/api/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"ops@example.com","password":"pw"}"#))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(server.state().auth.user_count(), 1);
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let server = ManagementServer::new(ServerConfig::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
        });
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}

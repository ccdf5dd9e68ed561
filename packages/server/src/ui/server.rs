//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{IdentityResolver, MessagePusher},
    usecase::{EventDispatcher, GetPresenceUseCase},
};

use super::{
    handler::{get_room_presence, health_check, list_presence, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Study-room presence server
///
/// This struct encapsulates the server dependencies and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(dispatcher, message_pusher, identity_resolver, get_presence_usecase);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// EventDispatcher（受信イベントの振り分け）
    dispatcher: Arc<EventDispatcher>,
    /// MessagePusher（接続ごとの送信）
    message_pusher: Arc<dyn MessagePusher>,
    /// IdentityResolver（接続時の本人確認）
    identity_resolver: Arc<dyn IdentityResolver>,
    /// GetPresenceUseCase（在室状況取得のユースケース）
    get_presence_usecase: Arc<GetPresenceUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `dispatcher` - Routes inbound session events to their use cases
    /// * `message_pusher` - Delivers outbound events to connections
    /// * `identity_resolver` - Resolves the identity of a connecting client
    /// * `get_presence_usecase` - UseCase for the read-only presence endpoints
    pub fn new(
        dispatcher: Arc<EventDispatcher>,
        message_pusher: Arc<dyn MessagePusher>,
        identity_resolver: Arc<dyn IdentityResolver>,
        get_presence_usecase: Arc<GetPresenceUseCase>,
    ) -> Self {
        Self {
            dispatcher,
            message_pusher,
            identity_resolver,
            get_presence_usecase,
        }
    }

    /// Build the router with every endpoint
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            dispatcher: self.dispatcher,
            message_pusher: self.message_pusher,
            identity_resolver: self.identity_resolver,
            get_presence_usecase: self.get_presence_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/presence", get(list_presence))
            .route("/api/presence/{room_name}", get(get_room_presence))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws?user_id=<id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(
            "Study-room presence server listening on {}",
            listener.local_addr()?
        );

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

//! Study-room presence server.
//!
//! Tracks room presence over WebSocket and relays room events to every
//! connection of the users present in the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin zemi-server
//! cargo run --bin zemi-server -- --host 0.0.0.0 --port 3000 --rooms-file rooms.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use zemi_server::{
    domain::{RoomRepository, SessionState, Timestamp},
    infrastructure::{
        identity::QueryParamIdentityResolver, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::Server,
    usecase::{EventDispatcher, GetPresenceUseCase},
};
use zemi_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "zemi-server")]
#[command(about = "Study-room presence server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// JSON file with the rooms to load into the room store at startup
    #[arg(long)]
    rooms_file: Option<PathBuf>,

    /// Refuse WebSocket connections that do not carry a user_id
    #[arg(long)]
    require_identity: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Clock
    // 2. Repository
    // 3. MessagePusher / IdentityResolver
    // 4. Session state and UseCases
    // 5. Server

    // 1. Clock
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 2. Create Repository (in-memory room store, optionally seeded)
    let repository = match &args.rooms_file {
        Some(path) => {
            match InMemoryRoomRepository::from_seed_file(path, Timestamp::new(clock.now_millis()))
                .await
            {
                Ok(repository) => repository,
                Err(e) => {
                    tracing::error!("Failed to load rooms: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("No rooms file given, starting with an empty room store");
            InMemoryRoomRepository::new()
        }
    };
    match repository.list().await {
        Ok(rooms) => {
            for room in rooms {
                tracing::debug!(
                    "Room '{}' (owner '{}', {} member(s), capacity {})",
                    room.name,
                    room.owner,
                    room.members.len(),
                    room.max_participants
                );
            }
        }
        Err(e) => tracing::warn!("Failed to list rooms: {}", e),
    }
    let repository = Arc::new(repository);

    // 3. Create MessagePusher (WebSocket implementation) and IdentityResolver
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let identity_resolver = Arc::new(QueryParamIdentityResolver::new(args.require_identity));

    // 4. Create session state and UseCases
    let state = SessionState::shared();
    let dispatcher = Arc::new(EventDispatcher::new(
        state.clone(),
        repository,
        message_pusher.clone(),
        clock,
    ));
    let get_presence_usecase = Arc::new(GetPresenceUseCase::new(state));

    // 5. Create and run the server
    let server = Server::new(
        dispatcher,
        message_pusher,
        identity_resolver,
        get_presence_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

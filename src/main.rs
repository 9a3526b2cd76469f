use axum::{
  extract::{Path, State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use dashmap::DashMap;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod game;
mod protocol;
mod shared;
mod transport;

use app::room_name::sanitize_room_name;
use config::ServerConfig;
use game::room::Room;
use transport::ws_session::handle_socket;

struct AppState {
  rooms: DashMap<String, Arc<Room>>,
  config: ServerConfig,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  rooms: usize,
  players: usize,
  sessions: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::from_env()?;
  let address = SocketAddr::new(config.bind_address, config.port);
  tracing::info!(
    default_room = %config.default_room,
    trail_cap = config.room.trail_cap,
    trust_self_kill_hints = config.room.trust_self_kill_hints,
    "arena configured"
  );

  let state = Arc::new(AppState {
    rooms: DashMap::new(),
    config,
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/room/:room", get(room_ws_handler))
    .route("/ws", get(default_ws_handler))
    .layer(cors)
    .with_state(state);

  tracing::info!("listening on {address}");
  let listener = tokio::net::TcpListener::bind(address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

impl AppState {
  fn room(&self, name: &str) -> Arc<Room> {
    let cleaned = sanitize_room_name(name);
    let name = if cleaned.is_empty() {
      self.config.default_room.clone()
    } else {
      cleaned
    };
    match self.rooms.entry(name) {
      dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
      dashmap::mapref::entry::Entry::Vacant(entry) => {
        tracing::info!(room = %entry.key(), "opening arena");
        let room = Arc::new(Room::new(self.config.room));
        entry.insert(room.clone());
        room
      }
    }
  }
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let (players, sessions) = state.rooms.iter().fold((0, 0), |(players, sessions), entry| {
    let stats = entry.value().stats();
    (players + stats.players, sessions + stats.sessions)
  });
  Json(HealthResponse {
    ok: true,
    rooms: state.rooms.len(),
    players,
    sessions,
  })
}

async fn room_ws_handler(
  ws: WebSocketUpgrade,
  Path(room): Path<String>,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let room = state.room(&room);
  ws.on_upgrade(move |socket| handle_socket(socket, room))
}

async fn default_ws_handler(
  ws: WebSocketUpgrade,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let room = state.room("");
  ws.on_upgrade(move |socket| handle_socket(socket, room))
}

//! Session fixtures backed by in-memory ports.

use std::sync::Arc;

use scoreboard::{MemoryStore, MemorySync, RoundInput, SessionConfig, SessionService, SessionState};

pub struct Harness {
    pub service: SessionService,
    pub store: Arc<MemoryStore>,
    pub sync: Arc<MemorySync>,
}

pub async fn open(config: SessionConfig) -> Harness {
    open_with_store(config, MemoryStore::new()).await
}

pub async fn open_with_store(config: SessionConfig, store: MemoryStore) -> Harness {
    let store = Arc::new(store);
    let sync = Arc::new(MemorySync::new());
    let service = SessionService::open(&config, store.clone(), sync.clone())
        .await
        .expect("open session");
    Harness {
        service,
        store,
        sync,
    }
}

/// Open a session and join `names` with profile ids `p-<position>`.
pub async fn open_with_players(config: SessionConfig, names: &[&str]) -> Harness {
    let harness = open(config).await;
    for (i, name) in names.iter().enumerate() {
        harness
            .service
            .join(format!("p-{i}"), *name, "")
            .await
            .expect("join fixture player");
    }
    harness
}

/// Round over the whole roster where `winner` collects `remaining`.
pub fn remaining_input(state: &SessionState, winner: u32, remaining: &[(u32, i64)]) -> RoundInput {
    let mut input = RoundInput::new(&state.players, winner);
    for &(index, points) in remaining {
        input = input.with_remaining(index, points);
    }
    input
}

//! Authoritative session container.
//!
//! All mutations run under one async lock: the domain operation is applied
//! to a working copy, totals are refolded from it, and only then is the copy
//! committed and the version bumped. Persistence and remote sync happen
//! afterwards on a background outbox task and never block or fail a commit.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::session::SessionConfig;
use crate::domain::{
    new_transaction_id, score_round, split_bill, Balances, Bill, GameResult, Player, PlayerIndex,
    Points, ProfileId, RoundInput, SessionState, Transaction,
};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::protocol::board::BoardView;
use crate::repos::{SessionStore, SessionSync};
use crate::services::subscribers::{SessionEvent, SubscriberRegistry};

enum OutboxItem {
    Commit {
        state: SessionState,
        version: u64,
        push: bool,
    },
    Flush(oneshot::Sender<()>),
}

struct Inner {
    state: SessionState,
    totals: Balances<PlayerIndex>,
    version: u64,
    outbox: Option<mpsc::Sender<OutboxItem>>,
}

pub struct SessionService {
    inner: Mutex<Inner>,
    subscribers: Arc<SubscriberRegistry>,
    worker: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl SessionService {
    /// Load the last known state and start the outbox worker.
    ///
    /// A missing, unreadable or inconsistent stored document starts the
    /// session empty. Must be called inside a tokio runtime.
    pub async fn open(
        config: &SessionConfig,
        store: Arc<dyn SessionStore>,
        sync: Arc<dyn SessionSync>,
    ) -> Result<Self, AppError> {
        if config.unit_multiplier <= 0 {
            return Err(AppError::config(format!(
                "unit multiplier must be positive, but got: {}",
                config.unit_multiplier
            )));
        }

        let state = match store.load().await {
            Ok(Some(state)) => match state.compute_net_balances() {
                Ok(_) => state,
                Err(err) => {
                    warn!(error = %err, "Stored session is inconsistent, starting empty");
                    SessionState::new(config.initial_setting())
                }
            },
            Ok(None) => SessionState::new(config.initial_setting()),
            Err(err) => {
                warn!(error = %err, code = %err.code(), "Failed to load session, starting empty");
                SessionState::new(config.initial_setting())
            }
        };
        let totals = state.compute_totals()?;
        info!(
            players = state.players.len(),
            rounds = state.results.len(),
            bills = state.bill_table.len(),
            "Session opened"
        );

        let (tx, rx) = mpsc::channel(config.outbox_capacity.max(1));
        let worker = tokio::spawn(run_outbox(rx, store, sync));

        Ok(Self {
            inner: Mutex::new(Inner {
                state,
                totals,
                version: 0,
                outbox: Some(tx),
            }),
            subscribers: Arc::new(SubscriberRegistry::new()),
            worker: parking_lot::Mutex::new(Some(worker)),
        })
    }

    // ---- roster ----

    /// Add a brand new player; returns the index it was given.
    pub async fn add_player(
        &self,
        name: impl Into<String>,
        profile_id: impl Into<ProfileId>,
        avatar: impl Into<String>,
    ) -> Result<PlayerIndex, AppError> {
        let (name, profile_id, avatar) = (name.into(), profile_id.into(), avatar.into());
        self.mutate("add_player", changed, move |state| {
            let index = state.next_player_index();
            state.add_player(Player::new(index, name, profile_id, avatar))?;
            Ok(index)
        })
        .await
    }

    /// A profile entering the session: reactivated when already known,
    /// otherwise added under a fresh index.
    pub async fn join(
        &self,
        profile_id: impl Into<ProfileId>,
        name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Result<PlayerIndex, AppError> {
        let (profile_id, name, avatar) = (profile_id.into(), name.into(), avatar.into());
        self.mutate("join", changed, move |state| {
            if state.player_by_profile(&profile_id).is_some() {
                return state.reactivate_player(&profile_id);
            }
            let index = state.next_player_index();
            state.add_player(Player::new(index, name, profile_id, avatar))?;
            Ok(index)
        })
        .await
    }

    pub async fn deactivate_player(&self, index: PlayerIndex) -> Result<(), AppError> {
        self.mutate("deactivate_player", changed, move |state| {
            state.deactivate_player(index)
        })
        .await
    }

    // ---- rounds ----

    /// Score raw round inputs and append the result.
    pub async fn record_round(&self, input: RoundInput) -> Result<GameResult, AppError> {
        self.mutate("record_round", changed, move |state| {
            let result = score_round(&input)?;
            state.append_result(result.clone())?;
            Ok(result)
        })
        .await
    }

    /// Re-score round `index` from corrected inputs.
    pub async fn update_round(
        &self,
        index: usize,
        input: RoundInput,
    ) -> Result<GameResult, AppError> {
        self.mutate("update_round", changed, move |state| {
            let result = score_round(&input)?;
            state.update_result(index, result.clone())?;
            Ok(result)
        })
        .await
    }

    pub async fn delete_round(&self, index: usize) -> Result<GameResult, AppError> {
        self.mutate("delete_round", changed, move |state| {
            state.delete_result(index)
        })
        .await
    }

    // ---- bills ----

    pub async fn add_bill(
        &self,
        transaction_id: impl Into<String>,
        bills: Vec<Bill>,
    ) -> Result<(), AppError> {
        let transaction_id = transaction_id.into();
        self.mutate("add_bill", changed, move |state| {
            state.add_bill(transaction_id, bills)
        })
        .await
    }

    /// Split `total` evenly across `debtors` and record it under a fresh
    /// transaction id, which is returned.
    pub async fn split_and_add_bill(
        &self,
        payer: impl Into<ProfileId>,
        debtors: Vec<ProfileId>,
        total: Points,
    ) -> Result<String, AppError> {
        let payer = payer.into();
        self.mutate("split_and_add_bill", changed, move |state| {
            let bills = split_bill(&payer, &debtors, total)?;
            let transaction_id = new_transaction_id(&payer);
            state.add_bill(transaction_id.clone(), bills)?;
            Ok(transaction_id)
        })
        .await
    }

    pub async fn replace_bill(
        &self,
        transaction_id: impl Into<String>,
        bills: Vec<Bill>,
    ) -> Result<(), AppError> {
        let transaction_id = transaction_id.into();
        self.mutate("replace_bill", changed, move |state| {
            state.replace_bill(&transaction_id, bills)
        })
        .await
    }

    pub async fn delete_bill(&self, transaction_id: impl Into<String>) -> Result<Vec<Bill>, AppError> {
        let transaction_id = transaction_id.into();
        self.mutate("delete_bill", changed, move |state| {
            state.delete_bill(&transaction_id)
        })
        .await
    }

    // ---- whole state ----

    /// Clear roster, rounds and bills. The setting survives.
    pub async fn reset(&self) -> Result<(), AppError> {
        self.mutate("reset", |version| SessionEvent::Reset { version }, |state| {
            state.reset();
            Ok(())
        })
        .await
    }

    /// Adopt a state replaced externally (e.g. by the remote replica).
    ///
    /// The incoming document is refolded before it is accepted; a corrupt
    /// one is refused and the current state kept. The new state is
    /// persisted locally but not pushed back. Returns the new version.
    pub async fn replace_state(&self, state: SessionState) -> Result<u64, AppError> {
        let mut inner = self.lock_open().await?;
        let totals = match state.compute_net_balances().and_then(|_| state.compute_totals()) {
            Ok(totals) => totals,
            Err(err) => {
                error!(error = %err, code = %err_code(&err), "Rejected replacement state");
                return Err(err.into());
            }
        };
        inner.state = state;
        inner.totals = totals;
        let version = self.commit(&mut inner, false).await;
        drop(inner);

        info!(version, "Session state replaced");
        self.subscribers
            .broadcast(SessionEvent::StateReplaced { version });
        Ok(version)
    }

    // ---- reads ----

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    pub async fn version(&self) -> u64 {
        self.inner.lock().await.version
    }

    /// Totals as of the last commit, in points.
    pub async fn totals(&self) -> Balances<PlayerIndex> {
        self.inner.lock().await.totals.clone()
    }

    pub async fn board(&self) -> Result<BoardView, AppError> {
        let inner = self.inner.lock().await;
        Ok(BoardView::build(&inner.state, inner.version)?)
    }

    /// Who pays whom, in currency, bills included.
    pub async fn settlement(&self) -> Result<Vec<Transaction<ProfileId>>, AppError> {
        Ok(self.inner.lock().await.state.settle_net_balances()?)
    }

    /// Who pays whom in raw points, rounds only.
    pub async fn score_settlement(&self) -> Result<Vec<Transaction<PlayerIndex>>, AppError> {
        Ok(self.inner.lock().await.state.settle_scores()?)
    }

    pub async fn is_host(&self, device_id: &str) -> bool {
        self.inner.lock().await.state.setting.is_host(device_id)
    }

    // ---- observers ----

    pub fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<SessionEvent>) {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&self, token: Uuid) -> bool {
        self.subscribers.unsubscribe(token)
    }

    pub fn subscribers(&self) -> Arc<SubscriberRegistry> {
        self.subscribers.clone()
    }

    // ---- lifecycle ----

    /// Wait until every commit queued so far has been persisted and pushed.
    pub async fn flush(&self) -> Result<(), AppError> {
        let sender = self.lock_open().await?.outbox.clone().ok_or(AppError::Closed)?;
        let (tx, rx) = oneshot::channel();
        sender
            .send(OutboxItem::Flush(tx))
            .await
            .map_err(|_| AppError::Closed)?;
        rx.await.map_err(|_| AppError::Closed)
    }

    /// Stop accepting mutations, drain the outbox and stop the worker.
    pub async fn shutdown(&self) {
        let sender = self.inner.lock().await.outbox.take();
        drop(sender);
        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            if let Err(err) = handle.await {
                warn!(error = %err, "Session outbox worker ended abnormally");
            }
        }
        info!("Session closed");
    }

    async fn lock_open(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        let inner = self.inner.lock().await;
        if inner.outbox.is_none() {
            return Err(AppError::Closed);
        }
        Ok(inner)
    }

    async fn mutate<T, F>(
        &self,
        op: &'static str,
        event: fn(u64) -> SessionEvent,
        apply: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce(&mut SessionState) -> Result<T, DomainError>,
    {
        let mut inner = self.lock_open().await?;
        let mut next = inner.state.clone();
        let out = match apply(&mut next) {
            Ok(out) => out,
            Err(err) => {
                debug!(op, error = %err, "Mutation rejected");
                return Err(err.into());
            }
        };
        // Refold both views so a state that cannot be shown is never committed.
        let totals = match next.compute_net_balances().and_then(|_| next.compute_totals()) {
            Ok(totals) => totals,
            Err(err) => {
                debug!(op, error = %err, "Mutation rejected on refold");
                return Err(err.into());
            }
        };
        inner.state = next;
        inner.totals = totals;
        let version = self.commit(&mut inner, true).await;
        drop(inner);

        info!(op, version, "Session state committed");
        self.subscribers.broadcast(event(version));
        Ok(out)
    }

    /// Bump the version and queue the committed state. Called with the lock
    /// held so the outbox sees commits in version order.
    async fn commit(&self, inner: &mut Inner, push: bool) -> u64 {
        inner.version += 1;
        let version = inner.version;
        if let Some(outbox) = &inner.outbox {
            let item = OutboxItem::Commit {
                state: inner.state.clone(),
                version,
                push,
            };
            if outbox.send(item).await.is_err() {
                warn!(version, "Session outbox is gone, commit not persisted");
            }
        }
        version
    }
}

fn changed(version: u64) -> SessionEvent {
    SessionEvent::StateChanged { version }
}

fn err_code(err: &DomainError) -> crate::errors::ErrorCode {
    AppError::Domain(err.clone()).code()
}

async fn run_outbox(
    mut rx: mpsc::Receiver<OutboxItem>,
    store: Arc<dyn SessionStore>,
    sync: Arc<dyn SessionSync>,
) {
    while let Some(item) = rx.recv().await {
        match item {
            OutboxItem::Commit {
                state,
                version,
                push,
            } => {
                if let Err(err) = store.persist(&state).await {
                    warn!(version, error = %err, code = %err.code(), "Failed to persist session state");
                }
                if push {
                    if let Err(err) = sync.push(&state).await {
                        warn!(version, error = %err, code = %err.code(), "Failed to push session state");
                    }
                }
                debug!(version, "Outbox commit handled");
            }
            OutboxItem::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Session outbox drained");
}

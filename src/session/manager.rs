//! Session lifecycle management
//!
//! The workshop manager owns the one live session and its pending-review
//! cache behind a single lock, so read-only projections can run while a
//! batch of extraction candidates is being resolved, and all writes stay
//! serialized. Persistence cadence is an observer hook fired after
//! mutations rather than a side effect buried in the resolution path.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::catalog::{Catalog, Priority, Question};
use crate::gaps::{self, SessionSummary};
use crate::snapshot::{self, Snapshot, SnapshotStore};
use crate::validate::Finding;

use super::resolver::{Resolution, Resolver, DEFAULT_CONFIDENCE_THRESHOLD};
use super::{Answer, PendingReview, Session};

/// Default number of recorded answers between automatic checkpoints
pub const DEFAULT_AUTO_SAVE_INTERVAL: usize = 5;

/// Called after a mutation when a checkpoint is due. Failures are logged
/// and never abort the session.
pub type CheckpointHook = Box<dyn Fn(&Catalog, &Session) -> Result<()> + Send + Sync>;

/// Tunables for a workshop run
#[derive(Debug, Clone, Copy)]
pub struct WorkshopOptions {
    /// Auto-accept extraction candidates at or above this confidence
    pub confidence_threshold: f64,
    /// Checkpoint after every Nth recorded answer (0 disables)
    pub auto_save_interval: usize,
}

impl Default for WorkshopOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            auto_save_interval: DEFAULT_AUTO_SAVE_INTERVAL,
        }
    }
}

struct Live {
    session: Session,
    pending: PendingReview,
}

/// Orchestrates a discovery session: start/resume, answer recording,
/// pending review, projections, and snapshot export/import.
pub struct Workshop {
    catalog: Arc<Catalog>,
    resolver: Resolver,
    auto_save_interval: usize,
    live: RwLock<Option<Live>>,
    checkpoint_hook: Option<CheckpointHook>,
}

impl Workshop {
    pub fn new(catalog: Arc<Catalog>, options: WorkshopOptions) -> Self {
        Self {
            catalog,
            resolver: Resolver::new(options.confidence_threshold),
            auto_save_interval: options.auto_save_interval,
            live: RwLock::new(None),
            checkpoint_hook: None,
        }
    }

    /// Register the checkpoint observer.
    pub fn with_checkpoint_hook(mut self, hook: CheckpointHook) -> Self {
        self.checkpoint_hook = Some(hook);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn is_active(&self) -> bool {
        self.live.read().is_some()
    }

    /// Start a fresh session. A caller-assigned id is used when given,
    /// otherwise one is generated.
    pub fn start(&self, session_id: Option<String>) -> String {
        let id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut live = self.live.write();
        *live = Some(Live {
            session: Session::new(&id),
            pending: PendingReview::new(),
        });
        info!("Started discovery session: {id}");
        id
    }

    /// Resume from the most recent snapshot in the store.
    ///
    /// Any failure to find, read, or parse a prior snapshot degrades to
    /// starting a fresh session; discovery must always be able to begin.
    pub fn resume(&self, store: &SnapshotStore) -> String {
        match store.find_latest() {
            Ok(Some(path)) => match store.load(&path) {
                Ok(loaded) => {
                    let dropped = self.import_snapshot(&loaded);
                    if dropped > 0 {
                        warn!("Dropped {dropped} answers with unknown question ids on resume");
                    }
                    info!(
                        "Resumed session {} from {}",
                        loaded.session.id,
                        path.display()
                    );
                    loaded.session.id
                }
                Err(e) => {
                    warn!("Failed to load prior snapshot, starting fresh: {e:#}");
                    self.start(None)
                }
            },
            Ok(None) => {
                info!("No previous session found, starting fresh");
                self.start(None)
            }
            Err(e) => {
                warn!("Failed to look for prior snapshots, starting fresh: {e:#}");
                self.start(None)
            }
        }
    }

    /// Replace the live session with one rebuilt from a snapshot.
    /// Returns the number of answers dropped for unknown question ids.
    pub fn import_snapshot(&self, loaded: &Snapshot) -> usize {
        let (session, dropped) = snapshot::import_session(&self.catalog, loaded);
        let mut live = self.live.write();
        *live = Some(Live {
            session,
            pending: PendingReview::new(),
        });
        dropped
    }

    /// Resolve one automated extraction candidate.
    pub fn record_candidate(&self, candidate: Answer) -> Result<Resolution> {
        if candidate.answer.trim().is_empty() {
            bail!("empty answer text for question {}", candidate.question_id);
        }
        self.catalog
            .get(&candidate.question_id)
            .with_context(|| "candidate references a question not in the catalog")?;

        let outcome = {
            let mut guard = self.live.write();
            let live = active(&mut guard)?;
            self.resolver.resolve(
                &mut live.session,
                &mut live.pending,
                self.catalog.len(),
                candidate,
            )
        };

        if outcome == Resolution::Accepted {
            self.maybe_checkpoint();
        }
        Ok(outcome)
    }

    /// Record an answer typed by the user, returning it with validation
    /// findings. Findings are advisory and never block the write.
    pub fn record_user_answer(
        &self,
        question_id: &str,
        text: &str,
    ) -> Result<(Answer, Vec<Finding>)> {
        let text = text.trim();
        if text.is_empty() {
            bail!("empty answer text for question {question_id}");
        }
        let question = self.catalog.get(question_id)?.clone();

        let recorded = {
            let mut guard = self.live.write();
            let live = active(&mut guard)?;
            self.resolver.record_user_answer(
                &mut live.session,
                &mut live.pending,
                self.catalog.len(),
                &question,
                text,
            )
        };

        self.maybe_checkpoint();
        Ok(recorded)
    }

    /// Promote a parked candidate into the session's answers.
    pub fn accept_pending(&self, question_id: &str) -> Result<Option<Answer>> {
        let accepted = {
            let mut guard = self.live.write();
            let live = active(&mut guard)?;
            self.resolver.accept_pending(
                &mut live.session,
                &mut live.pending,
                self.catalog.len(),
                question_id,
            )
        };

        if accepted.is_some() {
            self.maybe_checkpoint();
        }
        Ok(accepted)
    }

    /// Discard a parked candidate without touching the session's answers.
    pub fn reject_pending(&self, question_id: &str) -> Result<bool> {
        let mut guard = self.live.write();
        let live = active(&mut guard)?;
        Ok(live.pending.discard(question_id))
    }

    /// Parked candidates awaiting review, ordered by question id
    pub fn pending_review(&self) -> Vec<Answer> {
        self.live
            .read()
            .as_ref()
            .map(|live| live.pending.entries())
            .unwrap_or_default()
    }

    pub fn mark_document_analyzed(&self, document: impl Into<String>) {
        if let Some(live) = self.live.write().as_mut() {
            live.session.mark_document_analyzed(document);
        }
    }

    /// Catalog questions without a current answer, optionally filtered by
    /// priority, in catalog order.
    pub fn missing_questions(&self, priority: Option<Priority>) -> Vec<Question> {
        let guard = self.live.read();
        match guard.as_ref() {
            Some(live) => gaps::missing(&self.catalog, &live.session, priority)
                .into_iter()
                .cloned()
                .collect(),
            None => self
                .catalog
                .iter()
                .filter(|q| priority.map_or(true, |p| q.priority == p))
                .cloned()
                .collect(),
        }
    }

    pub fn missing_critical(&self) -> Vec<Question> {
        self.missing_questions(Some(Priority::Critical))
    }

    /// Fresh read-only projection of the current session
    pub fn summarize(&self) -> Result<SessionSummary> {
        let guard = self.live.read();
        let live = guard
            .as_ref()
            .context("no active discovery session")?;
        Ok(gaps::summarize(&self.catalog, &live.session))
    }

    /// Clone of the live session for read-only use
    pub fn session(&self) -> Option<Session> {
        self.live.read().as_ref().map(|live| live.session.clone())
    }

    /// Export the current session as a snapshot record.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let guard = self.live.read();
        let live = guard
            .as_ref()
            .context("no active discovery session")?;
        Ok(snapshot::export_session(&self.catalog, &live.session))
    }

    /// Fire the checkpoint hook if the cadence says one is due.
    fn maybe_checkpoint(&self) {
        let Some(hook) = &self.checkpoint_hook else {
            return;
        };
        if self.auto_save_interval == 0 {
            return;
        }

        let due = {
            let guard = self.live.read();
            match guard.as_ref() {
                Some(live) => {
                    let count = live.session.answered_count();
                    count > 0 && count % self.auto_save_interval == 0
                }
                None => false,
            }
        };
        if !due {
            return;
        }

        // Hook runs outside the lock on a clone of the session
        let session = match self.session() {
            Some(session) => session,
            None => return,
        };
        match hook(&self.catalog, &session) {
            Ok(()) => info!(
                "Auto-saved checkpoint at {} answers",
                session.answered_count()
            ),
            Err(e) => warn!("Failed to auto-save checkpoint: {e:#}"),
        }
    }
}

fn active<'a>(guard: &'a mut Option<Live>) -> Result<&'a mut Live> {
    guard.as_mut().context(
        "no active discovery session; call start() or resume() first",
    )
}

//! Bounded write queue between request handlers and the text index.
//!
//! Handlers push [`IndexCommand`]s without waiting; a single [`IndexWorker`]
//! applies them in order. When the queue is full the command is dropped and
//! logged. Index failures are logged and never reach the caller.

use std::sync::Arc;

use quill_core::ports::{ArticleSearch, IndexedArticle};
use quill_core::types::DbId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

/// A pending write against the text index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexCommand {
    /// Insert or replace an article document.
    Index(IndexedArticle),
    /// Remove every document for an article.
    Remove(DbId),
}

impl IndexCommand {
    fn article_id(&self) -> DbId {
        match self {
            IndexCommand::Index(article) => article.id,
            IndexCommand::Remove(id) => *id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            IndexCommand::Index(_) => "index",
            IndexCommand::Remove(_) => "remove",
        }
    }
}

/// Producer half of the index queue. Cheap to clone.
#[derive(Clone)]
pub struct IndexQueue {
    tx: mpsc::Sender<IndexCommand>,
}

impl IndexQueue {
    /// Create a queue holding at most `capacity` pending commands.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<IndexCommand>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queue an article for (re-)indexing. Returns `false` if it was dropped.
    pub fn index(&self, article: IndexedArticle) -> bool {
        self.push(IndexCommand::Index(article))
    }

    /// Queue removal of an article. Returns `false` if it was dropped.
    pub fn remove(&self, article_id: DbId) -> bool {
        self.push(IndexCommand::Remove(article_id))
    }

    fn push(&self, command: IndexCommand) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                tracing::warn!(
                    article_id = command.article_id(),
                    command = command.kind(),
                    "Index queue full, dropping command"
                );
                false
            }
            Err(TrySendError::Closed(command)) => {
                tracing::warn!(
                    article_id = command.article_id(),
                    command = command.kind(),
                    "Index queue closed, dropping command"
                );
                false
            }
        }
    }
}

/// Consumer that applies queued commands to an [`ArticleSearch`] index.
pub struct IndexWorker<I> {
    index: Arc<I>,
}

impl<I: ArticleSearch> IndexWorker<I> {
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }

    /// Apply commands until every producer is dropped or `cancel` fires.
    ///
    /// On cancellation the queue is closed and whatever is already buffered
    /// is still applied before returning.
    pub async fn run(&self, mut rx: mpsc::Receiver<IndexCommand>, cancel: CancellationToken) {
        tracing::info!("Index worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    rx.close();
                    let mut drained = 0usize;
                    while let Some(command) = rx.recv().await {
                        self.apply(command).await;
                        drained += 1;
                    }
                    tracing::info!(drained, "Index worker stopping");
                    break;
                }
                command = rx.recv() => match command {
                    Some(command) => self.apply(command).await,
                    None => {
                        tracing::info!("Index queue closed, worker stopping");
                        break;
                    }
                }
            }
        }
    }

    async fn apply(&self, command: IndexCommand) {
        let article_id = command.article_id();
        let kind = command.kind();

        let result = match &command {
            IndexCommand::Index(article) => self.index.index_article(article).await,
            IndexCommand::Remove(id) => self.index.remove_article(*id).await,
        };

        match result {
            Ok(()) => tracing::debug!(article_id, command = kind, "Index updated"),
            Err(e) => tracing::error!(
                article_id,
                command = kind,
                error = %e,
                "Index update failed"
            ),
        }
    }
}

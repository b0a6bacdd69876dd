//! The entry store: a single owner for the in-memory collection.
//!
//! [`EntryStore::open`] starts one dedicated thread that owns the
//! [`EntryCollection`] and the [`EntryStorage`]. Every operation is a command
//! sent to that thread, so loads and mutations run strictly in the order
//! they were issued and a reload can never interleave with a write.
//!
//! Callers observe the collection through a `watch` channel. Each completed
//! load or mutation publishes a fresh snapshot; a load always replaces the
//! published list wholesale.
//!
//! Storage failures never surface here. A record that cannot be read is
//! skipped, a write that fails is logged and the in-memory change stands.
//! The only error a caller sees is [`StoreError::Closed`].

use crate::constants::{STORE_COMMAND_CAPACITY, STORE_THREAD_NAME};
use crate::entry::Entry;
use crate::entry_core::EntryCollection;
use crate::entry_io::{load_entries, EntryStorage, FileSystemStorage};
use crate::errors::{AppResult, StoreError};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// What observers see: the latest entries, newest first.
#[derive(Debug, Clone, Default)]
pub struct EntriesSnapshot {
    entries: Arc<Vec<Entry>>,
    loaded: bool,
}

impl EntriesSnapshot {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Shared handle to the entries, cheap to clone.
    pub fn shared(&self) -> Arc<Vec<Entry>> {
        Arc::clone(&self.entries)
    }

    /// True once at least one load from storage has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Outcome of a full [`EntryStore::persist`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Records written successfully
    pub written: usize,
    /// Records that failed and were left stale or missing on disk
    pub failed: usize,
}

enum Command {
    Load {
        reason: LoadReason,
        reply: oneshot::Sender<Vec<Entry>>,
    },
    Add {
        entry: Entry,
        reply: oneshot::Sender<bool>,
    },
    Update {
        entry: Entry,
        reply: oneshot::Sender<bool>,
    },
    Delete {
        id: Uuid,
        reply: oneshot::Sender<bool>,
    },
    Persist {
        reply: oneshot::Sender<PersistReport>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug, Clone, Copy)]
enum LoadReason {
    Requested,
    Resumed,
}

/// Cloneable handle to the entry store's owner thread.
///
/// # Examples
///
/// ```no_run
/// use moodiary::{Entry, EntryStore};
///
/// # async fn demo() -> moodiary::AppResult<()> {
/// let store = EntryStore::open_in("/home/me/.moodiary/entries")?;
/// store.add(Entry::new("😊", "Day One", "Sunny walk.")).await?;
///
/// for entry in store.load().await? {
///     println!("{} {}", entry.mood_marker(), entry.title());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EntryStore {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<EntriesSnapshot>,
}

impl EntryStore {
    /// Starts the owner thread and queues the initial load.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Spawn` if the thread cannot be started.
    pub fn open<S>(storage: S) -> AppResult<Self>
    where
        S: EntryStorage + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(STORE_COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(EntriesSnapshot::default());
        let span = info_span!("entry_store");

        thread::Builder::new()
            .name(STORE_THREAD_NAME.to_string())
            .spawn(move || {
                let _guard = span.enter();
                let owner = Owner {
                    storage,
                    collection: EntryCollection::default(),
                    published: snapshot_tx,
                };
                owner.run(command_rx);
            })
            .map_err(StoreError::Spawn)?;

        Ok(EntryStore {
            commands: command_tx,
            snapshot: snapshot_rx,
        })
    }

    /// Opens a store over a [`FileSystemStorage`] rooted at `dir`.
    pub fn open_in(dir: impl Into<PathBuf>) -> AppResult<Self> {
        Self::open(FileSystemStorage::new(dir)?)
    }

    /// Re-reads the storage root and replaces the collection.
    ///
    /// Returns the loaded entries, newest first.
    pub async fn load(&self) -> AppResult<Vec<Entry>> {
        self.request(|reply| Command::Load {
            reason: LoadReason::Requested,
            reply,
        })
        .await
    }

    /// Reloads after the host application becomes active again, picking up
    /// records changed outside this process.
    pub async fn reload_on_resume(&self) -> AppResult<Vec<Entry>> {
        self.request(|reply| Command::Load {
            reason: LoadReason::Resumed,
            reply,
        })
        .await
    }

    /// Adds a new entry and writes its record.
    ///
    /// Returns `false` without changing anything when an entry with the
    /// same id already exists.
    pub async fn add(&self, entry: Entry) -> AppResult<bool> {
        self.request(|reply| Command::Add { entry, reply }).await
    }

    /// Replaces the entry with the same id, keeping its position, and
    /// rewrites its record.
    ///
    /// An unknown id is a silent no-op and returns `false`.
    pub async fn update(&self, entry: Entry) -> AppResult<bool> {
        self.request(|reply| Command::Update { entry, reply }).await
    }

    /// Deletes every entry with `entry`'s id and its record.
    ///
    /// Returns `false` when nothing matched; storage is left untouched then.
    pub async fn delete(&self, entry: &Entry) -> AppResult<bool> {
        self.delete_by_id(entry.id()).await
    }

    /// Same as [`EntryStore::delete`], by id.
    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        self.request(|reply| Command::Delete { id, reply }).await
    }

    /// Rewrites the record of every entry currently in memory.
    pub async fn persist(&self) -> AppResult<PersistReport> {
        self.request(|reply| Command::Persist { reply }).await
    }

    /// Stops the owner thread once queued commands are handled.
    ///
    /// Every clone of this handle fails with `StoreError::Closed` afterwards.
    pub async fn shutdown(&self) -> AppResult<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// The most recently published entries, newest first.
    pub fn entries(&self) -> Arc<Vec<Entry>> {
        self.snapshot.borrow().shared()
    }

    /// Looks up an entry in the current snapshot.
    pub fn get(&self, id: Uuid) -> Option<Entry> {
        self.snapshot
            .borrow()
            .entries()
            .iter()
            .find(|entry| entry.id() == id)
            .cloned()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<EntriesSnapshot> {
        self.snapshot.clone()
    }

    /// Waits until the initial load has been published.
    pub async fn ready(&self) -> AppResult<Arc<Vec<Entry>>> {
        let mut snapshot = self.snapshot.clone();
        let loaded = snapshot
            .wait_for(EntriesSnapshot::is_loaded)
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(loaded.shared())
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> AppResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(reply_rx.await.map_err(|_| StoreError::Closed)?)
    }
}

/// State living on the owner thread.
struct Owner<S> {
    storage: S,
    collection: EntryCollection,
    published: watch::Sender<EntriesSnapshot>,
}

impl<S: EntryStorage> Owner<S> {
    fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        self.load(LoadReason::Requested);

        while let Some(command) = commands.blocking_recv() {
            // A dropped reply receiver means the caller stopped waiting.
            match command {
                Command::Load { reason, reply } => {
                    let _ = reply.send(self.load(reason));
                }
                Command::Add { entry, reply } => {
                    let _ = reply.send(self.add(entry));
                }
                Command::Update { entry, reply } => {
                    let _ = reply.send(self.update(entry));
                }
                Command::Delete { id, reply } => {
                    let _ = reply.send(self.delete(id));
                }
                Command::Persist { reply } => {
                    let _ = reply.send(self.persist());
                }
                Command::Shutdown { reply } => {
                    let _ = reply.send(());
                    break;
                }
            }
        }

        debug!("Entry store stopped");
    }

    fn load(&mut self, reason: LoadReason) -> Vec<Entry> {
        match reason {
            LoadReason::Requested => debug!("Loading entries"),
            LoadReason::Resumed => info!("Reloading entries after resume"),
        }

        self.collection.replace_all(load_entries(&self.storage));
        self.publish(true)
    }

    fn add(&mut self, entry: Entry) -> bool {
        if self.collection.get(entry.id()).is_some() {
            warn!(id = %entry.id(), "Ignoring add for an id that already exists");
            return false;
        }

        self.save(&entry);
        self.collection.insert(entry);
        self.publish(false);
        true
    }

    fn update(&mut self, entry: Entry) -> bool {
        let id = entry.id();
        if let Some(existing) = self.collection.get(id) {
            if existing.created_at() != entry.created_at() {
                warn!(%id, "Ignoring changed creation time on update");
            }
        }
        if !self.collection.replace(entry) {
            debug!(%id, "Update for unknown entry ignored");
            return false;
        }

        if let Some(entry) = self.collection.get(id) {
            self.save(entry);
        }
        self.publish(false);
        true
    }

    fn delete(&mut self, id: Uuid) -> bool {
        if self.collection.remove(id) == 0 {
            debug!(%id, "Delete for unknown entry ignored");
            return false;
        }

        if let Err(e) = self.storage.remove(id) {
            warn!(error = %e, %id, "Entry deleted in memory but its record remains");
        }
        self.publish(false);
        true
    }

    fn persist(&self) -> PersistReport {
        let mut report = PersistReport::default();
        for entry in self.collection.entries() {
            match self.storage.write(entry) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!(error = %e, id = %entry.id(), "Failed to persist entry");
                    report.failed += 1;
                }
            }
        }

        info!(
            written = report.written,
            failed = report.failed,
            "Persisted entries"
        );
        report
    }

    fn save(&self, entry: &Entry) {
        if let Err(e) = self.storage.write(entry) {
            warn!(error = %e, id = %entry.id(), "Entry change kept in memory but not saved");
        }
    }

    fn publish(&self, from_load: bool) -> Vec<Entry> {
        let entries = self.collection.to_vec();
        let loaded = from_load || self.published.borrow().is_loaded();
        self.published.send_replace(EntriesSnapshot {
            entries: Arc::new(entries.clone()),
            loaded,
        });
        entries
    }
}

// Venue snapshot state
//
// Holds the current venue set behind an Arc so every quote reads one
// consistent snapshot. Replacing the set bumps a version and broadcasts it
// to subscribers.
//
// Numan Thabit 2025 Nov

use crate::venues::VenueSet;
use crate::venues::VenueSetConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct SnapshotUpdate {
	pub version: u64,
	pub venues: usize,
}

#[derive(Clone)]
pub struct MarketState {
	venues: Arc<RwLock<Arc<VenueSet>>>,
	version: Arc<AtomicU64>,
	tx: broadcast::Sender<SnapshotUpdate>,
}

impl MarketState {
	pub fn new(venues: VenueSet, buffer: usize) -> Self {
		let (tx, _) = broadcast::channel(buffer);
		Self {
			venues: Arc::new(RwLock::new(Arc::new(venues))),
			version: Arc::new(AtomicU64::new(0)),
			tx,
		}
	}

	/// The venue set as of now; later replacements do not affect it.
	pub async fn snapshot(&self) -> Arc<VenueSet> {
		self.venues.read().await.clone()
	}

	pub fn version(&self) -> u64 {
		self.version.load(Ordering::Acquire)
	}

	pub fn subscribe(&self) -> broadcast::Receiver<SnapshotUpdate> {
		self.tx.subscribe()
	}

	/// Swap in a new venue set and return its version.
	pub async fn replace(&self, venues: VenueSet) -> u64 {
		let count = venues.len();
		let version = {
			let mut guard = self.venues.write().await;
			*guard = Arc::new(venues);
			self.version.fetch_add(1, Ordering::AcqRel) + 1
		};
		let _ = self.tx.send(SnapshotUpdate { version, venues: count });
		debug!(version, venues = count, "venue snapshot replaced");
		version
	}
}

/// Load and build a venue set from a YAML file.
pub fn load_venue_set(path: &Path) -> Result<VenueSet> {
	let cfg = VenueSetConfig::from_file(path)
		.with_context(|| format!("load venue set {}", path.display()))?;
	cfg.build().context("build venue set")
}

/// Start the periodic reload task.
/// Re-reads the venue file on every tick; a bad file keeps the previous set.
pub fn start_venue_reload(
	state: MarketState,
	path: PathBuf,
	every: Duration,
) -> tokio::task::JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(every);
		// first tick fires immediately; the initial set is already loaded
		ticker.tick().await;
		loop {
			ticker.tick().await;
			match load_venue_set(&path) {
				Ok(set) => {
					let version = state.replace(set).await;
					info!(version, path = %path.display(), "venue set reloaded");
				}
				Err(err) => {
					warn!(error = ?err, path = %path.display(), "venue reload failed; keeping previous set");
				}
			}
		}
	})
}

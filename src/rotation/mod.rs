//! 轮播模块：按标签顺序向用户投放曲目，与语义匹配无关。
//!
//! # Rotation Module
//!
//! Tag-based sequential delivery, a deliberately non-semantic companion to
//! the arbiter: instead of asking "is this prompt close to a cached one",
//! rotation walks every user through a shared, time-ordered pool of tracks
//! per tag ("meditation", "focus", ...), never replaying a track to the
//! same user.
//!
//! Track ids are `{epoch_seconds}-{rand6}` so plain string ordering is
//! publication ordering. Each user keeps one cursor per tag: the id of the
//! last track they received. Delivery finds the oldest track greater than
//! the cursor; when the pool is exhausted the caller generates a new track
//! externally and publishes it, exactly as the arbiter delegates
//! generation on a miss.
//!
//! ```rust
//! use gencache_rust::rotation::{RotationOutcome, TagRotation};
//!
//! let rotation = TagRotation::new();
//! rotation.publish("meditation", "Dawn Stillness", "s3://media/dawn.wav");
//! match rotation.next_for_user("user-1", "meditation") {
//!     RotationOutcome::Next(track) => println!("deliver {}", track.location_ref),
//!     RotationOutcome::Exhausted => { /* generate, publish, retry */ }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One track in a rotation pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationTrack {
    /// Sortable id, `{epoch_seconds}-{rand6}`.
    pub id: String,
    pub title: String,
    pub tag: String,
    /// Opaque pointer to the stored media.
    pub location_ref: String,
    pub created_at: DateTime<Utc>,
}

/// Answer to a delivery request.
#[derive(Debug, Clone)]
pub enum RotationOutcome {
    /// The user's next unheard track; their cursor has advanced past it.
    Next(Arc<RotationTrack>),
    /// The user has heard the whole pool. Generate a track externally,
    /// [`TagRotation::publish`] it, and ask again.
    Exhausted,
}

impl RotationOutcome {
    pub fn track(&self) -> Option<&Arc<RotationTrack>> {
        match self {
            RotationOutcome::Next(track) => Some(track),
            RotationOutcome::Exhausted => None,
        }
    }
}

fn mint_track_id() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp(), suffix)
}

/// Rewrites a minted id to sort strictly after `last`. Within one second
/// the random suffix alone cannot guarantee ordering.
fn id_after(last: &str, minted: &str) -> String {
    let suffix = minted.split_once('-').map(|(_, s)| s).unwrap_or("aaaaaa");
    let epoch = last
        .split_once('-')
        .and_then(|(e, _)| e.parse::<i64>().ok())
        .unwrap_or_else(|| Utc::now().timestamp());
    format!("{}-{}", epoch + 1, suffix)
}

/// Shared track pools with one delivery cursor per (user, tag).
pub struct TagRotation {
    /// Keyed by (tag, id); BTreeMap ordering gives the per-tag sequence.
    tracks: RwLock<BTreeMap<(String, String), Arc<RotationTrack>>>,
    cursors: RwLock<HashMap<(String, String), String>>,
}

impl TagRotation {
    pub fn new() -> Self {
        Self {
            tracks: RwLock::new(BTreeMap::new()),
            cursors: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a freshly generated track under a newly minted id.
    ///
    /// The new track always sorts after every track already in the tag, so
    /// users who exhausted the pool pick it up on their next request.
    pub fn publish(
        &self,
        tag: impl Into<String>,
        title: impl Into<String>,
        location_ref: impl Into<String>,
    ) -> Arc<RotationTrack> {
        let tag = tag.into();
        let mut tracks = self.tracks.write().unwrap();
        let last_id = tracks
            .range((
                std::ops::Bound::Included((tag.clone(), String::new())),
                std::ops::Bound::Unbounded,
            ))
            .take_while(|((track_tag, _), _)| *track_tag == tag)
            .map(|((_, id), _)| id.clone())
            .last();

        let mut id = mint_track_id();
        if let Some(last) = last_id {
            if id <= last {
                id = id_after(&last, &id);
            }
        }
        let track = Arc::new(RotationTrack {
            id,
            title: title.into(),
            tag: tag.clone(),
            location_ref: location_ref.into(),
            created_at: Utc::now(),
        });
        tracks.insert((tag, track.id.clone()), track.clone());
        debug!(id = %track.id, tag = %track.tag, "rotation track published");
        track
    }

    /// Inserts an existing track, keeping its id. Used to rebuild pools
    /// from a durable store on startup.
    pub fn load(&self, track: RotationTrack) -> Arc<RotationTrack> {
        let track = Arc::new(track);
        let mut tracks = self.tracks.write().unwrap();
        tracks.insert((track.tag.clone(), track.id.clone()), track.clone());
        debug!(id = %track.id, tag = %track.tag, "rotation track added");
        track
    }

    /// The user's next unheard track in this tag, oldest first.
    pub fn next_for_user(&self, user_id: &str, tag: &str) -> RotationOutcome {
        let cursor_key = (user_id.to_string(), tag.to_string());
        let after = self.cursors.read().unwrap().get(&cursor_key).cloned();

        let next = {
            let tracks = self.tracks.read().unwrap();
            let lower = match &after {
                // Range start is exclusive of the cursor id itself.
                Some(last_id) => (
                    std::ops::Bound::Excluded((tag.to_string(), last_id.clone())),
                    std::ops::Bound::Unbounded,
                ),
                None => (
                    std::ops::Bound::Included((tag.to_string(), String::new())),
                    std::ops::Bound::Unbounded,
                ),
            };
            tracks
                .range(lower)
                .take_while(|((track_tag, _), _)| track_tag == tag)
                .map(|(_, track)| track.clone())
                .next()
        };

        match next {
            Some(track) => {
                self.cursors
                    .write()
                    .unwrap()
                    .insert(cursor_key, track.id.clone());
                debug!(user = user_id, tag, id = %track.id, "rotation delivery");
                RotationOutcome::Next(track)
            }
            None => RotationOutcome::Exhausted,
        }
    }

    /// The last track id delivered to this user in this tag.
    pub fn cursor(&self, user_id: &str, tag: &str) -> Option<String> {
        self.cursors
            .read()
            .unwrap()
            .get(&(user_id.to_string(), tag.to_string()))
            .cloned()
    }

    pub fn pool_size(&self, tag: &str) -> usize {
        self.tracks
            .read()
            .unwrap()
            .keys()
            .filter(|(track_tag, _)| track_tag == tag)
            .count()
    }
}

impl Default for TagRotation {
    fn default() -> Self {
        Self::new()
    }
}

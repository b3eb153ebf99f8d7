//! Fortune selection: deterministic per-identifier and random no-repeat.
//!
//! # Modes
//!
//! - **Deterministic**: `index = fnv1a32(id) % len`. Same identifier and same list
//!   length, same fortune. No state is read or written.
//! - **Random no-repeat**: draws from the OS random source, skipping indices in
//!   the persisted [`SeenSet`] until every fortune has been shown once, then starts
//!   a new cycle.
//!
//! # Degradation
//!
//! Nothing here fails. An empty list yields `None`; a corrupt or missing seen set
//! starts from empty; a failed write is logged and the pick is still returned;
//! a random source that keeps colliding is cut off after [`MAX_DRAW_ATTEMPTS`]
//! and the last draw is used even if it repeats.
//!
//! Draws use `next_u32() % len`, which carries a small modulo bias when `len`
//! is not a power of two. That matches how existing tags and clients pick.

use crate::fortune::hash::fnv1a32;
use crate::fortune::list::FortuneList;
use crate::invocation::Identifier;
use crate::logutil::escape_log;
use crate::storage::{SeenSet, SeenSetStore};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use std::fmt;

/// Upper bound on random draws for one pick.
pub const MAX_DRAW_ATTEMPTS: usize = 500;

/// Which path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Deterministic,
    Random,
}

impl Mode {
    pub fn for_identifier(identifier: Option<&Identifier>) -> Self {
        match identifier {
            Some(_) => Mode::Deterministic,
            None => Mode::Random,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Deterministic => "Deterministic",
            Mode::Random => "Random",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub index: usize,
    pub value: String,
    /// Size of the seen set after this pick. Random mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seen_count: Option<usize>,
}

/// Map an identifier onto the list. `None` for an empty list.
pub fn pick_deterministic(identifier: &str, list: &FortuneList) -> Option<Selection> {
    if list.is_empty() {
        return None;
    }
    let index = fnv1a32(identifier) as usize % list.len();
    let value = list.get(index)?.to_string();
    log::debug!(
        "fortune: deterministic pick {} for id '{}'",
        index,
        escape_log(identifier)
    );
    Some(Selection {
        index,
        value,
        seen_count: None,
    })
}

/// Pick an index not yet seen in this cycle, record it, and return it.
pub fn pick_random_no_repeat<S, R>(
    list: &FortuneList,
    store: &mut S,
    rng: &mut R,
) -> Option<Selection>
where
    S: SeenSetStore + ?Sized,
    R: RngCore + ?Sized,
{
    let n = list.len();
    if n == 0 {
        return None;
    }

    let mut picked = None;
    let result = store.update(&mut |current| {
        let mut seen = valid_seen(current, n);
        if seen.len() >= n {
            log::debug!("fortune: cycle of {} complete, starting over", n);
            seen.clear();
        }

        let mut index = draw(rng, n);
        let mut attempts = 1;
        while seen.contains(&index) && attempts < MAX_DRAW_ATTEMPTS {
            index = draw(rng, n);
            attempts += 1;
        }
        if seen.contains(&index) {
            log::warn!(
                "fortune: no unseen index after {} draws, repeating {}",
                attempts,
                index
            );
        }

        seen.insert(index);
        picked = Some((index, seen.len()));
        seen
    });
    if let Err(e) = result {
        log::warn!("fortune: failed to persist seen set: {}", e);
    }

    let (index, seen_count) = picked?;
    let value = list.get(index)?.to_string();
    log::debug!(
        "fortune: random pick {} ({} / {} seen)",
        index,
        seen_count,
        n
    );
    Some(Selection {
        index,
        value,
        seen_count: Some(seen_count),
    })
}

/// Dispatch on the identifier: present means deterministic, absent means random.
pub fn new_selection<S, R>(
    identifier: Option<&Identifier>,
    list: &FortuneList,
    store: &mut S,
    rng: &mut R,
) -> Option<Selection>
where
    S: SeenSetStore + ?Sized,
    R: RngCore + ?Sized,
{
    match identifier {
        Some(id) => pick_deterministic(id.as_str(), list),
        None => pick_random_no_repeat(list, store, rng),
    }
}

/// Seen indices valid for a list of `n` entries. Entries past the end are
/// left over from a longer list and are dropped.
fn valid_seen(current: Option<SeenSet>, n: usize) -> SeenSet {
    let mut seen = current.unwrap_or_default();
    let before = seen.len();
    seen.retain(|&i| i < n);
    if seen.len() != before {
        log::debug!(
            "fortune: dropped {} stale seen indices (list has {})",
            before - seen.len(),
            n
        );
    }
    seen
}

fn draw<R: RngCore + ?Sized>(rng: &mut R, n: usize) -> usize {
    rng.next_u32() as usize % n
}

/// A fortune list bound to its seen-set store and random source.
pub struct Selector<S, R = OsRng> {
    list: FortuneList,
    store: S,
    rng: R,
}

impl<S: SeenSetStore> Selector<S, OsRng> {
    /// Selector drawing from the operating system's CSPRNG.
    pub fn new(list: FortuneList, store: S) -> Self {
        Self::with_rng(list, store, OsRng)
    }
}

impl<S: SeenSetStore, R: RngCore> Selector<S, R> {
    pub fn with_rng(list: FortuneList, store: S, rng: R) -> Self {
        Self { list, store, rng }
    }

    pub fn list(&self) -> &FortuneList {
        &self.list
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn pick_deterministic(&self, identifier: &str) -> Option<Selection> {
        pick_deterministic(identifier, &self.list)
    }

    pub fn pick_random_no_repeat(&mut self) -> Option<Selection> {
        pick_random_no_repeat(&self.list, &mut self.store, &mut self.rng)
    }

    /// Re-evaluates the mode on every call.
    pub fn new_selection(&mut self, identifier: Option<&Identifier>) -> Option<Selection> {
        new_selection(identifier, &self.list, &mut self.store, &mut self.rng)
    }

    /// Indices shown so far in the current cycle.
    pub fn seen_count(&self) -> usize {
        valid_seen(self.store.get(), self.list.len()).len()
    }

    /// Start a fresh cycle.
    pub fn reset_cycle(&mut self) -> Result<(), crate::storage::StoreError> {
        self.store.clear()
    }
}

//! One in-flight recoloring per slot
//!
//! Every slot (for example one per notification source) has at most one
//! computation running. Submitting to a busy slot cancels the running
//! computation first. Outcomes are delivered on a channel, and a computation
//! that has been cancelled or superseded never delivers, so a stale image can
//! never arrive after a newer one for the same slot. Outcomes of different
//! slots arrive in no particular order.
//!
//! Cancellation is cooperative: a cancelled worker finishes the pipeline
//! stage it is in before it notices, and its outcome is then discarded.
//! Workers run on the global rayon pool when the `rayon` feature is enabled,
//! and on one named thread per submission otherwise.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
#[cfg(not(feature = "rayon"))]
use std::thread;

use image::Rgb;
use imageproc::definitions::Image;
use tracing::debug;

use crate::error::TaskError;
use crate::recolor::RecolorablePixel;
use crate::task::{CancellationToken, RecolorTask, TaskOutcome};

/// Outcome of one computation, tagged with its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotEvent<K, P: RecolorablePixel> {
    pub slot: K,
    /// Generation returned by the matching [`SlotRunner::submit`] call
    pub generation: u64,
    /// Either `Completed` or `Failed`; cancelled work is never delivered
    pub outcome: TaskOutcome<Image<P>>,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

#[derive(Debug)]
struct Slots<K> {
    in_flight: HashMap<K, InFlight>,
    next_generation: u64,
}

/// Runs recoloring work keyed by slot, one computation per slot at a time.
///
/// Dropping the runner cancels everything still in flight. It does not wait
/// for the workers; each one stops after its current stage.
#[derive(Debug)]
pub struct SlotRunner<K, P: RecolorablePixel> {
    slots: Arc<Mutex<Slots<K>>>,
    events: Sender<SlotEvent<K, P>>,
}

impl<K, P> SlotRunner<K, P>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    P: RecolorablePixel + Send + Sync + 'static,
{
    /// Creates a runner and the receiving end of its event channel.
    pub fn new() -> (Self, Receiver<SlotEvent<K, P>>) {
        let (events, receiver) = mpsc::channel();
        let runner = Self {
            slots: Arc::new(Mutex::new(Slots {
                in_flight: HashMap::new(),
                next_generation: 0,
            })),
            events,
        };
        (runner, receiver)
    }

    /// Starts recoloring `image` towards `target` for `slot`, cancelling any
    /// computation still running for that slot.
    ///
    /// Returns the generation number of the new computation.
    ///
    /// # Errors
    ///
    /// * `TaskError::SpawnFailed` - No worker thread could be started; the slot is left idle
    ///
    /// A superseded computation stops at its next stage boundary, so the
    /// worker may keep running briefly after this returns.
    pub fn submit(&self, slot: K, image: Arc<Image<P>>, target: Rgb<u8>) -> Result<u64, TaskError> {
        let mut slots = lock(&self.slots);

        if let Some(previous) = slots.in_flight.remove(&slot) {
            debug!(?slot, generation = previous.generation, "superseding in-flight recolor");
            previous.token.cancel();
        }

        slots.next_generation += 1;
        let generation = slots.next_generation;
        let token = CancellationToken::new();
        slots.in_flight.insert(
            slot.clone(),
            InFlight {
                generation,
                token: token.clone(),
            },
        );

        let shared = Arc::clone(&self.slots);
        let events = self.events.clone();
        let worker_slot = slot.clone();
        let spawned = spawn_worker(format!("chameleon-slot-{slot:?}"), move || {
            let outcome = RecolorTask::with_token(image, target, token).run();
            deliver(&shared, &events, worker_slot, generation, outcome);
        });

        if let Err(error) = spawned {
            slots.in_flight.remove(&slot);
            return Err(error);
        }

        debug!(?slot, generation, ?target, "recolor submitted");
        Ok(generation)
    }

    /// Cancels the computation running for `slot`.
    ///
    /// Returns `true` if one was running. Its outcome will not be delivered.
    pub fn cancel(&self, slot: &K) -> bool {
        match lock(&self.slots).in_flight.remove(slot) {
            Some(in_flight) => {
                debug!(?slot, generation = in_flight.generation, "recolor cancelled");
                in_flight.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every running computation.
    pub fn cancel_all(&self) {
        let mut slots = lock(&self.slots);
        for (slot, in_flight) in slots.in_flight.drain() {
            debug!(?slot, generation = in_flight.generation, "recolor cancelled");
            in_flight.token.cancel();
        }
    }

    /// Whether a computation is currently running for `slot`.
    pub fn in_flight(&self, slot: &K) -> bool {
        lock(&self.slots).in_flight.contains_key(slot)
    }
}

impl<K, P: RecolorablePixel> Drop for SlotRunner<K, P> {
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        for (_, in_flight) in slots.in_flight.drain() {
            in_flight.token.cancel();
        }
    }
}

#[cfg(feature = "rayon")]
fn spawn_worker<F>(_name: String, job: F) -> Result<(), TaskError>
where
    F: FnOnce() + Send + 'static,
{
    rayon::spawn(job);
    Ok(())
}

#[cfg(not(feature = "rayon"))]
fn spawn_worker<F>(name: String, job: F) -> Result<(), TaskError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name)
        .spawn(job)
        .map(drop)
        .map_err(|error| TaskError::SpawnFailed(error.to_string()))
}

fn lock<K>(slots: &Mutex<Slots<K>>) -> MutexGuard<'_, Slots<K>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sends `outcome` only if `generation` is still the slot's current
/// computation. The check and the send happen under the slot lock, so
/// `submit` and `cancel` cannot slip in between.
fn deliver<K, P>(
    slots: &Mutex<Slots<K>>,
    events: &Sender<SlotEvent<K, P>>,
    slot: K,
    generation: u64,
    outcome: TaskOutcome<Image<P>>,
) where
    K: Eq + Hash + Debug,
    P: RecolorablePixel,
{
    let mut slots = lock(slots);

    let current = slots
        .in_flight
        .get(&slot)
        .is_some_and(|in_flight| in_flight.generation == generation);
    if !current {
        debug!(?slot, generation, "dropping stale recolor outcome");
        return;
    }
    slots.in_flight.remove(&slot);

    if outcome.is_cancelled() {
        debug!(?slot, generation, "recolor cancelled before delivery");
        return;
    }

    // The receiver may already be gone; nobody is waiting for the result then.
    let _ = events.send(SlotEvent {
        slot,
        generation,
        outcome,
    });
}

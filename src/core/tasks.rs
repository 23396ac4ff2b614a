//! Core domain: cancellable continuations resumed on a later tick.
//!
//! Each owner keeps a [`TaskQueue`] keyed by a small slot enum. A slot holds
//! at most one pending continuation; scheduling into a busy slot replaces the
//! previous one. Nothing here blocks: every wait is advanced (or its condition
//! re-evaluated) once per [`TaskQueue::poll`].

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use bevy::prelude::*;

/// Handle to one scheduled continuation.
///
/// A token goes stale as soon as its slot is cancelled or rescheduled, even if
/// the continuation already fired this tick and has not been applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelToken<K> {
    slot: K,
    generation: u64,
}

impl<K: Copy> CancelToken<K> {
    pub fn slot(&self) -> K {
        self.slot
    }
}

/// What a continuation is waiting for.
#[derive(Debug, Clone)]
pub enum Wait<C> {
    Delay(Timer),
    Until(C),
    /// Hold for a minimum duration, then poll the condition every tick.
    DelayThenUntil(Timer, C),
}

impl<C> Wait<C> {
    pub fn delay(seconds: f32) -> Self {
        Wait::Delay(once(seconds))
    }

    pub fn until(condition: C) -> Self {
        Wait::Until(condition)
    }

    pub fn delay_then_until(seconds: f32, condition: C) -> Self {
        Wait::DelayThenUntil(once(seconds), condition)
    }
}

/// Negative or non-finite durations count as already elapsed.
fn once(seconds: f32) -> Timer {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    Timer::from_seconds(seconds, TimerMode::Once)
}

#[derive(Debug, Clone)]
struct Pending<K, C> {
    token: CancelToken<K>,
    wait: Wait<C>,
}

#[derive(Debug, Clone)]
pub struct TaskQueue<K, C> {
    generations: HashMap<K, u64>,
    pending: Vec<Pending<K, C>>,
}

impl<K, C> Default for TaskQueue<K, C> {
    fn default() -> Self {
        Self {
            generations: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

fn elapsed(timer: &mut Timer, delta: Duration) -> bool {
    timer.tick(delta).is_finished()
}

impl<K, C> TaskQueue<K, C>
where
    K: Copy + Eq + Hash,
    C: Copy,
{
    /// Schedule a continuation, cancelling whatever the slot held before.
    pub fn schedule(&mut self, slot: K, wait: Wait<C>) -> CancelToken<K> {
        self.cancel(slot);
        let token = CancelToken {
            slot,
            generation: self.generation(slot),
        };
        self.pending.push(Pending { token, wait });
        token
    }

    /// Cancel the slot's continuation. Returns whether one was still pending.
    ///
    /// Also invalidates a token that fired this tick but was not applied yet.
    pub fn cancel(&mut self, slot: K) -> bool {
        *self.generations.entry(slot).or_insert(0) += 1;
        let before = self.pending.len();
        self.pending.retain(|p| p.token.slot != slot);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) -> bool {
        let slots: Vec<K> = self.generations.keys().copied().collect();
        let had_pending = !self.pending.is_empty();
        for slot in slots {
            self.cancel(slot);
        }
        self.pending.clear();
        had_pending
    }

    pub fn is_pending(&self, slot: K) -> bool {
        self.pending.iter().any(|p| p.token.slot == slot)
    }

    pub fn is_live(&self, token: &CancelToken<K>) -> bool {
        self.generation(token.slot) == token.generation
    }

    /// Time left on a slot's delay, `None` when idle or purely conditional.
    pub fn remaining(&self, slot: K) -> Option<Duration> {
        self.pending
            .iter()
            .find(|p| p.token.slot == slot)
            .and_then(|p| match &p.wait {
                Wait::Delay(timer) | Wait::DelayThenUntil(timer, _) => Some(timer.remaining()),
                Wait::Until(_) => None,
            })
    }

    /// Advance every pending wait once and return the continuations that
    /// fired, in scheduling order. Check [`TaskQueue::is_live`] before
    /// applying each one.
    pub fn poll(&mut self, delta: Duration, mut ready: impl FnMut(C) -> bool) -> Vec<CancelToken<K>> {
        let mut fired = Vec::new();
        self.pending.retain_mut(|p| {
            let done = match &mut p.wait {
                Wait::Delay(timer) => elapsed(timer, delta),
                Wait::Until(condition) => ready(*condition),
                Wait::DelayThenUntil(timer, condition) => {
                    elapsed(timer, delta) && ready(*condition)
                }
            };
            if done {
                fired.push(p.token);
            }
            !done
        });
        fired
    }

    fn generation(&self, slot: K) -> u64 {
        self.generations.get(&slot).copied().unwrap_or(0)
    }
}

//! Keyed mark store: data join plus coalescing transitions.
//!
//! `join()` diffs the new target set against the marks already on screen:
//! - key in both: retarget in place from the current interpolated value
//! - key only in new set: create collapsed, animate to target (enter)
//! - key only in old set: animate to collapsed, then drop on `prune()` (exit)
//!
//! A retarget always starts from where the mark is *now*, so a burst of
//! render requests never makes a mark jump back to an old start value.

use super::MarkKey;
use indexmap::IndexMap;
use log::trace;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Visual attributes that can be interpolated
pub trait Tweenable: Clone + std::fmt::Debug {
    fn lerp(&self, to: &Self, t: f32) -> Self;

    /// State a mark enters from and exits to (e.g. zero radius)
    fn collapsed(&self) -> Self;
}

impl Tweenable for f32 {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn collapsed(&self) -> Self {
        0.0
    }
}

/// Dot mark: center and radius
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

impl Tweenable for Circle {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Circle {
            cx: self.cx.lerp(&to.cx, t),
            cy: self.cy.lerp(&to.cy, t),
            r: self.r.lerp(&to.r, t),
        }
    }

    fn collapsed(&self) -> Self {
        Circle { r: 0.0, ..*self }
    }
}

/// Cubic in-out easing (the usual default for chart transitions)
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Clone, Debug)]
struct Tween<A> {
    from: A,
    to: A,
    start: Instant,
    duration: Duration,
}

impl<A: Tweenable> Tween<A> {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn value_at(&self, now: Instant) -> A {
        let t = self.progress(now);
        if t >= 1.0 {
            self.to.clone()
        } else {
            self.from.lerp(&self.to, ease_cubic_in_out(t))
        }
    }

    fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Lifecycle phase of a mark as of the last join
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Updating,
    Exiting,
}

#[derive(Clone, Debug)]
struct Mark<A> {
    tween: Tween<A>,
    phase: Phase,
}

/// Keys touched by one join, by outcome
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Join {
    pub entered: Vec<MarkKey>,
    pub updated: Vec<MarkKey>,
    pub exited: Vec<MarkKey>,
}

impl Join {
    pub fn phase_of(&self, key: &MarkKey) -> Option<Phase> {
        if self.entered.contains(key) {
            Some(Phase::Entering)
        } else if self.updated.contains(key) {
            Some(Phase::Updating)
        } else if self.exited.contains(key) {
            Some(Phase::Exiting)
        } else {
            None
        }
    }
}

/// Marks currently on screen, in insertion order
#[derive(Clone, Debug)]
pub struct Marks<A> {
    marks: IndexMap<MarkKey, Mark<A>>,
    duration: Duration,
}

impl<A: Tweenable> Marks<A> {
    pub fn new(duration: Duration) -> Self {
        Self {
            marks: IndexMap::new(),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Join a new target set at `now`
    pub fn join<T>(&mut self, targets: T, now: Instant) -> Join
    where
        T: IntoIterator<Item = (MarkKey, A)>,
    {
        let mut join = Join::default();
        let mut present: HashSet<MarkKey> = HashSet::new();

        for (key, target) in targets {
            if !present.insert(key.clone()) {
                // Duplicate key in one view: first one wins
                continue;
            }
            let duration = self.duration;
            match self.marks.get_mut(&key) {
                Some(mark) => {
                    let from = mark.tween.value_at(now);
                    mark.tween = Tween { from, to: target, start: now, duration };
                    mark.phase = Phase::Updating;
                    join.updated.push(key);
                }
                None => {
                    let from = target.collapsed();
                    let tween = Tween { from, to: target, start: now, duration };
                    self.marks.insert(key.clone(), Mark { tween, phase: Phase::Entering });
                    join.entered.push(key);
                }
            }
        }

        for (key, mark) in self.marks.iter_mut() {
            if present.contains(key) || mark.phase == Phase::Exiting {
                continue;
            }
            let from = mark.tween.value_at(now);
            let to = from.collapsed();
            mark.tween = Tween { from, to, start: now, duration: self.duration };
            mark.phase = Phase::Exiting;
            join.exited.push(key.clone());
        }

        trace!(
            "Marks join: +{} ~{} -{}",
            join.entered.len(),
            join.updated.len(),
            join.exited.len()
        );
        join
    }

    /// Drop exiting marks whose exit transition has finished.
    /// Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.marks.len();
        self.marks
            .retain(|_, m| !(m.phase == Phase::Exiting && m.tween.is_done(now)));
        before - self.marks.len()
    }

    /// Interpolated value of a mark at `now`
    pub fn sample(&self, key: &MarkKey, now: Instant) -> Option<A> {
        self.marks.get(key).map(|m| m.tween.value_at(now))
    }

    /// Final value a mark is heading to
    pub fn target(&self, key: &MarkKey) -> Option<&A> {
        self.marks.get(key).map(|m| &m.tween.to)
    }

    pub fn phase(&self, key: &MarkKey) -> Option<Phase> {
        self.marks.get(key).map(|m| m.phase)
    }

    /// True once every transition has reached its target
    pub fn is_settled(&self, now: Instant) -> bool {
        self.marks.values().all(|m| m.tween.is_done(now))
    }

    pub fn keys(&self) -> impl Iterator<Item = &MarkKey> {
        self.marks.keys()
    }

    /// Marks not on their way out
    pub fn live_keys(&self) -> Vec<&MarkKey> {
        self.marks
            .iter()
            .filter(|(_, m)| m.phase != Phase::Exiting)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

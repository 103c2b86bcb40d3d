//! Plain-text surface: prints one line per mark after every join.
//!
//! Line prefixes: `+` entering, `~` updated in place, `-` on its way out.
//! The header carries the current key, or `All` in show-all mode.

use super::marks::{Circle, Join, Marks, Phase};
use super::{FrameView, MarkKey, Surface};
use crate::entities::Item;
use log::warn;
use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};

/// Text surface over any writer (stdout in the binary, a buffer in tests)
pub struct TextSurface<I: Item, F, W> {
    title: String,
    marks: Marks<Circle>,
    labels: HashMap<MarkKey, String>,
    layout: F,
    out: W,
    renders: usize,
    _item: std::marker::PhantomData<fn(&I)>,
}

impl<I, F, W> TextSurface<I, F, W>
where
    I: Item,
    F: Fn(&I) -> Circle,
    W: Write,
{
    pub fn new(title: impl Into<String>, layout: F, out: W, transition: Duration) -> Self {
        Self {
            title: title.into(),
            marks: Marks::new(transition),
            labels: HashMap::new(),
            layout,
            out,
            renders: 0,
            _item: std::marker::PhantomData,
        }
    }

    pub fn marks(&self) -> &Marks<Circle> {
        &self.marks
    }

    /// Number of render requests handled
    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_frame(&mut self, view: &FrameView<'_, I>, join: &Join) -> std::io::Result<()> {
        match view.current_key {
            Some(key) if view.shows_key_indicator() => {
                writeln!(self.out, "== {}: {} ==", self.title, key)?
            }
            _ => writeln!(self.out, "== {}: All ==", self.title)?,
        }
        for key in self.marks.keys() {
            let symbol = match join.phase_of(key).or_else(|| self.marks.phase(key)) {
                Some(Phase::Entering) => '+',
                Some(Phase::Updating) => '~',
                Some(Phase::Exiting) | None => '-',
            };
            let label = self.labels.get(key).map(String::as_str).unwrap_or(&key.0);
            let target = self.marks.target(key).copied().unwrap_or_default();
            writeln!(
                self.out,
                "{} {:<44} r={:>5.1} at ({:>4.0},{:>4.0})",
                symbol, label, target.r, target.cx, target.cy
            )?;
        }
        self.out.flush()
    }
}

impl<I, F, W> Surface<I> for TextSurface<I, F, W>
where
    I: Item,
    F: Fn(&I) -> Circle,
    W: Write,
{
    fn render(&mut self, view: &FrameView<'_, I>) {
        let now = Instant::now();
        let pruned = self.marks.prune(now);
        if pruned > 0 {
            self.labels.retain(|k, _| self.marks.phase(k).is_some());
        }

        let targets: Vec<(MarkKey, Circle)> = view
            .entries
            .iter()
            .map(|e| (e.key.clone(), (self.layout)(e.item)))
            .collect();
        for entry in &view.entries {
            self.labels.insert(entry.key.clone(), entry.item.describe());
        }
        let join = self.marks.join(targets, now);
        self.renders += 1;

        if let Err(e) = self.write_frame(view, &join) {
            warn!("TextSurface '{}': write failed: {}", self.title, e);
        }
    }
}

//! Rendering seam between the controller and whatever draws the marks.
//!
//! On every transition the controller builds a [`FrameView`] and hands it to
//! its [`Surface`]. The view carries everything a surface needs to run a
//! keyed enter/update/exit join (see [`marks::Marks`]):
//! - render mode (one frame, or every frame at once)
//! - current key for the label/highlight (None in show-all)
//! - one [`MarkEntry`] per record, keyed by a [`MarkKey`] stable across renders

pub mod marks;
pub mod scale;
pub mod text;

pub use marks::{Circle, Join, Marks, Phase, Tweenable};
pub use text::TextSurface;

use crate::entities::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which data the surface draws.
///
/// Kept apart from playback state: show-all does not touch the current index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    /// Frame at the current key, key indicator visible
    #[default]
    Single,
    /// Union of all frames, key indicator hidden
    All,
}

/// Identity of a visual mark across re-renders
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkKey(pub String);

impl MarkKey {
    /// Key used in single-frame mode: the record identity
    pub fn single<I: Item>(item: &I) -> Self {
        Self(item.identity())
    }

    /// Key used in show-all mode: `{time_key}_{identity}`, so one category
    /// in different years stays distinct
    pub fn all<I: Item>(item: &I) -> Self {
        Self(format!("{}_{}", item.time_key(), item.identity()))
    }
}

impl fmt::Display for MarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record to draw
#[derive(Debug)]
pub struct MarkEntry<'a, I: Item> {
    pub key: MarkKey,
    pub item: &'a I,
}

/// Everything a surface receives on a render request
#[derive(Debug)]
pub struct FrameView<'a, I: Item> {
    pub mode: RenderMode,
    pub current_key: Option<&'a I::Key>,
    pub entries: Vec<MarkEntry<'a, I>>,
}

impl<'a, I: Item> FrameView<'a, I> {
    /// View of one frame
    pub fn single(key: &'a I::Key, items: Vec<&'a I>) -> Self {
        Self {
            mode: RenderMode::Single,
            current_key: Some(key),
            entries: items
                .into_iter()
                .map(|item| MarkEntry {
                    key: MarkKey::single(item),
                    item,
                })
                .collect(),
        }
    }

    /// View of every record, no current key
    pub fn all(items: Vec<&'a I>) -> Self {
        Self {
            mode: RenderMode::All,
            current_key: None,
            entries: items
                .into_iter()
                .map(|item| MarkEntry {
                    key: MarkKey::all(item),
                    item,
                })
                .collect(),
        }
    }

    pub fn keys(&self) -> Vec<&MarkKey> {
        self.entries.iter().map(|e| &e.key).collect()
    }

    /// Whether the current-key indicator should be drawn
    pub fn shows_key_indicator(&self) -> bool {
        self.mode == RenderMode::Single && self.current_key.is_some()
    }
}

/// Anything that can draw a [`FrameView`].
///
/// Render requests are fire-and-forget: the controller never waits for an
/// animation to finish, so implementations must let a later request
/// supersede an in-flight one.
pub trait Surface<I: Item> {
    fn render(&mut self, view: &FrameView<'_, I>);
}

impl<I: Item, S: Surface<I> + ?Sized> Surface<I> for Box<S> {
    fn render(&mut self, view: &FrameView<'_, I>) {
        (**self).render(view)
    }
}

// Topic identifiers, records and request windows

use serde::{Deserialize, Serialize};

/// Topic identifier
pub type Tid = u64;
/// Category identifier
pub type Cid = u64;
/// User identifier. `0` is a guest.
pub type Uid = u64;

/// Uid used for unauthenticated viewers
pub const GUEST_UID: Uid = 0;

/// A topic as returned to a viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub tid: Tid,
    pub cid: Cid,
    pub uid: Uid,
    pub title: String,
    pub slug: String,
    /// Creation time in milliseconds since the epoch
    pub timestamp: i64,
    pub last_post_time: i64,
    pub post_count: u64,
    pub view_count: u64,
    pub deleted: bool,
    pub tags: Vec<String>,
    /// Viewer-relative: true when the viewer has not read the latest post
    pub unread: bool,
}

/// The fields of the source topic that seed search and category lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFields {
    pub title: String,
    pub cid: Cid,
}

/// Inclusive `[start, stop]` slice of the result list.
/// `stop == None` means "through the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub stop: Option<usize>,
}

impl PageWindow {
    pub fn new(start: usize, stop: Option<usize>) -> Self {
        Self { start, stop }
    }

    /// Builds a window from the wire convention where `stop == -1` is unbounded.
    /// Returns `None` for a negative start or a stop below `-1`.
    pub fn from_wire(start: i64, stop: i64) -> Option<Self> {
        let start: usize = usize::try_from(start).ok()?;
        let stop: Option<usize> = match stop {
            -1 => None,
            s => Some(usize::try_from(s).ok()?),
        };
        Some(Self { start, stop })
    }

    /// Number of slots in a bounded window, zero when `stop < start`
    pub fn len(&self) -> Option<usize> {
        self.stop
            .map(|stop| stop.checked_sub(self.start).map_or(0, |d| d.saturating_add(1)))
    }

    /// Applies the window to `items`, clamping to the available range
    pub fn slice<T>(&self, mut items: Vec<T>) -> Vec<T> {
        let end: usize = match self.stop {
            Some(stop) => stop.saturating_add(1).min(items.len()),
            None => items.len(),
        };
        if self.start >= end {
            return Vec::new();
        }
        items.truncate(end);
        items.drain(..self.start);
        items
    }
}

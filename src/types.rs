//! Core value types used throughout the render engine
//!
//! # Key Types
//!
//! - **`TimeRange`**: inclusive time window for render requests
//! - **`ColorDefinition`**: RGBA color attached to rendered intervals
//! - **`LineThickness`**: vertical weight of a rendered interval
//! - **`SortMode` / `FilterMode`**: named tree-configuration options,
//!   interpreted by the injected tree-building strategy
//! - **`CancelToken`**: cooperative cancellation handle shared between the
//!   caller and a long-running render
//!
//! # Example
//!
//! ```rust
//! use timegraph_render::types::{CancelToken, TimeRange};
//!
//! let range = TimeRange::new(1_000, 2_000);
//! assert!(range.contains(1_500));
//! assert_eq!(range.duration(), 1_000);
//!
//! let cancel = CancelToken::new();
//! assert!(!cancel.is_cancelled());
//! cancel.cancel();
//! assert!(cancel.is_cancelled());
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Time window for render requests (inclusive on both ends)
///
/// Timestamps are opaque `i64` values; the engine never interprets their
/// unit. A range covers `end - start + 1` distinct instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start timestamp (inclusive)
    pub start: i64,
    /// End timestamp (inclusive)
    pub end: i64,
}

impl TimeRange {
    /// Create a new time range
    ///
    /// No validation happens here; a request window is validated at the
    /// orchestrator boundary together with the resolution.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Check if a timestamp falls within this range (inclusive)
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Distance between the two bounds
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// RGBA color attached to a rendered state interval
///
/// Components are plain 0-255 channels; the engine assigns no meaning to
/// them beyond carrying what the mapping function produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorDefinition {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
    /// Alpha channel (255 = opaque)
    pub alpha: u8,
}

impl ColorDefinition {
    /// Fully opaque color from RGB channels
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// Color with an explicit alpha channel
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Vertical weight of a rendered state interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineThickness {
    /// Full-height rectangle
    #[default]
    Full,
    /// Reduced-height rectangle
    Small,
    /// Thin line
    Tiny,
}

/// A named sorting mode for the tree render
///
/// The engine only carries the selection; the injected tree-building
/// strategy decides what each mode means.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortMode {
    name: String,
}

impl SortMode {
    /// Create a sort mode with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Display name of this mode
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named filter mode for the tree render
///
/// Zero or more filter modes can be active at once; as with [`SortMode`],
/// their interpretation belongs to the tree-building strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterMode {
    name: String,
}

impl FilterMode {
    /// Create a filter mode with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Display name of this mode
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Cooperative cancellation handle
///
/// Cloning yields another handle to the same flag, so the caller keeps one
/// clone and hands another to the render call. Renders check the token at
/// coarse granularity (once before starting, once per outer sampling
/// iteration); observed cancellation yields the empty render, never a panic.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    ///
    /// Idempotent; there is no way to un-cancel a token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

//! Raw-interval to display-interval mapping
//!
//! The engine assigns no domain meaning to attribute values; everything a
//! rendered interval shows (name, label, color, thickness, properties) comes
//! from caller-injected mapping functions. Pluggable policy, fixed
//! mechanism: the functions are explicit configuration fields, not trait
//! overrides.
//!
//! Mapping functions may safely issue further read-only queries against the
//! same store on the calling thread, e.g. to inspect a sibling attribute for
//! context; the engine never assumes it is the only caller touching the
//! store.

use crate::render::states::RealInterval;
use crate::render::tree::TreeElement;
use crate::store::{StateInterval, StateStore, StateValue};
use crate::types::{ColorDefinition, LineThickness};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Everything a mapping function may inspect when deriving display
/// properties for one accepted raw interval
pub struct IntervalContext<'a> {
    /// The backing store, available for further read-only queries
    pub store: &'a dyn StateStore,
    /// The tree element being rendered
    pub element: &'a TreeElement,
    /// The raw store interval to map
    pub source: &'a StateInterval,
    /// Full state at the interval's start time, when the orchestrator was
    /// configured to fetch it; empty otherwise
    pub full_state: &'a [StateInterval],
}

/// Mapping function producing the state name
pub type NameMappingFn = Arc<dyn Fn(&IntervalContext<'_>) -> String + Send + Sync>;
/// Mapping function producing the optional label
pub type LabelMappingFn = Arc<dyn Fn(&IntervalContext<'_>) -> Option<String> + Send + Sync>;
/// Mapping function producing the fill color
pub type ColorMappingFn = Arc<dyn Fn(&IntervalContext<'_>) -> ColorDefinition + Send + Sync>;
/// Mapping function producing the line thickness
pub type ThicknessMappingFn = Arc<dyn Fn(&IntervalContext<'_>) -> LineThickness + Send + Sync>;
/// Mapping function producing the property map
pub type PropertiesMappingFn =
    Arc<dyn Fn(&IntervalContext<'_>) -> HashMap<String, String> + Send + Sync>;

/// Pure raw-to-display interval mapping, driven by injected functions
///
/// The defaults render the raw value's text as the state name, derive a
/// stable color from the value, and leave label and properties empty.
#[derive(Clone)]
pub struct IntervalMapper {
    name_fn: NameMappingFn,
    label_fn: LabelMappingFn,
    color_fn: ColorMappingFn,
    thickness_fn: ThicknessMappingFn,
    properties_fn: PropertiesMappingFn,
}

impl IntervalMapper {
    /// Create a mapper with the default mapping functions
    pub fn new() -> Self {
        Self {
            name_fn: Arc::new(|ctx| ctx.source.value.to_string()),
            label_fn: Arc::new(|_| None),
            color_fn: Arc::new(|ctx| default_color(&ctx.source.value)),
            thickness_fn: Arc::new(|_| LineThickness::default()),
            properties_fn: Arc::new(|_| HashMap::new()),
        }
    }

    /// Replace the state-name mapping function
    pub fn with_name_fn(
        mut self,
        f: impl Fn(&IntervalContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.name_fn = Arc::new(f);
        self
    }

    /// Replace the label mapping function
    pub fn with_label_fn(
        mut self,
        f: impl Fn(&IntervalContext<'_>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.label_fn = Arc::new(f);
        self
    }

    /// Replace the color mapping function
    pub fn with_color_fn(
        mut self,
        f: impl Fn(&IntervalContext<'_>) -> ColorDefinition + Send + Sync + 'static,
    ) -> Self {
        self.color_fn = Arc::new(f);
        self
    }

    /// Replace the line-thickness mapping function
    pub fn with_thickness_fn(
        mut self,
        f: impl Fn(&IntervalContext<'_>) -> LineThickness + Send + Sync + 'static,
    ) -> Self {
        self.thickness_fn = Arc::new(f);
        self
    }

    /// Replace the properties mapping function
    pub fn with_properties_fn(
        mut self,
        f: impl Fn(&IntervalContext<'_>) -> HashMap<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.properties_fn = Arc::new(f);
        self
    }

    /// Map one accepted raw interval onto its display form
    ///
    /// `start`/`end` are the display span already clamped to the requested
    /// window by the sampler.
    pub fn map(&self, ctx: &IntervalContext<'_>, start: i64, end: i64) -> RealInterval {
        RealInterval {
            start,
            end,
            state_name: (self.name_fn)(ctx),
            label: (self.label_fn)(ctx),
            color: (self.color_fn)(ctx),
            line_thickness: (self.thickness_fn)(ctx),
            properties: (self.properties_fn)(ctx),
        }
    }
}

impl Default for IntervalMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IntervalMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalMapper").finish_non_exhaustive()
    }
}

const PALETTE: [ColorDefinition; 6] = [
    ColorDefinition::rgb(0x33, 0x99, 0xff),
    ColorDefinition::rgb(0x00, 0xc8, 0x53),
    ColorDefinition::rgb(0xff, 0xab, 0x00),
    ColorDefinition::rgb(0xd5, 0x00, 0x00),
    ColorDefinition::rgb(0xaa, 0x00, 0xff),
    ColorDefinition::rgb(0x00, 0xb8, 0xd4),
];

/// Stable value-to-color fallback used by the default mapper
fn default_color(value: &StateValue) -> ColorDefinition {
    match value {
        StateValue::Null => ColorDefinition::rgb(0x66, 0x66, 0x66),
        StateValue::Int(i) => PALETTE[(i.unsigned_abs() % PALETTE.len() as u64) as usize],
        StateValue::Str(s) => {
            let mut hasher = DefaultHasher::new();
            s.hash(&mut hasher);
            PALETTE[(hasher.finish() % PALETTE.len() as u64) as usize]
        }
    }
}

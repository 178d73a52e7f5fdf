//! Deterministic lifestyle footprint scoring.
//!
//! A fixed additive weight table turns eight questionnaire answers into a total
//! score, per-category contributions, a ranked breakdown, and a qualitative
//! level. Everything here is pure and shareable across threads; the narrative
//! layers in [`crate::advisor`] only consume its output.

mod category;
mod estimator;
mod inputs;
mod level;

pub use category::{category_score, display_label, Category};
pub use estimator::{compute_footprint, BreakdownEntry, FootprintResult};
pub use inputs::{validate_inputs, InputError, OrderedMap, UserInputs};
pub use level::{classify_level, FootprintLevel};

const DISCLAIMER: &str = "Disclaimer: This is an indicative estimate for awareness and guidance, \
not a scientific measurement. Actual carbon footprints depend on many factors including \
location, energy sources, and specific consumption patterns.";

/// Canonical caveat shown next to every estimate.
pub fn disclaimer() -> &'static str {
    DISCLAIMER
}

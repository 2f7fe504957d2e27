//! Dial input: pointer-to-value mapping and the per-entry state machine.

pub mod angular;
mod session;

pub use session::{EntrySession, EntryStep, SliderPhase, ValueChange};

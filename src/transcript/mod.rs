//! Live transcript handling
//!
//! This module turns the speech-to-text stream coming out of the voice client into
//! a stable message list:
//! - `TranscriptMessage` / `Role`: the rendered message model
//! - `TranscriptEvent`: a parsed partial or final utterance
//! - `TranscriptReconciler`: merges events into an append-only, de-duplicated list

mod event;
mod message;
mod reconciler;

pub use event::{TranscriptEvent, TranscriptKind};
pub use message::{Role, TranscriptMessage};
pub use reconciler::{Reconciled, TranscriptReconciler};

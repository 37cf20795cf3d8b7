//! Interactive flows layered over the event store

pub mod delete;
pub mod editor;

pub use delete::{DeleteDecision, DeleteFlow, DeletePrompt, FlowStep};
pub use editor::{EditorForm, SaveAction, SaveOutcome};

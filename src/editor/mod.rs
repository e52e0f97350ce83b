//! Queue editor state machine
//!
//! Controllers wrap each remote operation, the auto-refresh loops keep the
//! snapshot current, and [`QueueEditor`] ties them to the editor actions.

pub mod controller;
pub mod prompt;
pub mod queue_editor;
pub mod scheduler;
pub mod status;

pub use controller::{Controller, ControllerStatus, FlightPolicy, RunOutcome};
pub use prompt::{ConfirmPolicy, Confirmation, Decision, PendingAction, PromptState};
pub use queue_editor::{EditorError, EditorSettings, Navigation, QueueEditor, Resolution, ViewState};
pub use scheduler::{ActivitySignal, AutoRefresh};
pub use status::{ControllerKind, PageStatus};

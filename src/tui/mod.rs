//! Interactive terminal queue editor

pub mod app;
pub mod command;
pub mod resource;
pub mod runtime;
pub mod view;

pub use app::{EditorApp, Msg};
pub use command::Command;
pub use resource::Resource;
pub use runtime::run_editor;

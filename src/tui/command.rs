use futures::future::BoxFuture;
use std::future::Future;

/// Side effects requested by [`EditorApp::update`](super::app::EditorApp::update).
/// The runtime executes them and feeds the resulting message back in.
pub enum Command<Msg> {
    /// Do nothing
    None,

    /// Perform an async operation and send the result as a message
    Perform(BoxFuture<'static, Msg>),
}

impl<Msg> Command<Msg> {
    /// Helper to create a command that performs an async operation
    pub fn perform<F, T>(future: F, to_msg: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        Msg: Send + 'static,
    {
        Command::Perform(Box::pin(async move {
            let result = future.await;
            to_msg(result)
        }))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl<Msg> Default for Command<Msg> {
    fn default() -> Self {
        Command::None
    }
}

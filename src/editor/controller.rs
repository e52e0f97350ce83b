//! Single-flight wrapper around one kind of remote operation
//!
//! A controller runs an async operation, publishes whether it is loading
//! and what its latest error was, and optionally applies the result to
//! view state. Failures never propagate as `Err`: they are reported through
//! the status and the returned [`RunOutcome`].

use futures::future::BoxFuture;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::api::ApiError;

/// What happens when `run` is called while an operation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPolicy {
    /// Refuse the call without running the operation
    Reject,
    /// Wait for the in-flight call to finish, then run
    Queue,
}

/// Observable state of a controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerStatus {
    pub loading: bool,
    pub error: Option<ApiError>,
}

/// Result of one `run` call
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    Succeeded(T),
    Failed(ApiError),
    /// Another call was in flight and the policy is `Reject`
    Rejected,
}

impl<T> RunOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            RunOutcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            RunOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RunOutcome<U> {
        match self {
            RunOutcome::Succeeded(value) => RunOutcome::Succeeded(f(value)),
            RunOutcome::Failed(e) => RunOutcome::Failed(e),
            RunOutcome::Rejected => RunOutcome::Rejected,
        }
    }
}

type Operation<I, T> = Box<dyn Fn(I) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;
type Apply<T> = Box<dyn Fn(&T) + Send + Sync>;

struct Inner<I, T> {
    name: &'static str,
    policy: FlightPolicy,
    gate: Mutex<()>,
    op: Operation<I, T>,
    apply: Option<Apply<T>>,
    status: watch::Sender<ControllerStatus>,
}

/// Cheap to clone; clones share the same flight gate and status.
pub struct Controller<I, T> {
    inner: Arc<Inner<I, T>>,
}

impl<I, T> Clone for Controller<I, T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

/// Clears `loading` when a run ends, including when its future is dropped
struct FlightGuard<'a> {
    status: &'a watch::Sender<ControllerStatus>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.status.send_modify(|s| s.loading = false);
    }
}

impl<I, T> Controller<I, T>
where
    I: Send + 'static,
    T: Send + 'static,
{
    pub fn new<F>(name: &'static str, policy: FlightPolicy, op: F) -> Self
    where
        F: Fn(I) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync + 'static,
    {
        Self::build(name, policy, Box::new(op), None)
    }

    /// Like [`Controller::new`], with `apply` called on every successful result
    pub fn with_apply<F, A>(name: &'static str, policy: FlightPolicy, op: F, apply: A) -> Self
    where
        F: Fn(I) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync + 'static,
        A: Fn(&T) + Send + Sync + 'static,
    {
        Self::build(name, policy, Box::new(op), Some(Box::new(apply)))
    }

    fn build(
        name: &'static str,
        policy: FlightPolicy,
        op: Operation<I, T>,
        apply: Option<Apply<T>>,
    ) -> Self {
        let (status, _) = watch::channel(ControllerStatus::default());
        Self {
            inner: Arc::new(Inner {
                name,
                policy,
                gate: Mutex::new(()),
                op,
                apply,
                status,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn status(&self) -> ControllerStatus {
        self.inner.status.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.status.borrow().loading
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.inner.status.borrow().error.clone()
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<ControllerStatus> {
        self.inner.status.subscribe()
    }

    pub async fn run(&self, input: I) -> RunOutcome<T> {
        let _permit = match self.inner.policy {
            FlightPolicy::Reject => match self.inner.gate.try_lock() {
                Ok(permit) => permit,
                Err(_) => {
                    debug!("{}: already in flight, rejecting", self.inner.name);
                    return RunOutcome::Rejected;
                }
            },
            FlightPolicy::Queue => self.inner.gate.lock().await,
        };

        self.inner.status.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let _flight = FlightGuard { status: &self.inner.status };

        match (self.inner.op)(input).await {
            Ok(value) => {
                if let Some(apply) = &self.inner.apply {
                    apply(&value);
                }
                debug!("{}: succeeded", self.inner.name);
                RunOutcome::Succeeded(value)
            }
            Err(e) => {
                warn!("{}: failed: {}", self.inner.name, e);
                self.inner.status.send_modify(|s| s.error = Some(e.clone()));
                RunOutcome::Failed(e)
            }
        }
    }
}

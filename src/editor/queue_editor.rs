//! Queue editor page model
//!
//! Owns the queue snapshot and the user directory, wires every editor
//! action to its own controller, and keeps the snapshot fresh with two
//! auto-refresh loops. The snapshot is only ever replaced by what the
//! server returned: a re-fetch after host and meeting changes, the
//! returned queue after a rename or description change.

use futures::FutureExt;
use log::{debug, info};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::api::constants::MANAGE_PATH;
use crate::api::{ApiError, ManageQueue, Meeting, QueueApi, QueueId, User};
use crate::validation::resolve_uniqname;

use super::controller::{Controller, ControllerStatus, FlightPolicy, RunOutcome};
use super::prompt::{ConfirmPolicy, Confirmation, Decision, PendingAction, PromptState};
use super::scheduler::{ActivitySignal, AutoRefresh};
use super::status::{ControllerKind, PageStatus};

/// Tunables of an editor session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub poll_interval: Duration,
    pub users_poll_interval: Duration,
    pub confirm_policy: ConfirmPolicy,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(3000),
            users_poll_interval: Duration::from_millis(6000),
            confirm_policy: ConfirmPolicy::default(),
        }
    }
}

/// Where the editor wants to go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the list of managed queues (after the queue was deleted)
    Manage,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::Manage => MANAGE_PATH,
        }
    }
}

/// Preconditions checked before a confirmation prompt is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The queue must keep at least one host
    LastHost,
    /// The queue has not been fetched yet
    NotLoaded,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::LastHost => write!(f, "The last host of a queue cannot be removed"),
            EditorError::NotLoaded => write!(f, "The queue has not been loaded yet"),
        }
    }
}

impl std::error::Error for EditorError {}

/// What became of a confirmation prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Cancelled,
    Ran(RunOutcome<()>),
}

/// Data shown by the editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub queue: Option<ManageQueue>,
    pub users: Option<Vec<User>>,
    pub navigation: Option<Navigation>,
    torn_down: bool,
}

type SharedView = Arc<Mutex<ViewState>>;

fn lock_view(view: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replace the queue snapshot unless the view is gone
fn apply_queue(view: &Mutex<ViewState>, queue: &ManageQueue) {
    let mut state = lock_view(view);
    if state.torn_down {
        debug!("queue {} resolved after teardown, dropping result", queue.id);
        return;
    }
    state.queue = Some(queue.clone());
}

fn apply_users(view: &Mutex<ViewState>, users: &[User]) {
    let mut state = lock_view(view);
    if state.torn_down {
        return;
    }
    state.users = Some(users.to_vec());
}

/// Resolve typed input to a directory user; no request is made on failure
fn resolve_input(view: &Mutex<ViewState>, input: &str) -> Result<User, ApiError> {
    let state = lock_view(view);
    let users = state
        .users
        .as_deref()
        .ok_or_else(|| ApiError::validation("The user list is still loading, try again in a moment"))?;
    resolve_uniqname(input, users).cloned()
}

async fn fetch_manage_queue(api: &dyn QueueApi, queue_id: QueueId) -> Result<ManageQueue, ApiError> {
    api.get_queue(queue_id)
        .await?
        .into_manage()
        .ok_or(ApiError::NotHost(queue_id))
}

/// Queue editor session. Clones share state, controllers and schedulers.
#[derive(Clone)]
pub struct QueueEditor {
    queue_id: QueueId,
    settings: EditorSettings,
    view: SharedView,
    activity: ActivitySignal,
    queue_refresh: Arc<Mutex<AutoRefresh>>,
    users_refresh: Arc<Mutex<AutoRefresh>>,

    fetch_queue: Controller<(), ManageQueue>,
    fetch_users: Controller<(), Vec<User>>,
    remove_host: Controller<User, ()>,
    add_host: Controller<String, ()>,
    remove_meeting: Controller<Meeting, ()>,
    add_meeting: Controller<String, ()>,
    change_name: Controller<String, ManageQueue>,
    change_description: Controller<String, ManageQueue>,
    delete_queue: Controller<(), ()>,
}

impl QueueEditor {
    pub fn new(api: Arc<dyn QueueApi>, queue_id: QueueId, settings: EditorSettings) -> Self {
        let view: SharedView = Arc::new(Mutex::new(ViewState::default()));

        let fetch_queue = {
            let api = api.clone();
            let view = view.clone();
            Controller::with_apply(
                ControllerKind::FetchQueue.label(),
                FlightPolicy::Queue,
                move |()| {
                    let api = api.clone();
                    async move { fetch_manage_queue(api.as_ref(), queue_id).await }.boxed()
                },
                move |queue: &ManageQueue| apply_queue(&view, queue),
            )
        };

        let fetch_users = {
            let api = api.clone();
            let view = view.clone();
            Controller::with_apply(
                ControllerKind::FetchUsers.label(),
                FlightPolicy::Queue,
                move |()| {
                    let api = api.clone();
                    async move { api.get_users().await }.boxed()
                },
                move |users: &Vec<User>| apply_users(&view, users),
            )
        };

        let remove_host = {
            let api = api.clone();
            let view = view.clone();
            let refetch = fetch_queue.clone();
            Controller::new(ControllerKind::RemoveHost.label(), FlightPolicy::Reject, move |host: User| {
                let api = api.clone();
                let view = view.clone();
                let refetch = refetch.clone();
                async move {
                    // The snapshot may have changed while the prompt was open
                    let allowed = lock_view(&view)
                        .queue
                        .as_ref()
                        .is_some_and(|q| q.can_remove_host());
                    if !allowed {
                        return Err(ApiError::validation(EditorError::LastHost.to_string()));
                    }
                    api.remove_host(queue_id, host.id).await?;
                    refetch.run(()).await;
                    Ok(())
                }
                .boxed()
            })
        };

        let add_host = {
            let api = api.clone();
            let view = view.clone();
            let refetch = fetch_queue.clone();
            Controller::new(ControllerKind::AddHost.label(), FlightPolicy::Reject, move |input: String| {
                let api = api.clone();
                let view = view.clone();
                let refetch = refetch.clone();
                async move {
                    let user = resolve_input(&view, &input)?;
                    let already_host = lock_view(&view)
                        .queue
                        .as_ref()
                        .is_some_and(|q| q.is_host(user.id));
                    if already_host {
                        info!("{} is already a host of queue {}", user.username, queue_id);
                        return Ok(());
                    }
                    api.add_host(queue_id, user.id).await?;
                    refetch.run(()).await;
                    Ok(())
                }
                .boxed()
            })
        };

        let remove_meeting = {
            let api = api.clone();
            let refetch = fetch_queue.clone();
            Controller::new(ControllerKind::RemoveMeeting.label(), FlightPolicy::Reject, move |meeting: Meeting| {
                let api = api.clone();
                let refetch = refetch.clone();
                async move {
                    api.remove_meeting(meeting.id).await?;
                    refetch.run(()).await;
                    Ok(())
                }
                .boxed()
            })
        };

        let add_meeting = {
            let api = api.clone();
            let view = view.clone();
            let refetch = fetch_queue.clone();
            Controller::new(ControllerKind::AddMeeting.label(), FlightPolicy::Reject, move |input: String| {
                let api = api.clone();
                let view = view.clone();
                let refetch = refetch.clone();
                async move {
                    let user = resolve_input(&view, &input)?;
                    api.add_meeting(queue_id, user.id).await?;
                    refetch.run(()).await;
                    Ok(())
                }
                .boxed()
            })
        };

        let change_name = {
            let api = api.clone();
            let view = view.clone();
            Controller::with_apply(
                ControllerKind::ChangeName.label(),
                FlightPolicy::Reject,
                move |name: String| {
                    let api = api.clone();
                    async move { api.change_queue_name(queue_id, &name).await }.boxed()
                },
                move |queue: &ManageQueue| apply_queue(&view, queue),
            )
        };

        let change_description = {
            let api = api.clone();
            let view = view.clone();
            Controller::with_apply(
                ControllerKind::ChangeDescription.label(),
                FlightPolicy::Reject,
                move |description: String| {
                    let api = api.clone();
                    async move { api.change_queue_description(queue_id, &description).await }.boxed()
                },
                move |queue: &ManageQueue| apply_queue(&view, queue),
            )
        };

        let delete_queue = {
            let api = api.clone();
            let view = view.clone();
            Controller::with_apply(
                ControllerKind::DeleteQueue.label(),
                FlightPolicy::Reject,
                move |()| {
                    let api = api.clone();
                    async move { api.delete_queue(queue_id).await }.boxed()
                },
                move |_: &()| {
                    let mut state = lock_view(&view);
                    if state.torn_down {
                        debug!("queue {} deleted after teardown, not navigating", queue_id);
                        return;
                    }
                    info!("queue {} deleted, leaving editor", queue_id);
                    state.navigation = Some(Navigation::Manage);
                },
            )
        };

        let queue_refresh = {
            let fetch = fetch_queue.clone();
            AutoRefresh::new("queue_refresh", settings.poll_interval, move || {
                let fetch = fetch.clone();
                async move {
                    fetch.run(()).await;
                }
                .boxed()
            })
        };
        let users_refresh = {
            let fetch = fetch_users.clone();
            AutoRefresh::new("users_refresh", settings.users_poll_interval, move || {
                let fetch = fetch.clone();
                async move {
                    fetch.run(()).await;
                }
                .boxed()
            })
        };
        let activity = queue_refresh.activity();

        Self {
            queue_id,
            settings,
            view,
            activity,
            queue_refresh: Arc::new(Mutex::new(queue_refresh)),
            users_refresh: Arc::new(Mutex::new(users_refresh)),
            fetch_queue,
            fetch_users,
            remove_host,
            add_host,
            remove_meeting,
            add_meeting,
            change_name,
            change_description,
            delete_queue,
        }
    }

    pub fn queue_id(&self) -> QueueId {
        self.queue_id
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Signal that suppresses the next queue poll
    pub fn activity(&self) -> ActivitySignal {
        self.activity.clone()
    }

    /// Fetch queue and users, then poll both for as long as the editor is open.
    /// Must be called inside a Tokio runtime. Pollers are started only once.
    pub fn mount(&self) {
        info!("mounting editor for queue {}", self.queue_id);

        let fetch_queue = self.fetch_queue.clone();
        tokio::spawn(async move {
            fetch_queue.run(()).await;
        });
        let fetch_users = self.fetch_users.clone();
        tokio::spawn(async move {
            fetch_users.run(()).await;
        });

        self.queue_refresh.lock().unwrap_or_else(|p| p.into_inner()).start();
        self.users_refresh.lock().unwrap_or_else(|p| p.into_inner()).start();
    }

    /// Stop polling; results arriving afterwards are discarded
    pub fn teardown(&self) {
        info!("tearing down editor for queue {}", self.queue_id);
        lock_view(&self.view).torn_down = true;
        self.queue_refresh.lock().unwrap_or_else(|p| p.into_inner()).stop();
        self.users_refresh.lock().unwrap_or_else(|p| p.into_inner()).stop();
    }

    /// Fetch queue and user directory once, without polling
    pub async fn load(&self) -> RunOutcome<()> {
        let (queue, users) = tokio::join!(self.fetch_queue.run(()), self.fetch_users.run(()));
        match (queue, users) {
            (RunOutcome::Failed(e), _) | (_, RunOutcome::Failed(e)) => RunOutcome::Failed(e),
            (RunOutcome::Rejected, _) | (_, RunOutcome::Rejected) => RunOutcome::Rejected,
            _ => RunOutcome::Succeeded(()),
        }
    }

    pub async fn refresh(&self) -> RunOutcome<ManageQueue> {
        self.fetch_queue.run(()).await
    }

    pub fn snapshot(&self) -> ViewState {
        lock_view(&self.view).clone()
    }

    pub fn queue(&self) -> Option<ManageQueue> {
        lock_view(&self.view).queue.clone()
    }

    pub fn navigation(&self) -> Option<Navigation> {
        lock_view(&self.view).navigation
    }

    pub fn can_remove_host(&self) -> bool {
        lock_view(&self.view)
            .queue
            .as_ref()
            .is_some_and(|q| q.can_remove_host())
    }

    pub async fn add_host(&self, uniqname: &str) -> RunOutcome<()> {
        self.activity.notify();
        self.add_host.run(uniqname.to_string()).await
    }

    pub async fn add_meeting(&self, uniqname: &str) -> RunOutcome<()> {
        self.activity.notify();
        self.add_meeting.run(uniqname.to_string()).await
    }

    pub async fn change_name(&self, name: &str) -> RunOutcome<ManageQueue> {
        self.activity.notify();
        self.change_name.run(name.to_string()).await
    }

    pub async fn change_description(&self, description: &str) -> RunOutcome<ManageQueue> {
        self.activity.notify();
        self.change_description.run(description.to_string()).await
    }

    /// Open the remove-host prompt. Refused outright for the sole host.
    pub fn request_remove_host(&self, host: &User) -> Result<Confirmation, EditorError> {
        {
            let state = lock_view(&self.view);
            let queue = state.queue.as_ref().ok_or(EditorError::NotLoaded)?;
            if !queue.can_remove_host() {
                return Err(EditorError::LastHost);
            }
        }
        Ok(self.open_prompt(PendingAction::RemoveHost(host.clone())))
    }

    pub fn request_remove_meeting(&self, meeting: &Meeting) -> Confirmation {
        self.open_prompt(PendingAction::RemoveMeeting(meeting.clone()))
    }

    pub fn request_delete_queue(&self) -> Confirmation {
        self.open_prompt(PendingAction::DeleteQueue)
    }

    fn open_prompt(&self, action: PendingAction) -> Confirmation {
        if self.settings.confirm_policy == ConfirmPolicy::ArmOnOpen {
            self.activity.notify();
        }
        Confirmation::new(action)
    }

    /// Answer a prompt; a confirmed prompt runs its action
    pub async fn resolve(&self, mut confirmation: Confirmation, decision: Decision) -> Resolution {
        if !confirmation.is_pending() {
            debug!("prompt already answered: {:?}", confirmation.state());
            return Resolution::Cancelled;
        }

        match confirmation.decide(decision) {
            PromptState::Confirmed => {}
            PromptState::Cancelled | PromptState::Pending => {
                debug!("{} cancelled", confirmation.title());
                return Resolution::Cancelled;
            }
        }

        if self.settings.confirm_policy == ConfirmPolicy::ArmOnConfirm {
            self.activity.notify();
        }

        let outcome = match confirmation.action().clone() {
            PendingAction::RemoveHost(host) => self.remove_host.run(host).await,
            PendingAction::RemoveMeeting(meeting) => self.remove_meeting.run(meeting).await,
            PendingAction::DeleteQueue => self.delete_queue.run(()).await,
        };
        Resolution::Ran(outcome)
    }

    pub fn controller_status(&self, kind: ControllerKind) -> ControllerStatus {
        match kind {
            ControllerKind::FetchQueue => self.fetch_queue.status(),
            ControllerKind::FetchUsers => self.fetch_users.status(),
            ControllerKind::RemoveHost => self.remove_host.status(),
            ControllerKind::AddHost => self.add_host.status(),
            ControllerKind::RemoveMeeting => self.remove_meeting.status(),
            ControllerKind::AddMeeting => self.add_meeting.status(),
            ControllerKind::ChangeName => self.change_name.status(),
            ControllerKind::ChangeDescription => self.change_description.status(),
            ControllerKind::DeleteQueue => self.delete_queue.status(),
        }
    }

    pub fn status(&self) -> PageStatus {
        let statuses: Vec<_> = ControllerKind::PRIORITY
            .iter()
            .map(|kind| (*kind, self.controller_status(*kind)))
            .collect();
        PageStatus::aggregate(&statuses)
    }
}

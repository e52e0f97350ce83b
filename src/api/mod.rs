//! Office-hours REST API
//!
//! Typed access to the queue, meeting, host and user endpoints of the
//! office-hours service, with anti-forgery headers on every mutating
//! request and 400 field errors flattened into one message.

pub mod client;
pub mod constants;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;

pub use client::{ClientConfig, OfficeHoursClient};
pub use context::PageContext;
pub use error::{ApiError, flatten_field_errors};
pub use logging::{LoggingConfig, RequestContext, RequestLogger};
pub use models::{
    AttendingQueue, BluejeansMetadata, ManageQueue, Meeting, MeetingBackend, MeetingId, MyUser,
    QueueId, QueueView, User, UserId,
};
pub use service::{ApiResult, QueueApi};

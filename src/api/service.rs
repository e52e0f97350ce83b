use async_trait::async_trait;

use super::error::ApiError;
use super::models::{
    AttendingQueue, ManageQueue, MeetingId, MyUser, QueueId, QueueView, User, UserId,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations the queue editor needs from the remote service.
///
/// `OfficeHoursClient` is the HTTP implementation; tests substitute an
/// in-memory service.
#[async_trait]
pub trait QueueApi: Send + Sync {
    async fn get_users(&self) -> ApiResult<Vec<User>>;
    async fn get_my_user(&self, user_id: UserId) -> ApiResult<MyUser>;

    async fn get_queues(&self) -> ApiResult<Vec<ManageQueue>>;
    async fn get_queue(&self, queue_id: QueueId) -> ApiResult<QueueView>;
    async fn create_queue(&self, name: &str) -> ApiResult<ManageQueue>;
    async fn delete_queue(&self, queue_id: QueueId) -> ApiResult<()>;
    async fn search_queues(&self, term: &str) -> ApiResult<Vec<AttendingQueue>>;

    async fn change_queue_name(&self, queue_id: QueueId, name: &str) -> ApiResult<ManageQueue>;
    async fn change_queue_description(&self, queue_id: QueueId, description: &str) -> ApiResult<ManageQueue>;

    async fn add_host(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()>;
    async fn remove_host(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()>;

    async fn add_meeting(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()>;
    async fn remove_meeting(&self, meeting_id: MeetingId) -> ApiResult<()>;
}

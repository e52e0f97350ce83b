use crate::api::ApiError;
use crate::editor::ControllerStatus;

/// Remote data as the editor screen sees it.
///
/// Inspired by Elm's RemoteData pattern: one of four states instead of a
/// separate `loading: bool` and `data: Option<T>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource<T, E = ApiError> {
    /// No request has been made yet (initial state)
    NotAsked,

    /// First request is in progress
    Loading,

    /// Data is available; later refreshes keep showing it
    Success(T),

    /// The request failed and there is nothing to show
    Failure(E),
}

impl<T> Resource<T, ApiError> {
    /// Combine a snapshot field with the controller that fills it.
    ///
    /// Data wins: a failed or running refresh does not hide what was
    /// already fetched.
    pub fn from_snapshot(data: Option<T>, status: &ControllerStatus) -> Self {
        match (data, &status.error) {
            (Some(data), _) => Resource::Success(data),
            (None, Some(e)) => Resource::Failure(e.clone()),
            (None, None) if status.loading => Resource::Loading,
            (None, None) => Resource::NotAsked,
        }
    }
}

impl<T, E> Resource<T, E> {
    /// Check if the resource is currently loading
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    /// Map the success value to a new type
    pub fn map<U, F>(self, f: F) -> Resource<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Resource::NotAsked => Resource::NotAsked,
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Failure(e) => Resource::Failure(e),
        }
    }

    /// Convert to an Option, discarding error and loading states
    pub fn ok(self) -> Option<T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T, E> Default for Resource<T, E> {
    fn default() -> Self {
        Resource::NotAsked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_wins_over_error_and_loading() {
        let status = ControllerStatus { loading: true, error: Some(ApiError::Timeout) };
        assert_eq!(Resource::from_snapshot(Some(1), &status), Resource::Success(1));
    }

    #[test]
    fn test_states_without_data() {
        let idle = ControllerStatus::default();
        assert_eq!(Resource::<u8>::from_snapshot(None, &idle), Resource::NotAsked);

        let loading = ControllerStatus { loading: true, error: None };
        assert!(Resource::<u8>::from_snapshot(None, &loading).is_loading());

        let failed = ControllerStatus { loading: false, error: Some(ApiError::NotHost(5)) };
        assert_eq!(
            Resource::<u8>::from_snapshot(None, &failed),
            Resource::Failure(ApiError::NotHost(5))
        );
    }

    #[test]
    fn test_map_keeps_state() {
        let r: Resource<u8> = Resource::Success(2);
        assert_eq!(r.map(|n| n * 2).ok(), Some(4));
        assert!(!Resource::<u8>::Loading.map(|n| n * 2).is_success());
    }
}

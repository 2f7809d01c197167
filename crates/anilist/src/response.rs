//! Response envelope returned by every client operation.

use serde::Serialize;

use crate::engine::EngineResponse;
use crate::error::{EngineError, GraphqlError};
use crate::wire::WirePageInfo;

/// Pagination metadata of a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageData {
    pub current_page: i32,
    /// Total item count as reported by the server.
    pub total: i32,
    pub has_next_page: bool,
    pub last_page: Option<i32>,
    pub per_page: Option<i32>,
}

impl PageData {
    pub(crate) fn from_wire(wire: WirePageInfo) -> Self {
        Self {
            current_page: wire.current_page.unwrap_or(0),
            total: wire.total.unwrap_or(1),
            has_next_page: wire.has_next_page.unwrap_or(false),
            last_page: wire.last_page,
            per_page: wire.per_page,
        }
    }
}

/// Result of a client call.
///
/// The three failure channels stay separate: `exception` for transport
/// problems, `errors` for errors reported by the server, and an empty or
/// `None` payload for absence. `data` is always present.
#[derive(Debug, Clone, Serialize)]
pub struct Response<T> {
    pub data: T,
    pub page_data: Option<PageData>,
    pub exception: Option<EngineError>,
    pub errors: Option<Vec<GraphqlError>>,
}

impl<T> Response<T> {
    /// Shape an engine response: `data` is produced by `map` from the raw
    /// payload (which may be missing), pagination by `page`.
    pub(crate) fn from_engine<D>(
        response: EngineResponse<D>,
        map: impl FnOnce(Option<&mut D>) -> T,
        page: impl FnOnce(Option<&mut D>) -> Option<PageData>,
    ) -> Self {
        let EngineResponse {
            mut data,
            errors,
            exception,
            ..
        } = response;
        let page_data = page(data.as_mut());
        Self {
            data: map(data.as_mut()),
            page_data,
            exception,
            errors,
        }
    }

    /// Returns `true` when there is neither an exception nor a server error.
    pub fn is_success(&self) -> bool {
        self.exception.is_none() && self.errors.as_ref().map_or(true, Vec::is_empty)
    }

    /// Messages of all server-reported errors.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .flatten()
            .map(|error| error.message.as_str())
            .collect()
    }

    /// Transform the payload, keeping metadata and errors.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: f(self.data),
            page_data: self.page_data,
            exception: self.exception,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_data_defaults() {
        let page = PageData::from_wire(WirePageInfo::default());
        assert_eq!(page.current_page, 0);
        assert_eq!(page.total, 1);
        assert!(!page.has_next_page);
        assert_eq!(page.last_page, None);
    }

    #[test]
    fn test_page_data_from_server_values() {
        let page = PageData::from_wire(WirePageInfo {
            total: Some(120),
            per_page: Some(50),
            current_page: Some(2),
            last_page: Some(3),
            has_next_page: Some(true),
        });
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total, 120);
        assert!(page.has_next_page);
        assert_eq!(page.per_page, Some(50));
    }

    #[test]
    fn test_error_messages_and_success() {
        let response = Response {
            data: Vec::<i32>::new(),
            page_data: None,
            exception: None,
            errors: Some(vec![GraphqlError {
                message: "Not Found.".to_string(),
                status: Some(404),
                locations: Vec::new(),
                path: Vec::new(),
                extensions: None,
            }]),
        };
        assert!(!response.is_success());
        assert_eq!(response.error_messages(), vec!["Not Found."]);

        let mapped = response.map(|data| data.len());
        assert_eq!(mapped.data, 0);
        assert!(mapped.errors.is_some());
    }

    #[test]
    fn test_transport_failure_is_not_success() {
        let response: Response<Option<i32>> = Response {
            data: None,
            page_data: None,
            exception: Some(EngineError::Json {
                message: "bad".to_string(),
            }),
            errors: None,
        };
        assert!(!response.is_success());
        assert!(response.error_messages().is_empty());
    }
}

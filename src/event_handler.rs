use axum::http::{header, HeaderMap, StatusCode};
use chrono::Utc;
use rusqlite::params;
use tracing::{debug, error};

use crate::handlers::event::PageView;
use crate::AppState;

/// A page view ready to be written to the `analytics` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPageView {
    pub created_at: i64,
    pub path: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub session_id: String,
    pub device_type: Option<String>,
}

pub struct EventHandler {
    state: AppState,
}

impl EventHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn extract_user_agent(&self, headers: &HeaderMap) -> String {
        headers
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("")
            .to_string()
    }

    fn extract_referrer(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::REFERER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    }

    /// Fills in whatever the tracker left out from the request itself.
    pub fn prepare(&self, headers: &HeaderMap, page_view: PageView) -> StoredPageView {
        let user_agent = page_view
            .user_agent
            .unwrap_or_else(|| self.extract_user_agent(headers));
        let referrer = page_view
            .referrer
            .filter(|r| !r.is_empty())
            .or_else(|| self.extract_referrer(headers));
        let device_type = page_view
            .device_type
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        StoredPageView {
            created_at: Utc::now().timestamp(),
            path: page_view.path,
            user_agent,
            referrer,
            session_id: page_view.session_id.unwrap_or_default(),
            device_type,
        }
    }

    async fn save_page_view(
        &self,
        page_view: StoredPageView,
    ) -> Result<(), tokio_rusqlite::Error> {
        self.state
            .db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO analytics (
                        created_at, path, user_agent, referrer, session_id, device_type
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        page_view.created_at,
                        &page_view.path,
                        &page_view.user_agent,
                        &page_view.referrer,
                        &page_view.session_id,
                        &page_view.device_type,
                    ],
                )
                .map(|_| ())
                .map_err(tokio_rusqlite::Error::from)
            })
            .await
    }

    pub async fn handle_event(
        &self,
        headers: HeaderMap,
        page_view: PageView,
    ) -> Result<StatusCode, StatusCode> {
        if page_view.path.trim().is_empty() {
            debug!("Rejecting page view without a path");
            return Err(StatusCode::BAD_REQUEST);
        }

        let page_view = self.prepare(&headers, page_view);

        self.save_page_view(page_view).await.map_err(|e| {
            error!("Failed to record page view: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(StatusCode::CREATED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::initialize_database;
    use crate::Config;
    use axum::http::HeaderValue;
    use tokio_rusqlite::Connection;

    async fn handler() -> EventHandler {
        let db = Connection::open_in_memory().await.unwrap();
        initialize_database(&db).await.unwrap();
        EventHandler::new(AppState::new(db, Config::default()))
    }

    fn page_view(path: &str) -> PageView {
        PageView {
            path: path.to_string(),
            user_agent: None,
            referrer: None,
            session_id: None,
            device_type: None,
        }
    }

    #[tokio::test]
    async fn missing_fields_fall_back_to_request_headers() {
        let handler = handler().await;
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mobile Safari"));
        headers.insert(header::REFERER, HeaderValue::from_static("https://example.com/"));

        let stored = handler.prepare(&headers, page_view("/blog?tag=rust"));

        assert_eq!(stored.path, "/blog?tag=rust");
        assert_eq!(stored.user_agent, "Mobile Safari");
        assert_eq!(stored.referrer.as_deref(), Some("https://example.com/"));
        assert_eq!(stored.session_id, "");
        assert_eq!(stored.device_type, None);
    }

    #[tokio::test]
    async fn payload_fields_win_and_blank_device_type_is_dropped() {
        let handler = handler().await;
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));

        let mut view = page_view("/");
        view.user_agent = Some("Firefox".to_string());
        view.session_id = Some("abc".to_string());
        view.device_type = Some("  ".to_string());

        let stored = handler.prepare(&headers, view);

        assert_eq!(stored.user_agent, "Firefox");
        assert_eq!(stored.session_id, "abc");
        assert_eq!(stored.device_type, None);
        assert_eq!(stored.referrer, None);
    }

    #[tokio::test]
    async fn blank_path_is_rejected() {
        let handler = handler().await;

        let result = handler.handle_event(HeaderMap::new(), page_view("  ")).await;

        assert_eq!(result, Err(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn page_view_is_stored() {
        let handler = handler().await;

        let result = handler.handle_event(HeaderMap::new(), page_view("/about")).await;
        assert_eq!(result, Ok(StatusCode::CREATED));

        let count: i64 = handler
            .state
            .db
            .call(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM analytics WHERE path = '/about'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}

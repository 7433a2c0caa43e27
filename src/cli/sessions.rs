//! `sessions` command: list saved conversations with their sidebar labels.

use std::error::Error;

use crate::api::backend::{BackendError, HttpBackend};
use crate::core::notification::error_text;
use crate::core::session::SessionStore;

/// One row per session, newest first.
pub fn session_rows(store: &SessionStore) -> Vec<String> {
    store
        .iter_newest_first()
        .map(|session| format!("{:>5}  {}", session.id, session.title()))
        .collect()
}

pub async fn fetch_session_rows(backend: &HttpBackend) -> Result<Vec<String>, BackendError> {
    let store = backend.fetch_sessions().await?;
    Ok(session_rows(&store))
}

pub async fn run_sessions(backend_url: &str) -> Result<(), Box<dyn Error>> {
    let backend = HttpBackend::new(backend_url);
    match fetch_session_rows(&backend).await {
        Ok(rows) if rows.is_empty() => {
            println!("No saved sessions.");
            Ok(())
        }
        Ok(rows) => {
            println!("Saved sessions ({}):", rows.len());
            for row in rows {
                println!("{row}");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", error_text(&err.to_string()));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::utils::test_utils::test_session;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn rows_use_sidebar_titles_newest_first() {
        let store = SessionStore::from_sessions(vec![
            test_session(3, vec![Message::user("What is FERPA?")]),
            test_session(10, Vec::new()),
        ]);
        assert_eq!(
            session_rows(&store),
            vec![
                "   10  New Chat - Oct 17, 3:04 PM".to_string(),
                "    3  💬 What is FERPA?".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "disk full"})))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let err = fetch_session_rows(&backend).await.expect_err("failure");
        assert!(err.to_string().contains("disk full"));
    }
}

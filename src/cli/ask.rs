//! TUI-less `ask` command: one question, one printed answer.

use std::error::Error;

use ratatui::crossterm::terminal;

use crate::api::backend::{HttpBackend, PolicyBackend};
use crate::api::{QueryReply, QueryRequest};
use crate::core::constants::OUT_OF_DOMAIN_WARNING;
use crate::core::message::{user_display_text, Message};
use crate::core::notification::error_text;
use crate::ui::markdown::render_markdown;
use crate::ui::theme::Theme;
use crate::utils::scroll::ScrollCalculator;

const FALLBACK_WIDTH: u16 = 80;

/// Send a single question with no prior history.
pub async fn ask(
    backend: &dyn PolicyBackend,
    question: &str,
    url: &str,
) -> Result<QueryReply, String> {
    let question = question.trim();
    if question.is_empty() {
        return Err("Question is required".to_string());
    }
    let url = url.trim();
    let request = QueryRequest {
        question: question.to_string(),
        url: url.to_string(),
        messages: vec![Message::user(user_display_text(question, url))],
    };
    backend
        .query(&request)
        .await
        .map_err(|err| err.to_string())?
        .into_reply()
}

/// Render the reply's markdown as plain wrapped text.
pub fn format_reply(reply: &QueryReply, width: u16) -> Vec<String> {
    let width = width.max(20);
    let lines = render_markdown(&reply.response, &Theme::monochrome(), usize::from(width));
    ScrollCalculator::prewrap_lines(&lines, width)
        .into_iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

pub async fn run_ask(
    backend_url: &str,
    question: Vec<String>,
    url: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let question = question.join(" ");
    if question.trim().is_empty() {
        eprintln!("Usage: policy-navigator ask <question> [--url <URL>]");
        std::process::exit(1);
    }

    let backend = HttpBackend::new(backend_url);
    match ask(&backend, &question, url.as_deref().unwrap_or("")).await {
        Ok(reply) => {
            if reply.is_out_of_domain {
                eprintln!("{OUT_OF_DOMAIN_WARNING}");
            }
            let width = terminal::size()
                .map(|(width, _)| width)
                .unwrap_or(FALLBACK_WIDTH);
            for line in format_reply(&reply, width) {
                println!("{line}");
            }
            Ok(())
        }
        Err(message) => {
            eprintln!("{}", error_text(&message));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn ask_sends_question_with_annotated_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/query"))
            .and(body_json(json!({
                "question": "Summarize this",
                "url": "https://ed.gov/policy",
                "messages": [
                    {"role": "user", "content": "Summarize this\n\n🔗 URL: https://ed.gov/policy"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "response": "It covers **Title I**.",
                "is_out_of_domain": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let reply = ask(&backend, "  Summarize this ", "https://ed.gov/policy")
            .await
            .expect("reply");
        assert_eq!(reply.response, "It covers **Title I**.");
        assert_eq!(format_reply(&reply, 80), vec!["It covers Title I."]);
    }

    #[tokio::test]
    async fn ask_reports_backend_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/query"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "Vector store offline"})),
            )
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri());
        let err = ask(&backend, "What is IDEA?", "").await.expect_err("failure");
        assert_eq!(err, "Vector store offline");
    }

    #[tokio::test]
    async fn blank_question_is_rejected_locally() {
        let backend = HttpBackend::new("http://127.0.0.1:9");
        assert_eq!(
            ask(&backend, "   ", "").await,
            Err("Question is required".to_string())
        );
    }
}

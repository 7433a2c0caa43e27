use tracing::debug;

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::api::{QueryReply, QueryRequest};
use crate::core::app::SendState;
use crate::core::constants::{BUSY_NOTICE, EXAMPLE_PROMPTS, OUT_OF_DOMAIN_WARNING};
use crate::core::message::{user_display_text, Message};
use crate::core::notification::NotificationKind;

pub(super) fn handle_chat_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::SendMessage { question, url } => send_message(app, question, url, ctx),
        AppAction::SubmitInput => {
            let question = app.ui.question_text();
            if question.trim().is_empty() || app.is_sending() {
                return None;
            }
            let url = app.ui.url_text();
            let command = send_message(app, question, url, ctx);
            if command.is_some() {
                app.ui.clear_inputs();
            }
            command
        }
        AppAction::SendExamplePrompt { index } => {
            let prompt = EXAMPLE_PROMPTS.get(index)?;
            send_message(app, (*prompt).to_string(), String::new(), ctx)
        }
        AppAction::QueryCompleted { result } => complete_query(app, result, ctx),
        _ => unreachable!("non-chat action routed to chat handler"),
    }
}

fn send_message(
    app: &mut App,
    question: String,
    url: String,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    if question.trim().is_empty() || app.is_sending() {
        return None;
    }
    if app.session_busy {
        app.show_notification(BUSY_NOTICE, NotificationKind::Info, ctx.now);
        return None;
    }

    let snapshot = app.messages.clone();
    app.messages
        .push(Message::user(user_display_text(&question, &url)));
    app.send_state = SendState::Sending {
        snapshot,
        session_id: app.current_session_id,
    };
    app.ui.follow_latest();
    debug!(
        session = ?app.current_session_id,
        has_url = !url.trim().is_empty(),
        "sending question"
    );

    Some(AppCommand::Query(QueryRequest {
        question,
        url,
        messages: app.messages.clone(),
    }))
}

fn complete_query(
    app: &mut App,
    result: Result<QueryReply, String>,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    if !matches!(app.send_state, SendState::Sending { .. }) {
        debug!("query completed with no question in flight; ignoring");
        return None;
    }
    let SendState::Sending {
        snapshot,
        session_id,
    } = std::mem::take(&mut app.send_state)
    else {
        return None;
    };

    app.ui.follow_latest();
    match result {
        Ok(reply) => {
            app.messages.push(Message::assistant(reply.response));
            if reply.is_out_of_domain {
                app.show_notification(OUT_OF_DOMAIN_WARNING, NotificationKind::Warning, ctx.now);
            }
            let Some(id) = session_id else {
                app.send_state = SendState::Succeeded;
                return None;
            };
            app.send_state = SendState::Saving { session_id: id };
            Some(AppCommand::SaveSession(
                app.save_request(id, app.messages.clone()),
            ))
        }
        Err(message) => {
            debug!(%message, "query failed; rolling back");
            app.messages = snapshot;
            app.send_state = SendState::RolledBack;
            app.show_error(&message, ctx.now);
            None
        }
    }
}

use tracing::{debug, warn};

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::core::app::SendState;
use crate::core::constants::{BUSY_NOTICE, CHAT_ALREADY_EMPTY};
use crate::core::notification::NotificationKind;
use crate::core::session::{Session, SessionId};

pub(super) fn handle_session_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::NewSession => {
            if refuse_while_busy(app, ctx) {
                return None;
            }
            app.session_busy = true;
            app.ui.disarm_delete();
            Some(AppCommand::CreateSession {
                flush: app.pending_flush(),
            })
        }
        AppAction::SwitchSession { id } => switch_session(app, id, ctx),
        AppAction::SwitchToSelected => {
            let id = app.selected_session_id()?;
            switch_session(app, id, ctx)
        }
        AppAction::RequestDeleteCurrent => {
            let id = app.current_session_id?;
            if app.ui.is_delete_armed(ctx.now) {
                delete_session(app, id, ctx)
            } else {
                app.ui.arm_delete(ctx.now);
                None
            }
        }
        AppAction::DeleteSession { id } => delete_session(app, id, ctx),
        AppAction::ClearChat => {
            if app.messages.is_empty() {
                app.show_notification(CHAT_ALREADY_EMPTY, NotificationKind::Info, ctx.now);
                return None;
            }
            if refuse_while_busy(app, ctx) {
                return None;
            }
            app.messages.clear();
            app.ui.follow_latest();
            let id = app.current_session_id?;
            app.session_busy = true;
            Some(AppCommand::SaveSession(app.save_request(id, Vec::new())))
        }
        AppAction::SessionsLoaded { sessions } => {
            debug!(count = sessions.len(), "sessions loaded");
            app.sessions = sessions;
            match app.sessions.most_recent_id() {
                Some(id) => {
                    app.activate_session(id);
                    app.session_busy = false;
                    None
                }
                None => Some(AppCommand::CreateSession { flush: None }),
            }
        }
        AppAction::SessionCreated { session, flushed } => {
            remember_flushed(app, flushed);
            let id = session.id;
            debug!(id, "session created");
            app.sessions.insert(session);
            app.activate_session(id);
            app.session_busy = false;
            None
        }
        AppAction::SessionActivated { id, flushed } => {
            remember_flushed(app, flushed);
            app.session_busy = false;
            if app.sessions.contains(id) {
                app.activate_session(id);
            } else {
                warn!(id, "switched to a session that is no longer cached");
            }
            None
        }
        AppAction::SessionSaved { session } => {
            save_settled(app, session.id);
            if app.sessions.contains(session.id) {
                app.sessions.insert(session);
            }
            None
        }
        AppAction::SessionDeleted { id } => session_deleted(app, id),
        AppAction::SessionOpFailed { message } => {
            app.session_busy = false;
            app.show_error(&message, ctx.now);
            None
        }
        AppAction::SaveFailed {
            session_id,
            message,
        } => {
            if let Some(id) = session_id {
                save_settled(app, id);
            }
            app.show_error(&message, ctx.now);
            None
        }
        _ => unreachable!("non-session action routed to session handler"),
    }
}

/// Session operations wait for the current answer and for each other.
fn refuse_while_busy(app: &mut App, ctx: AppActionContext) -> bool {
    if app.is_sending() || app.session_busy {
        app.show_notification(BUSY_NOTICE, NotificationKind::Info, ctx.now);
        return true;
    }
    false
}

/// A session save came back. Saves after an answer or a clear hold the
/// processing or busy guard until this point.
fn save_settled(app: &mut App, id: SessionId) {
    if app.send_state.is_saving(id) {
        app.send_state = SendState::Succeeded;
    } else {
        app.session_busy = false;
    }
}

fn switch_session(app: &mut App, id: SessionId, ctx: AppActionContext) -> Option<AppCommand> {
    if app.current_session_id == Some(id) || !app.sessions.contains(id) {
        return None;
    }
    if refuse_while_busy(app, ctx) {
        return None;
    }
    app.session_busy = true;
    app.ui.disarm_delete();
    Some(AppCommand::ActivateSession {
        flush: app.pending_flush(),
        target: id,
    })
}

fn delete_session(app: &mut App, id: SessionId, ctx: AppActionContext) -> Option<AppCommand> {
    app.ui.disarm_delete();
    if refuse_while_busy(app, ctx) {
        return None;
    }
    app.session_busy = true;
    Some(AppCommand::DeleteSession { id })
}

fn session_deleted(app: &mut App, id: SessionId) -> Option<AppCommand> {
    app.sessions.remove(id);
    debug!(id, remaining = app.sessions.len(), "session deleted");

    if app.current_session_id != Some(id) {
        app.select_current_in_sidebar();
        app.session_busy = false;
        return None;
    }

    match app.sessions.most_recent_id() {
        Some(next) => {
            app.activate_session(next);
            app.session_busy = false;
            None
        }
        None => {
            app.current_session_id = None;
            app.messages.clear();
            app.ui.sidebar_selected = 0;
            Some(AppCommand::CreateSession { flush: None })
        }
    }
}

fn remember_flushed(app: &mut App, flushed: Option<Session>) {
    if let Some(session) = flushed {
        app.sessions.insert(session);
    }
}

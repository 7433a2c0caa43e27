use super::{App, AppAction, AppActionContext, AppCommand};

pub(super) fn handle_view_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::ToggleTheme => {
            let dark = !app.is_dark_theme();
            app.set_theme(dark);
            Some(AppCommand::PersistTheme { dark })
        }
        AppAction::DismissNotification => {
            app.notification = None;
            app.ui.disarm_delete();
            None
        }
        AppAction::Tick => {
            if app
                .notification
                .as_ref()
                .is_some_and(|note| note.is_expired(ctx.now))
            {
                app.notification = None;
            }
            if app.ui.delete_armed_at.is_some() && !app.ui.is_delete_armed(ctx.now) {
                app.ui.disarm_delete();
            }
            None
        }
        _ => unreachable!("non-view action routed to view handler"),
    }
}

//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input arrives from a reader task, keys are resolved against the
//! shared [`App`](crate::core::app::App), reducer actions are drained in
//! batches, and the commands they emit run on background tasks that report
//! back through the same dispatcher.

use std::{
    error::Error,
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::backend::PolicyBackend;
use crate::core::app::{
    apply_actions, App, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope,
};
use crate::ui::renderer::ui;

use super::executors::CommandRunner;
use super::keybindings::{handle_key, handle_paste, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    (app.update(|app| terminal_guard.draw(|f| ui(f, app))).await)?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

#[derive(Debug, Default)]
struct EventProcessingOutcome {
    events_processed: bool,
    request_redraw: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome::default();

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match app.update(|app| handle_key(app, &key)).await {
                    KeyResult::Exit => {
                        app.update(|app| app.ui.exit_requested = true).await;
                        outcome.exit_requested = true;
                        break;
                    }
                    KeyResult::Dispatch(actions) => {
                        dispatcher.dispatch_many(actions, AppActionContext::now());
                    }
                    KeyResult::Handled | KeyResult::NotHandled => {}
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                app.update(|app| handle_paste(app, &text)).await;
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    if outcome.events_processed {
        outcome.request_redraw = true;
    }

    outcome
}

async fn drain_action_queue(
    app: &AppHandle,
    runner: &CommandRunner,
    dispatcher: &AppActionDispatcher,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        debug!(?cmd, "spawning command");
        runner.spawn(cmd, dispatcher.clone());
    }
    true
}

/// Expire notifications and the delete confirmation while either is showing.
async fn dispatch_tick_if_due(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    last_tick: &mut Instant,
) {
    if last_tick.elapsed() < TICK_INTERVAL {
        return;
    }
    *last_tick = Instant::now();
    let has_timers = app
        .read(|app| app.notification.is_some() || app.ui.delete_armed_at.is_some())
        .await;
    if has_timers {
        dispatcher.dispatch(AppAction::Tick);
    }
}

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !cancel_token.is_cancelled() {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(
    backend: Arc<dyn PolicyBackend>,
    config_path: Option<PathBuf>,
    dark_theme: bool,
) -> Result<(), Box<dyn Error>> {
    let app = AppHandle::new(Arc::new(Mutex::new(App::new(dark_theme))));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let action_dispatcher = AppActionDispatcher::new(action_tx);
    let runner = CommandRunner::new(backend, config_path);

    let startup = app.update(|app| app.begin_startup()).await;
    runner.spawn(startup, action_dispatcher.clone());

    let terminal = setup_terminal()?;
    info!("chat session started");

    let cancel_token = CancellationToken::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx, cancel_token.clone());

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut last_tick = Instant::now();
    let mut request_redraw = true;
    let mut last_term_size = Size::default();

    let result = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        let term_size = current_terminal_size(&terminal).await;
        if term_size != last_term_size {
            last_term_size = term_size;
            request_redraw = true;
            app.update(|app| {
                app.ui.last_term_size = term_size;
                crate::ui::chat_display::clamp_scroll(app);
            })
            .await;
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let event_outcome = process_ui_events(&app, &mut event_rx, &action_dispatcher).await;
        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }
        if event_outcome.request_redraw {
            request_redraw = true;
        }

        dispatch_tick_if_due(&app, &action_dispatcher, &mut last_tick).await;

        let actions_applied =
            drain_action_queue(&app, &runner, &action_dispatcher, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        let idle = !event_outcome.events_processed && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    cancel_token.cancel();
    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    info!("chat session ended");

    result
}

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::layout::Position;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedReceiver;
use viridian_core::DispatchOutcome;
use viridian_core::ExecutionResult;
use viridian_core::Session;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::colors;
use crate::tui::Tui;
use crate::view;

/// Coalesces bursts of redraw requests into one frame.
const REDRAW_DEBOUNCE: Duration = Duration::from_millis(10);

pub(crate) struct App {
    session: Session,
    app_event_tx: AppEventSender,
    app_event_rx: Receiver<AppEvent>,
    redraw_requested: Arc<AtomicBool>,
}

impl App {
    pub(crate) fn new(session: Session, mut exec_rx: UnboundedReceiver<ExecutionResult>) -> Self {
        let (tx, rx) = channel();
        let app_event_tx = AppEventSender::new(tx);

        // Input thread: polls the terminal and forwards events. The app
        // thread never reads the terminal directly.
        {
            let tx = app_event_tx.clone();
            thread::spawn(move || input_loop(&tx));
        }

        // Executor results hop from the tokio channel onto the app event
        // channel so they are applied on the thread that owns the session.
        {
            let tx = app_event_tx.clone();
            tokio::spawn(async move {
                while let Some(result) = exec_rx.recv().await {
                    tx.send(AppEvent::ExecResult(result));
                }
            });
        }

        Self {
            session,
            app_event_tx,
            app_event_rx: rx,
            redraw_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn run(&mut self, terminal: &mut Tui) -> anyhow::Result<()> {
        self.app_event_tx.send(AppEvent::RequestRedraw);
        while let Ok(event) = self.app_event_rx.recv() {
            match event {
                AppEvent::KeyEvent(key) => self.handle_key_event(key),
                AppEvent::Paste(text) => {
                    let text = text.replace("\r\n", "\n").replace('\r', "\n");
                    self.session.insert_text(&text);
                    self.request_redraw();
                }
                AppEvent::ExecResult(result) => {
                    self.session.apply_result(result);
                    self.request_redraw();
                }
                AppEvent::RequestRedraw => self.schedule_redraw(),
                AppEvent::Redraw => {
                    self.redraw_requested.store(false, Ordering::SeqCst);
                    self.draw_next_frame(terminal)?;
                }
                AppEvent::ExitRequest => break,
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.interrupt();
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.clear_screen();
            }
            KeyCode::Enter => {
                if self.session.submit_line() == DispatchOutcome::Exit {
                    self.app_event_tx.send(AppEvent::ExitRequest);
                    return;
                }
            }
            KeyCode::Up => self.session.history_previous(),
            KeyCode::Down => self.session.history_next(),
            KeyCode::Left => self.session.move_left(),
            KeyCode::Right => self.session.move_right(),
            KeyCode::Home => self.session.move_home(),
            KeyCode::End => self.session.move_end(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Tab => self.session.complete_path(),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut buf = [0u8; 4];
                self.session.insert_text(ch.encode_utf8(&mut buf));
            }
            _ => {}
        }
        self.request_redraw();
    }

    fn request_redraw(&self) {
        self.app_event_tx.send(AppEvent::RequestRedraw);
    }

    /// Schedule a redraw debounced by [`REDRAW_DEBOUNCE`]. Only one timer
    /// thread is in flight at a time.
    fn schedule_redraw(&self) {
        if self.redraw_requested.swap(true, Ordering::SeqCst) {
            return;
        }
        let tx = self.app_event_tx.clone();
        thread::spawn(move || {
            thread::sleep(REDRAW_DEBOUNCE);
            tx.send(AppEvent::Redraw);
        });
    }

    fn draw_next_frame(&mut self, terminal: &mut Tui) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            if area.width == 0 || area.height == 0 {
                return;
            }
            let layout =
                view::layout(self.session.buffer().runs(), self.session.cursor(), area.width);
            let (cursor_x, cursor_row) = layout.cursor;
            let height = area.height as usize;
            let skip = layout.rows.len().saturating_sub(height);
            let visible: Vec<Line<'static>> = layout.rows.into_iter().skip(skip).collect();
            let paragraph = Paragraph::new(Text::from(visible))
                .style(Style::default().bg(colors::background()).fg(colors::text()));
            frame.render_widget(paragraph, area);

            if let Some(y) = (cursor_row as usize).checked_sub(skip) {
                if y < height {
                    let x = cursor_x.min(area.width.saturating_sub(1));
                    frame.set_cursor_position(Position::new(area.x + x, area.y + y as u16));
                }
            }
        })?;
        Ok(())
    }
}

fn input_loop(tx: &AppEventSender) {
    loop {
        match crossterm::event::poll(Duration::from_millis(100)) {
            Ok(true) => match crossterm::event::read() {
                Ok(Event::Key(key)) => tx.send(AppEvent::KeyEvent(key)),
                Ok(Event::Paste(text)) => tx.send(AppEvent::Paste(text)),
                Ok(Event::Resize(_, _)) => tx.send(AppEvent::RequestRedraw),
                Ok(_) => {}
                Err(err) => {
                    tracing::error!("failed to read terminal event: {err}");
                    break;
                }
            },
            Ok(false) => {}
            Err(err) => {
                tracing::error!("failed to poll terminal events: {err}");
                break;
            }
        }
    }
}

use crate::core::DashCore;
use crate::data::DataPaths;
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::stdout;
use std::time::{Duration, Instant};

pub struct AppOptions {
    pub paths: DataPaths,
}

pub fn run(options: AppOptions) -> Result<()> {
    let mut core = DashCore::load_from(&options.paths)?;

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    // Loop errors are held, not propagated, so the terminal is always
    // restored before they surface.
    let result = event_loop(&mut terminal, &mut core, &options.paths);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    core: &mut DashCore,
    paths: &DataPaths,
) -> Result<()> {
    terminal.clear()?;

    let mut last_tick = Instant::now();
    let mut genre_rect = ratatui::prelude::Rect::default();

    loop {
        if core.dirty || last_tick.elapsed() > Duration::from_millis(250) {
            terminal.draw(|frame| {
                genre_rect = crate::ui::genre_list_rect(frame.area());
                crate::ui::draw(frame, core)
            })?;
            core.dirty = false;
            last_tick = Instant::now();
        }

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }

        match event::read()? {
            Event::Mouse(mouse) => handle_mouse(core, mouse, genre_rect),
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(core, paths, key) {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
}

/// Applies one key press to the dashboard; returns true when the app should
/// quit.
fn handle_key(core: &mut DashCore, paths: &DataPaths, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') => return true,
        KeyCode::Down => core.select_next(),
        KeyCode::Up => core.select_prev(),
        KeyCode::Enter => core.select_cursor_entry(),
        KeyCode::Esc | KeyCode::Backspace => core.clear_filter(),
        KeyCode::Char('r') => {
            if let Err(err) = core.reload(paths) {
                core.status = format!("reload error: {err:#}");
                core.dirty = true;
            }
        }
        _ => {}
    }
    false
}

fn handle_mouse(core: &mut DashCore, mouse: MouseEvent, genre_rect: ratatui::prelude::Rect) {
    let inside_browser = point_in_rect(mouse.column, mouse.row, genre_rect);
    match mouse.kind {
        MouseEventKind::ScrollDown if inside_browser => core.select_next(),
        MouseEventKind::ScrollUp if inside_browser => core.select_prev(),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: ratatui::prelude::Rect) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::GenreSelection;
    use crate::model::{FileRecord, LibraryStats};
    use std::path::Path;

    fn core_with_genres() -> DashCore {
        let files = vec![
            FileRecord {
                genre: Some(String::from("Rock")),
                ..FileRecord::default()
            },
            FileRecord {
                genre: Some(String::from("Pop")),
                ..FileRecord::default()
            },
        ];
        DashCore::new(LibraryStats::default(), files)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut core = core_with_genres();
        let paths = DataPaths::from_dir(Path::new("does-not-exist"));
        assert!(handle_key(&mut core, &paths, press(KeyCode::Char('q'))));
        assert!(handle_key(
            &mut core,
            &paths,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn enter_applies_cursor_genre_and_esc_clears() {
        let mut core = core_with_genres();
        let paths = DataPaths::from_dir(Path::new("does-not-exist"));

        core.select_next();
        assert!(!handle_key(&mut core, &paths, press(KeyCode::Enter)));
        assert!(matches!(core.selection, GenreSelection::Genre(_)));

        assert!(!handle_key(&mut core, &paths, press(KeyCode::Esc)));
        assert_eq!(core.selection, GenreSelection::All);
    }

    #[test]
    fn failed_reload_reports_in_status_without_quitting() {
        let mut core = core_with_genres();
        let paths = DataPaths::from_dir(Path::new("does-not-exist"));

        assert!(!handle_key(&mut core, &paths, press(KeyCode::Char('r'))));
        assert!(core.status.contains("reload error"));
    }

    #[test]
    fn wheel_outside_browser_is_ignored() {
        let mut core = core_with_genres();
        let rect = ratatui::prelude::Rect::new(0, 0, 10, 10);
        let before = core.cursor;

        handle_mouse(
            &mut core,
            MouseEvent {
                kind: MouseEventKind::ScrollDown,
                column: 50,
                row: 50,
                modifiers: KeyModifiers::NONE,
            },
            rect,
        );
        assert_eq!(core.cursor, before);

        handle_mouse(
            &mut core,
            MouseEvent {
                kind: MouseEventKind::ScrollDown,
                column: 5,
                row: 5,
                modifiers: KeyModifiers::NONE,
            },
            rect,
        );
        assert_eq!(core.cursor, before + 1);
    }
}

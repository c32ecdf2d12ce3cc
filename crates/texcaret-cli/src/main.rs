use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::{
    env,
    io::{stdout, Stdout},
    path::PathBuf,
    process,
};
use texcaret_config::Config;
use texcaret_engine::{Document, EditorEvent, Shortcut};
use texcaret_syntax::format_tree;

const EVENT_LOG_CAPACITY: usize = 20;

struct App {
    doc: Document,
    shortcuts: Vec<Shortcut>,
    events: Rc<RefCell<Vec<EditorEvent>>>,
    file_path: Option<PathBuf>,
    status: String,
}

impl App {
    fn new(file_path: Option<PathBuf>, shortcuts: Vec<Shortcut>) -> Result<Self> {
        let mut doc = match &file_path {
            Some(path) => {
                let bytes = std::fs::read(path)?;
                Document::from_bytes(&bytes)?
            }
            None => Document::new(""),
        };

        let events: Rc<RefCell<Vec<EditorEvent>>> = Rc::default();
        let sink = Rc::clone(&events);
        doc.subscribe(move |event| {
            let mut log = sink.borrow_mut();
            log.push(event.clone());
            let overflow = log.len().saturating_sub(EVENT_LOG_CAPACITY);
            log.drain(..overflow);
        });

        Ok(Self {
            doc,
            shortcuts,
            events,
            file_path,
            status: String::new(),
        })
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status.clear();
        match (code, modifiers) {
            (KeyCode::Esc, _) => return false,
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => self.save(),
            (KeyCode::Tab, _) => {
                if self.doc.tab_forward().is_none() {
                    self.status = "no next argument".to_string();
                }
            }
            (KeyCode::BackTab, _) => {
                if self.doc.tab_backward().is_none() {
                    self.status = "no previous argument".to_string();
                }
            }
            (KeyCode::Enter, KeyModifiers::SHIFT) => {
                if self.doc.insert_matrix_row().is_none() {
                    self.status = "not inside a matrix".to_string();
                }
            }
            (KeyCode::Enter, _) => {
                if self.doc.expand_shortcut(&self.shortcuts).is_none() {
                    self.doc.insert_text("\n");
                }
            }
            (KeyCode::Right, KeyModifiers::ALT) => {
                if self.doc.next_cell().is_none() {
                    self.status = "no next cell".to_string();
                }
            }
            (KeyCode::Left, _) => self.doc.move_left(),
            (KeyCode::Right, _) => self.doc.move_right(),
            (KeyCode::Backspace, _) => {
                let _ = self.doc.backspace();
            }
            (KeyCode::Char(c), _) if matches!(c, '(' | '[' | '{') => {
                let _ = self.doc.auto_pair(c);
            }
            (KeyCode::Char(c), _) => {
                self.doc.insert_text(&c.to_string());
            }
            _ => {}
        }
        true
    }

    fn save(&mut self) {
        let Some(path) = &self.file_path else {
            self.status = "no file to save to".to_string();
            return;
        };
        match std::fs::write(path, self.doc.text()) {
            Ok(()) => self.status = format!("saved {}", path.display()),
            Err(e) => self.status = format!("save failed: {e}"),
        }
    }

    /// 0-based (line, column) of the cursor, for display and terminal
    /// cursor placement.
    fn cursor_line_col(&self) -> (usize, usize) {
        let text = self.doc.text();
        let cursor = self.doc.cursor();
        let before = &text[..cursor];
        let line = before.matches('\n').count();
        let col = before
            .rfind('\n')
            .map(|i| cursor - i - 1)
            .unwrap_or(cursor);
        (line, col)
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let file_path = match args.len() {
        1 => None,
        2 => Some(PathBuf::from(&args[1])),
        _ => {
            eprintln!("Usage: {} [latex-fragment-file]", args[0]);
            process::exit(1);
        }
    };

    let shortcuts = match Config::load() {
        Ok(Some(config)) => config.shortcut_table(),
        Ok(None) => Config::default().shortcut_table(),
        Err(e) => {
            eprintln!(
                "Error: Failed to load config file at {}: {e}",
                Config::config_path().display()
            );
            process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(file_path, shortcuts)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Min(5),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.area());

    render_editor(f, app, chunks[0]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ]
            .as_ref(),
        )
        .split(chunks[1]);

    render_tree(f, app, lower[0]);
    render_context(f, app, lower[1]);
    render_events(f, app, lower[2]);
    render_help(f, app, chunks[2]);
}

fn render_editor(f: &mut Frame, app: &App, area: Rect) {
    let text = app.doc.text();
    let lines: Vec<Line> = if text.is_empty() {
        vec![Line::from(Span::styled(
            "type some LaTeX...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        text.lines().map(|l| Line::from(l.to_string())).collect()
    };

    let editor = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Buffer"));
    f.render_widget(editor, area);

    // Terminal cursor at the document cursor.
    let (line, col) = app.cursor_line_col();
    let x = area.x + 1 + col.min(area.width.saturating_sub(2) as usize) as u16;
    let y = area.y + 1 + line.min(area.height.saturating_sub(2) as usize) as u16;
    f.set_cursor_position((x, y));
}

fn render_tree(f: &mut Frame, app: &App, area: Rect) {
    let tree_text = format_tree(app.doc.tree());
    let lines: Vec<Line> = tree_text
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    let tree =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Parse Tree"));
    f.render_widget(tree, area);
}

fn render_context(f: &mut Frame, app: &App, area: Rect) {
    let ctx = app.doc.context();
    let (line, col) = app.cursor_line_col();

    let mut lines = vec![
        Line::from(format!(
            "cursor: {} (line {}, col {})",
            app.doc.cursor(),
            line,
            col
        )),
        Line::from(format!("version: {}", app.doc.version())),
        Line::from(format!("label: {}", ctx.label)),
        Line::from(format!("in math: {}", ctx.in_math)),
    ];
    if let Some(flavor) = &ctx.math_flavor {
        lines.push(Line::from(format!("math flavor: {flavor:?}")));
    }
    if let Some(cmd) = &ctx.command {
        lines.push(Line::from(format!(
            "command: \\{} @ {}..{}",
            cmd.name, cmd.range.start, cmd.range.end
        )));
        lines.push(Line::from(format!("place: {:?}", cmd.place)));
    }

    let context =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Context"));
    f.render_widget(context, area);
}

fn render_events(f: &mut Frame, app: &App, area: Rect) {
    let log = app.events.borrow();
    let lines: Vec<Line> = log
        .iter()
        .rev()
        .map(|event| Line::from(format!("{event:?}")))
        .collect();
    let events =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Events"));
    f.render_widget(events, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let help = if app.status.is_empty() {
        Line::from(vec![
            Span::raw("Esc: Quit | "),
            Span::raw("Enter: Expand/newline | "),
            Span::raw("Tab/S-Tab: Arguments | "),
            Span::raw("S-Enter: Matrix row | "),
            Span::raw("A-→: Next cell | "),
            Span::raw("^S: Save"),
        ])
    } else {
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Yellow),
        ))
    };
    f.render_widget(Paragraph::new(vec![help]).block(Block::default()), area);
}

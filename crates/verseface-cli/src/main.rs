use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};
use verseface_config::Config;
use verseface_engine::{AnalysisSet, ParsedBook, VerseRef, io};

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    json: bool,
    book_path: Option<PathBuf>,
    analysis_path: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut json = false;
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option {flag}")),
            path => positional.push(PathBuf::from(path)),
        }
    }

    if positional.len() > 2 {
        return Err("Too many arguments".to_string());
    }
    let mut positional = positional.into_iter();
    Ok(Invocation {
        json,
        book_path: positional.next(),
        analysis_path: positional.next(),
    })
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [--json] [book.usfm] [analysis.csv|analysis.json]")
}

struct App {
    book: ParsedBook,
    analyses: AnalysisSet,
    verses: Vec<VerseRef>,
    verse_list_state: ListState,
    current_content: Vec<String>,
}

impl App {
    fn new(book: ParsedBook, analyses: AnalysisSet) -> Self {
        let verses = book.verses().map(|(reference, _)| reference).collect();

        let mut app = Self {
            book,
            analyses,
            verses,
            verse_list_state: ListState::default(),
            current_content: Vec::new(),
        };

        // Select first verse if available
        if !app.verses.is_empty() {
            app.select(0);
        }

        app
    }

    fn select(&mut self, index: usize) {
        self.verse_list_state.select(Some(index));
        self.update_content_for_selection();
    }

    fn next_verse(&mut self) {
        if self.verses.is_empty() {
            return;
        }
        let i = match self.verse_list_state.selected() {
            Some(i) => (i + 1) % self.verses.len(),
            None => 0,
        };
        self.select(i);
    }

    fn previous_verse(&mut self) {
        if self.verses.is_empty() {
            return;
        }
        let i = match self.verse_list_state.selected() {
            Some(0) | None => self.verses.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    /// Jump to the first verse of the next chapter, wrapping around.
    fn next_chapter(&mut self) {
        let Some(current) = self.selected_verse().map(|v| v.chapter) else {
            return;
        };
        let i = self
            .verses
            .iter()
            .position(|v| v.chapter > current)
            .unwrap_or(0);
        self.select(i);
    }

    /// Jump to the first verse of the previous chapter, wrapping around.
    fn previous_chapter(&mut self) {
        let Some(current) = self.selected_verse().map(|v| v.chapter) else {
            return;
        };
        let target = self
            .verses
            .iter()
            .rev()
            .map(|v| v.chapter)
            .find(|&chapter| chapter < current)
            .or_else(|| self.verses.last().map(|v| v.chapter));
        if let Some(target) = target
            && let Some(i) = self.verses.iter().position(|v| v.chapter == target)
        {
            self.select(i);
        }
    }

    fn selected_verse(&self) -> Option<&VerseRef> {
        self.verse_list_state
            .selected()
            .and_then(|i| self.verses.get(i))
    }

    fn update_content_for_selection(&mut self) {
        self.current_content = match self.selected_verse() {
            Some(reference) => self.render_verse(reference),
            None => Vec::new(),
        };
    }

    fn render_verse(&self, reference: &VerseRef) -> Vec<String> {
        let mut lines = vec![
            reference.to_string(),
            String::new(),
            self.book.lookup(reference).unwrap_or_default().to_string(),
            String::new(),
        ];

        match self.analyses.get(reference.chapter, reference.verse) {
            Some(analysis) => {
                for (key, value) in &analysis.fields {
                    lines.push(format!("{key}:"));
                    lines.extend(value.lines().map(|line| format!("  {line}")));
                }
            }
            None => lines.push("No analysis for this verse".to_string()),
        }

        lines
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("verseface-cli", String::as_str);

    let invocation = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    // Determine book path from CLI args or config file
    let config_path = Config::config_path();
    let remember = invocation.book_path.is_some();
    let (book_path, analysis_path) = match invocation.book_path {
        Some(book_path) => (book_path, invocation.analysis_path),
        None => match Config::load() {
            Ok(Some(config)) => (config.book_path, config.analysis_path),
            Ok(None) => {
                eprintln!("Error: No book path provided and no config file found");
                eprintln!("{}", usage(program));
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("{}", usage(program));
                process::exit(1);
            }
        },
    };

    let book = match io::read_book(&book_path) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let analyses = match &analysis_path {
        Some(path) => match io::read_analysis(path) {
            Ok(analyses) => analyses,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => AnalysisSet::default(),
    };
    if remember {
        remember_files(&book_path, analysis_path.as_deref());
    }
    for orphan in analyses.unmatched(&book) {
        log::warn!(
            "Analysis for {}:{} has no matching verse in {}",
            orphan.chapter,
            orphan.verse,
            book_path.display()
        );
    }

    if invocation.json {
        println!("{}", serde_json::to_string_pretty(&book)?);
        return Ok(());
    }

    if book.verse_count() == 0 {
        eprintln!("Nothing to display: no verses found in {}", book_path.display());
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(book, analyses);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Store the files just opened as the defaults for the next run without
/// arguments.
fn remember_files(book_path: &Path, analysis_path: Option<&Path>) {
    let config = Config::new(absolute(book_path), analysis_path.map(absolute));
    match config.save() {
        Ok(()) => log::debug!(
            "Remembered {} in {}",
            book_path.display(),
            Config::config_path().display()
        ),
        Err(e) => log::warn!("Could not remember opened files: {e}"),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_verse(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_verse(),
                KeyCode::Right | KeyCode::Char('n') => app.next_chapter(),
                KeyCode::Left | KeyCode::Char('p') => app.previous_chapter(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)].as_ref())
        .split(rows[0]);

    // Verse list panel
    let verse_items: Vec<ListItem> = app
        .verses
        .iter()
        .map(|reference| {
            let marker = if app
                .analyses
                .get(reference.chapter, reference.verse)
                .is_some()
            {
                "● "
            } else {
                "  "
            };
            let label = format!("{marker}{}:{}", reference.chapter, reference.verse);
            ListItem::new(vec![Line::from(vec![Span::raw(label)])])
        })
        .collect();

    let title = app.book.book_id().unwrap_or("Verses").to_string();
    let verse_list = List::new(verse_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(verse_list, chunks[0], &mut app.verse_list_state);

    // Content panel
    let content_text: Vec<Line> = app
        .current_content
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![Span::raw(line.clone())])
            }
        })
        .collect();

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Verse"))
        .wrap(Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("←/p: Previous chapter | →/n: Next chapter"),
    ]));

    f.render_widget(help, rows[1]);
}

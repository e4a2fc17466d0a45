mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use emissions_map::config::Cli;
use emissions_map::format::format_kilotonnes;
use emissions_map::pipeline::{self, distinct_elements, distinct_years, Selection};
use emissions_map::Sources;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let sources = cli.sources();
    let emissions = sources
        .load_emissions()
        .context("loading the emissions table")?;
    let years = distinct_years(&emissions);
    let elements = distinct_elements(&emissions);
    drop(emissions);

    let selection = cli.initial_selection(&years, &elements)?;

    if cli.summary {
        return print_summary(&sources, &selection);
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let mut app = App::new(sources, years, elements, &selection);
    let result = run(&mut terminal, &mut app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Logs go to --log-file, else stderr for --summary, else nowhere (the TUI owns the terminal)
fn init_logging(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let (writer, ansi) = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if cli.summary => (BoxMakeWriter::new(std::io::stderr), true),
        None => (BoxMakeWriter::new(std::io::sink), false),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .init();
    Ok(())
}

/// Print the dashboard numbers for one selection
fn print_summary(sources: &Sources, selection: &Selection) -> Result<()> {
    let view = pipeline::run(sources, selection).context("building the dashboard")?;

    println!("{}", ui::TITLE);
    println!("{}", ui::SUB_TITLE);
    println!();
    println!("{} {}", selection.year, selection.element);

    let with_values = view.map.records.iter().filter(|r| r.value.is_some()).count();
    println!(
        "  countries on map: {} ({} with data)",
        view.map.records.len(),
        with_values
    );
    if !view.map.unmatched_areas.is_empty() {
        println!("  areas without geometry: {}", view.map.unmatched_areas.join(", "));
    }
    match &view.map.thresholds {
        Some(t) => {
            let bounds: Vec<String> = t.boundaries().iter().map(|&b| format_kilotonnes(b)).collect();
            println!("  color thresholds: {}", bounds.join(" | "));
        }
        None => println!("  color thresholds: none (no values)"),
    }

    println!();
    println!("20 Year Metrics:");
    for m in &view.metrics {
        println!("  Total {} (Kilotonnes): {}", m.element, format_kilotonnes(m.total));
    }

    println!();
    println!("Yearly Metrics:");
    for m in &view.metrics {
        println!(
            "  {} {} (Kilotonnes): {}",
            selection.year,
            m.element,
            format_kilotonnes(m.yearly_total)
        );
    }

    for m in &view.metrics {
        println!();
        println!("{} Per Year:", m.element);
        for s in &m.series {
            println!("  {}  {}", s.year, format_kilotonnes(s.total_value));
        }
    }

    Ok(())
}

/// Handle mouse events for panning, zooming and hover
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Selection; each change re-runs the pipeline
                            KeyCode::Char(']') | KeyCode::Char('.') => app.next_year(),
                            KeyCode::Char('[') | KeyCode::Char(',') => app.prev_year(),
                            KeyCode::Tab | KeyCode::Char('e') => app.next_element(),

                            // Pan with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            KeyCode::Char('b') | KeyCode::Char('B') => {
                                app.renderer.toggle_outlines();
                            }

                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

use crate::app::state::AppState;
use crate::render::spectrum_renderer;
use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use std::io::{self, Stdout};

#[derive(Debug, Default, Clone, Copy)]
pub struct UiLayout {
    pub full: Rect,
    pub spectrum: Rect,
    pub ruler: Rect,
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub should_quit: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            should_quit: false,
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn draw(&mut self, app: &AppState) -> Result<UiLayout> {
        let mut layout_out = UiLayout::default();

        self.terminal.draw(|f| {
            let size = f.size();
            layout_out.full = size;

            if size.width < 10 || size.height < 6 {
                f.render_widget(
                    Paragraph::new("Terminal too small").style(Style::default()),
                    size,
                );
                return;
            }

            let block = Block::default().borders(Borders::ALL).title(" voxbars ");
            let inner = block.inner(size);
            f.render_widget(block, size);

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(inner);
            layout_out.spectrum = rows[0];
            layout_out.ruler = rows[1];

            spectrum_renderer::render(f, rows[0], app);
            spectrum_renderer::render_ruler(f, rows[1], app);
        })?;

        Ok(layout_out)
    }
}

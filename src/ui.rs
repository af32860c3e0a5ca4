//! Layout and drawing: score header, board, status footer.

use crate::flow::{DisplaySink, Status};
use crate::grid::Board;
use crate::theme::Theme;
use anyhow::Result;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{DefaultTerminal, Frame};

/// Terminal cells per tile.
const TILE_WIDTH: u16 = 7;
const TILE_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 2;

const HELP_MOVE: &str = "(W)Up (S)Down (A)Left (D)Right";
const HELP_SESSION: &str = "(R)Restart (Q)Exit";
const WIN_TEXT: &str = " YOU WIN! ";
const GAME_OVER_TEXT: &str = " GAME OVER ";

/// Board size in terminal cells, border included.
fn board_pixel_size(board: &Board) -> (u16, u16) {
    let w = (board.width() as u16).saturating_mul(TILE_WIDTH);
    let h = (board.height() as u16).saturating_mul(TILE_HEIGHT);
    (w.saturating_add(2), h.saturating_add(2))
}

/// Draw one frame: header, board and footer centred in the terminal. Clips when the
/// terminal is smaller than the board.
pub fn draw(
    frame: &mut Frame,
    theme: &Theme,
    score: u64,
    highscore: u64,
    board: &Board,
    status: Status,
) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

    let (bw, bh) = board_pixel_size(board);
    let total_w = bw.max(HELP_MOVE.len() as u16);

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(bh),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let board_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bw),
            Constraint::Fill(1),
        ])
        .split(vert_chunks[2]);

    draw_header(frame, theme, score, highscore, vert_chunks[1]);
    draw_board(frame, theme, board, board_chunks[1]);
    draw_footer(frame, theme, status, vert_chunks[3]);
}

fn draw_header(frame: &mut Frame, theme: &Theme, score: u64, highscore: u64, area: Rect) {
    let title_style = Style::default().fg(theme.title).bold();
    let fg_style = Style::default().fg(theme.main_fg);
    let mut lines = vec![Line::from(vec![
        Span::styled("SCORE: ", title_style),
        Span::styled(score.to_string(), fg_style),
    ])];
    if highscore != 0 {
        lines.push(Line::from(vec![
            Span::styled("HIGHSCORE: ", title_style),
            Span::styled(highscore.to_string(), fg_style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_board(frame: &mut Frame, theme: &Theme, board: &Board, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (y, row) in board.rows().iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let cell = Rect {
                x: inner.x.saturating_add((x as u16).saturating_mul(TILE_WIDTH)),
                y: inner.y.saturating_add((y as u16).saturating_mul(TILE_HEIGHT)),
                width: TILE_WIDTH,
                height: TILE_HEIGHT,
            }
            .intersection(inner);
            if cell.is_empty() {
                continue;
            }
            frame.render_widget(tile(theme, value), cell);
        }
    }
}

/// One tile box: value on the middle line, blank when empty.
fn tile(theme: &Theme, value: u32) -> Paragraph<'static> {
    let label = if value == 0 {
        String::new()
    } else {
        value.to_string()
    };
    Paragraph::new(vec![Line::from(""), Line::from(label)])
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.bg).bg(theme.tile_color(value)).bold())
}

fn draw_footer(frame: &mut Frame, theme: &Theme, status: Status, area: Rect) {
    let help_style = Style::default().fg(theme.inactive_fg);
    let status_line = match status {
        Status::Won => Line::from(Span::styled(
            WIN_TEXT,
            Style::default().fg(Color::Black).bg(Color::Green).bold(),
        )),
        Status::Lost => Line::from(Span::styled(
            GAME_OVER_TEXT,
            Style::default().fg(Color::White).bg(Color::Red).bold(),
        )),
        Status::Playing => Line::from(Span::styled(HELP_MOVE, help_style)),
    };
    let lines = vec![status_line, Line::from(Span::styled(HELP_SESSION, help_style))];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// [`DisplaySink`] drawing into the real terminal.
pub struct TerminalDisplay {
    terminal: DefaultTerminal,
    theme: Theme,
}

impl TerminalDisplay {
    pub fn new(terminal: DefaultTerminal, theme: Theme) -> Self {
        Self { terminal, theme }
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, score: u64, highscore: u64, board: &Board, status: Status) -> Result<()> {
        let theme = &self.theme;
        self.terminal
            .draw(|f| draw(f, theme, score, highscore, board, status))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn sample_board() -> Board {
        Board::from_rows(vec![
            vec![2, 0, 0, 2048],
            vec![0, 4, 0, 0],
            vec![0, 0, 16, 0],
            vec![0, 0, 0, 128],
        ])
        .unwrap()
    }

    fn render_lines(
        cols: u16,
        rows: u16,
        score: u64,
        highscore: u64,
        status: Status,
    ) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        let theme = Theme::default();
        let board = sample_board();
        terminal
            .draw(|f| draw(f, &theme, score, highscore, &board, status))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..rows)
            .map(|y| (0..cols).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn test_board_size_includes_border() {
        assert_eq!(board_pixel_size(&sample_board()), (30, 14));
    }

    #[test]
    fn test_draw_playing() {
        let lines = render_lines(40, 24, 12, 40, Status::Playing);
        assert!(contains(&lines, "SCORE: 12"));
        assert!(contains(&lines, "HIGHSCORE: 40"));
        assert!(contains(&lines, "2048"));
        assert!(contains(&lines, "128"));
        assert!(contains(&lines, HELP_MOVE));
        assert!(contains(&lines, HELP_SESSION));
        assert!(!contains(&lines, "GAME OVER"));
    }

    #[test]
    fn test_zero_highscore_hidden() {
        let lines = render_lines(40, 24, 0, 0, Status::Playing);
        assert!(contains(&lines, "SCORE: 0"));
        assert!(!contains(&lines, "HIGHSCORE"));
    }

    #[test]
    fn test_draw_terminal_states() {
        let won = render_lines(40, 24, 20000, 20000, Status::Won);
        assert!(contains(&won, "YOU WIN!"));
        assert!(!contains(&won, HELP_MOVE));

        let lost = render_lines(40, 24, 300, 500, Status::Lost);
        assert!(contains(&lost, "GAME OVER"));
        assert!(contains(&lost, HELP_SESSION));
    }

    #[test]
    fn test_tiny_terminal_clips() {
        let lines = render_lines(8, 4, 4, 0, Status::Playing);
        assert_eq!(lines.len(), 4);
    }
}

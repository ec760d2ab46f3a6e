use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Game, Heading, Player, PlayerColor, Position};
use crate::input::Keybindings;
use crate::metrics::GameMetrics;
use crate::session::{GameSummary, Session};

pub struct Renderer;

const BANNER_WIDTH: u16 = 48;
const BANNER_HEIGHT: u16 = 9;

/// Terminal color for a player's display color
pub fn terminal_color(color: PlayerColor) -> Color {
    match color {
        PlayerColor::Red => Color::Red,
        PlayerColor::Green => Color::Green,
        PlayerColor::Blue => Color::Blue,
        PlayerColor::Yellow => Color::Yellow,
        PlayerColor::Magenta => Color::Magenta,
        PlayerColor::Cyan => Color::Cyan,
        PlayerColor::White => Color::White,
        PlayerColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}

/// What occupies a single cell, looked up once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Head(PlayerColor),
    Trail(PlayerColor),
}

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        session: &Session,
        metrics: &GameMetrics,
        keybindings: &Keybindings,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(session, metrics);
        frame.render_widget(stats, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(chunks[1]);

        match session.game() {
            Some(game) => {
                frame.render_widget(self.render_grid(game), body[0]);
                // The final board stays visible around the banner
                if let Some(summary) = session.last_outcome() {
                    let banner = centered_rect(body[0], BANNER_WIDTH, BANNER_HEIGHT);
                    frame.render_widget(Clear, banner);
                    frame.render_widget(self.render_game_over(summary), banner);
                }
            }
            None => {
                frame.render_widget(self.render_lobby(session), body[0]);
            }
        }

        frame.render_widget(self.render_roster(session, metrics, keybindings), body[1]);

        let controls = self.render_controls(chunks[2], session);
        frame.render_widget(controls, chunks[2]);
    }

    fn cells(game: &Game) -> Vec<Vec<Cell>> {
        let board = game.board();
        let mut cells = vec![vec![Cell::Empty; board.width() as usize]; board.height() as usize];

        let mut paint = |pos: Position, cell: Cell| {
            if board.contains(pos) {
                cells[pos.y as usize][pos.x as usize] = cell;
            }
        };

        for player in game.players() {
            for &pos in player.trail() {
                paint(pos, Cell::Trail(player.color()));
            }
        }
        // Heads last so they stay visible over trails
        for player in game.players().iter().filter(|p| p.is_alive()) {
            paint(player.position(), Cell::Head(player.color()));
        }

        cells
    }

    fn render_grid(&self, game: &Game) -> Paragraph<'_> {
        let lines: Vec<Line> = Self::cells(game)
            .into_iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .into_iter()
                    .map(|cell| match cell {
                        Cell::Head(color) => Span::styled(
                            "██",
                            Style::default()
                                .fg(terminal_color(color))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Cell::Trail(color) => {
                            Span::styled("▒▒", Style::default().fg(terminal_color(color)))
                        }
                        Cell::Empty => Span::styled(" .", Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = if game.all_ready() {
            " Tron ".to_string()
        } else {
            " Tron - waiting for every player to move ".to_string()
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, session: &Session, metrics: &GameMetrics) -> Paragraph<'_> {
        let ticks = session.game().map_or(0, Game::ticks);
        let alive = session.game().map_or(0, Game::alive_count);

        let text = vec![Line::from(vec![
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                ticks.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Alive: ", Style::default().fg(Color::Yellow)),
            Span::styled(alive.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Ties: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.ties.to_string(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_roster(
        &self,
        session: &Session,
        metrics: &GameMetrics,
        keybindings: &Keybindings,
    ) -> Paragraph<'_> {
        Paragraph::new(Self::roster_lines(session, metrics, keybindings)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Players "),
        )
    }

    fn roster_lines(
        session: &Session,
        metrics: &GameMetrics,
        keybindings: &Keybindings,
    ) -> Vec<Line<'static>> {
        let config = session.settings().config();
        let mut lines = Vec::new();

        for (index, slot) in config.players.iter().take(config.player_count).enumerate() {
            let player = session.game().and_then(|game| game.player(index));
            let status = match player {
                Some(p) if !p.is_alive() => "out",
                Some(p) if p.heading() == Heading::None => "ready?",
                Some(_) => "riding",
                None => "",
            };
            let keys: String = keybindings
                .keys_for(index)
                .iter()
                .map(|&(code, _)| key_label(code))
                .collect::<Vec<_>>()
                .join(" ");

            let wins = metrics.wins_for(&slot.name);
            lines.push(Line::from(vec![
                Span::styled(
                    slot.name.clone(),
                    Style::default()
                        .fg(terminal_color(slot.color))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {wins} {}", if wins == 1 { "win" } else { "wins" }),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled(keys, Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(status, status_style(player)),
            ]));
            lines.push(Line::from(""));
        }

        lines
    }

    fn render_lobby(&self, session: &Session) -> Paragraph<'_> {
        let config = session.settings().config();
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "TRON",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Players: ", Style::default().fg(Color::Yellow)),
                Span::raw(config.player_count.to_string()),
                Span::raw("    "),
                Span::styled("Map: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{} x {} squares", config.map_width, config.map_height)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_game_over(&self, summary: &GameSummary) -> Paragraph<'_> {
        let result = match summary {
            GameSummary::Winner { name, color } => Span::styled(
                format!("{name} won!"),
                Style::default()
                    .fg(terminal_color(*color))
                    .add_modifier(Modifier::BOLD),
            ),
            GameSummary::Tie => Span::styled(
                "Tie Game",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![result]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for a new game or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect, session: &Session) -> Paragraph<'_> {
        let text = if session.is_in_progress() {
            vec![Line::from(vec![
                Span::raw("Every player moves once to begin | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])]
        } else {
            vec![Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" start | "),
                Span::styled("+/-", Style::default().fg(Color::Cyan)),
                Span::raw(" players | "),
                Span::styled("[/]", Style::default().fg(Color::Cyan)),
                Span::raw(" map size | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])]
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        _ => "?".to_string(),
    }
}

fn status_style(player: Option<&Player>) -> Style {
    match player {
        Some(p) if !p.is_alive() => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::White),
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Player};

    #[test]
    fn test_cells_show_heads_over_trails() {
        let board = Board::new(20, 20).unwrap();
        let mut game = Game::from_parts(
            board,
            vec![
                Player::new("A", PlayerColor::Red, Position::new(1, 1)),
                Player::new("B", PlayerColor::Blue, Position::new(10, 10)),
            ],
        )
        .unwrap();
        game.turn(0, Heading::Right);
        game.turn(1, Heading::Down);
        game.tick();

        let cells = Renderer::cells(&game);
        assert_eq!(cells.len(), 20);
        assert_eq!(cells[1][1], Cell::Trail(PlayerColor::Red));
        assert_eq!(cells[1][2], Cell::Head(PlayerColor::Red));
        assert_eq!(cells[11][10], Cell::Head(PlayerColor::Blue));
        assert_eq!(cells[0][0], Cell::Empty);
    }

    #[test]
    fn test_dead_head_is_hidden_and_offboard_is_skipped() {
        let board = Board::new(20, 20).unwrap();
        let mut game = Game::from_parts(
            board,
            vec![
                Player::new("A", PlayerColor::Red, Position::new(0, 3)),
                Player::new("B", PlayerColor::Blue, Position::new(10, 10)),
            ],
        )
        .unwrap();
        game.turn(0, Heading::Left);
        game.turn(1, Heading::Down);
        game.tick();

        let cells = Renderer::cells(&game);
        assert_eq!(cells[3][0], Cell::Trail(PlayerColor::Red));
        assert!(
            cells
                .iter()
                .flatten()
                .all(|&cell| cell != Cell::Head(PlayerColor::Red))
        );
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_roster_shows_win_counts() {
        let session = Session::default();
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(Some("Player Two"));
        metrics.on_game_over(Some("Player Two"));
        metrics.on_game_over(None);

        let text: Vec<String> = Renderer::roster_lines(&session, &metrics, &Keybindings::default())
            .iter()
            .map(line_text)
            .collect();

        assert!(text.contains(&"Player One  0 wins".to_string()));
        assert!(text.contains(&"Player Two  2 wins".to_string()));
        assert!(!text.iter().any(|line| line.starts_with("Player Three")));
    }

    #[test]
    fn test_banner_is_centered_over_board() {
        let area = Rect::new(0, 3, 80, 30);
        let banner = centered_rect(area, BANNER_WIDTH, BANNER_HEIGHT);
        assert_eq!(banner, Rect::new(16, 13, 48, 9));

        // A small terminal clips the banner to the board area
        let tiny = Rect::new(2, 2, 20, 5);
        assert_eq!(centered_rect(tiny, BANNER_WIDTH, BANNER_HEIGHT), tiny);
    }

    #[test]
    fn test_terminal_colors() {
        assert_eq!(terminal_color(PlayerColor::Yellow), Color::Yellow);
        assert_eq!(terminal_color(PlayerColor::Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
    }
}

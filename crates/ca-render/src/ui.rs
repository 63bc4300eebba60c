use std::time::Duration;

use ca_core::automaton::Family;
use ca_core::palette::Palette;
use ca_core::seed::{EditMode, SeedEditor};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::canvas;
use crate::rate::GenerationRate;
use crate::scrollback::Scrollback;

/// Largeur fixe de la sidebar, bordure comprise.
pub const SIDEBAR_WIDTH: u16 = 22;

/// Générations simulées entre deux images affichées.
pub const STEPS_PER_FRAME: u64 = 2;

/// Application state mirrored for rendering decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Running,
    Paused,
    /// Help overlay visible.
    Help,
}

/// Tout ce qu'il faut pour dessiner un écran de simulation.
pub struct SimView<'a> {
    pub history: &'a Scrollback,
    pub palette: &'a Palette,
    pub family: Family,
    /// Libellé de la règle, ex. « Rule 150R ».
    pub rule_label: &'a str,
    pub width: usize,
    pub delay: Duration,
    pub steps: u64,
    pub rate: &'a GenerationRate,
    pub state: RenderState,
    pub show_sidebar: bool,
}

/// Columns left for the canvas once the sidebar is placed.
#[must_use]
pub fn canvas_width(terminal_width: u16, show_sidebar: bool) -> u16 {
    if show_sidebar {
        terminal_width.saturating_sub(SIDEBAR_WIDTH)
    } else {
        terminal_width
    }
}

/// Draw the simulation screen: canvas + sidebar (+ help overlay).
pub fn draw(frame: &mut Frame, view: &SimView<'_>) {
    let area = frame.area();
    let sidebar = if view.show_sidebar { SIDEBAR_WIDTH } else { 0 };
    let chunks = Layout::horizontal([Constraint::Min(1), Constraint::Length(sidebar)]).split(area);

    canvas::render_pairs(frame.buffer_mut(), chunks[0], view.history, view.palette);

    if view.show_sidebar {
        draw_sidebar(frame, chunks[1], view);
    }
    if view.state == RenderState::Help {
        draw_help_overlay(frame, area, view.family);
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("─ {title} {}", "─".repeat(14usize.saturating_sub(title.len()))),
        Style::default().fg(Color::Yellow),
    ))
}

fn draw_sidebar(frame: &mut Frame, area: Rect, view: &SimView<'_>) {
    let state_str = match view.state {
        RenderState::Running => "▶ RUN",
        RenderState::Paused => "⏸ PAUSE",
        RenderState::Help => "? HELP",
    };
    let family_short = match view.family {
        Family::Elementary => "Elementary",
        Family::Reversible => "Reversible",
        Family::Totalistic => "Totalistic",
    };

    let mut lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(Color::Green))),
        Line::from(""),
        section("Automate"),
        Line::from(format!(" {family_short}")),
        Line::from(format!(" {}", view.rule_label)),
        Line::from(format!(" Width: {}", view.width)),
        Line::from(""),
        section("Temps"),
        Line::from(format!(" Delay: {} ms", view.delay.as_millis())),
        Line::from(format!(" Gen: {}", view.steps)),
        Line::from(format!(" {:.1} gen/s", view.rate.per_second())),
        Line::from(format!(
            " nominal {:.1}/s",
            GenerationRate::nominal(view.delay, STEPS_PER_FRAME)
        )),
        Line::from(""),
        section("Palette"),
    ];
    let swatches: Vec<Span> = view
        .palette
        .colors()
        .iter()
        .map(|&(r, g, b)| Span::styled("  ", Style::default().bg(Color::Rgb(r, g, b))))
        .collect();
    lines.push(Line::from(swatches));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ? = help",
        Style::default().fg(Color::DarkGray),
    )));

    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" cellscii "));
    frame.render_widget(sidebar, area);
}

/// Rect of `width × height` centered in `area`, clipped to it.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn draw_help_overlay(frame: &mut Frame, area: Rect, family: Family) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " cellscii : Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" q/Esc    Quit"),
        Line::from(" Space    Pause/Resume"),
        Line::from(" +/-      Delay ±"),
        Line::from(" i        Invert palette"),
        Line::from(" s        Toggle sidebar"),
        Line::from(" ?        Toggle help"),
    ];
    if family == Family::Reversible {
        help_text.insert(4, Line::from(" r        Reverse time"));
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press ? or Esc to close ",
        Style::default().fg(Color::DarkGray),
    )));

    let help_area = centered(area, 34, help_text.len() as u16 + 2);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

fn dialog(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .style(Style::default().bg(Color::Black).fg(Color::White))
}

/// Menu vertical, l'entrée `selected` en vidéo inverse.
pub fn draw_menu(frame: &mut Frame, title: &str, options: &[&str], selected: usize) {
    let mut lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            if i == selected {
                Line::from(Span::styled(
                    format!(" ▸ {option} "),
                    Style::default().add_modifier(Modifier::REVERSED),
                ))
            } else {
                Line::from(format!("   {option} "))
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ↑/↓ Enter · 1-9 · Esc",
        Style::default().fg(Color::DarkGray),
    )));

    let width = options
        .iter()
        .map(|o| o.chars().count() as u16 + 6)
        .chain([title.chars().count() as u16 + 6, 26])
        .max()
        .unwrap_or(26);
    let area = centered(frame.area(), width, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(dialog(title)), area);
}

/// Saisie numérique bornée, avec le dernier message d'erreur éventuel.
pub fn draw_number(frame: &mut Frame, prompt: &str, input: &str, max: u64, error: Option<&str>) {
    let mut lines = vec![
        Line::from(format!(" {input}▏")),
        Line::from(Span::styled(
            format!(" 0 – {max} · Enter · Esc"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(msg) = error {
        lines.push(Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(Color::Red),
        )));
    }
    let width = (prompt.chars().count() as u16 + 6).max(30);
    let area = centered(frame.area(), width, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(dialog(prompt)), area);
}

/// First visible column so that `cursor` stays on screen.
#[must_use]
pub fn scroll_offset(cursor: usize, total: usize, visible: usize) -> usize {
    if total <= visible {
        return 0;
    }
    cursor
        .saturating_sub(visible / 2)
        .min(total - visible)
}

/// Éditeur de seed : une ligne de chiffres par génération, curseur en vidéo inverse.
pub fn draw_seed_editor(frame: &mut Frame, editor: &SeedEditor, palette: &Palette) {
    let area = frame.area();
    let visible = usize::from(area.width.saturating_sub(4));
    let (cursor_row, cursor_col) = editor.cursor();
    let offset = scroll_offset(cursor_col, editor.width(), visible);

    let mut lines: Vec<Line> = editor
        .rows()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible)
                .map(|(c, &symbol)| {
                    let (red, green, blue) = palette.color(symbol);
                    let mut style = Style::default()
                        .fg(Color::Rgb(red, green, blue))
                        .bg(Color::DarkGray);
                    if (r, c) == (cursor_row, cursor_col) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(symbol.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    lines.push(Line::from(""));
    let hint = if editor.reduced_input() {
        match editor.mode() {
            EditMode::Navigate => " NAV · 2↑ 8↓ 4← 6→ · other digit: enter mode",
            EditMode::Enter => " ENTER · digits write · toggle: back to nav",
        }
    } else {
        " arrows move · digits write · Enter confirm"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(format!(
        " col {}/{} · row {}/{} · base {}",
        cursor_col + 1,
        editor.width(),
        cursor_row + 1,
        editor.rows().len(),
        editor.base()
    )));

    let height = lines.len() as u16 + 2;
    let dialog_area = centered(area, area.width, height);
    frame.render_widget(Clear, dialog_area);
    frame.render_widget(Paragraph::new(lines).block(dialog("Seed")), dialog_area);
}

#[cfg(test)]
mod tests {
    use ca_core::seed::{SeedBuilder, SeedKey};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn sidebar_shows_rule_and_delay() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let history = Scrollback::new(4);
        let palette = Palette::for_base(2);
        let rate = GenerationRate::new(4);
        let view = SimView {
            history: &history,
            palette: &palette,
            family: Family::Elementary,
            rule_label: "Rule 110",
            width: 37,
            delay: Duration::from_millis(50),
            steps: 12,
            rate: &rate,
            state: RenderState::Paused,
            show_sidebar: true,
        };
        terminal.draw(|f| draw(f, &view)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Rule 110"));
        assert!(text.contains("nominal 40.0/s"));
        assert!(text.contains("Delay: 50 ms"));
        assert!(text.contains("PAUSE"));
    }

    #[test]
    fn help_mentions_reverse_only_for_reversible() {
        let history = Scrollback::new(4);
        let palette = Palette::for_base(2);
        let rate = GenerationRate::new(4);
        for (family, expected) in [(Family::Reversible, true), (Family::Elementary, false)] {
            let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
            let view = SimView {
                history: &history,
                palette: &palette,
                family,
                rule_label: "Rule 90R",
                width: 37,
                delay: Duration::from_millis(50),
                steps: 0,
                rate: &rate,
                state: RenderState::Help,
                show_sidebar: false,
            };
            terminal.draw(|f| draw(f, &view)).unwrap();
            assert_eq!(screen_text(&terminal).contains("Reverse time"), expected);
        }
    }

    #[test]
    fn menu_marks_selection() {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| draw_menu(f, "Rule", &["Rule 30", "Rule 110"], 1))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("▸ Rule 110"));
        assert!(text.contains("  Rule 30"));
    }

    #[test]
    fn seed_editor_scrolls_to_cursor() {
        assert_eq!(scroll_offset(0, 100, 20), 0);
        assert_eq!(scroll_offset(50, 100, 20), 40);
        assert_eq!(scroll_offset(99, 100, 20), 80);
        assert_eq!(scroll_offset(5, 10, 20), 0);

        let mut editor = SeedBuilder::new(2, 1, 9, 80).unwrap().editor(false);
        editor.handle(SeedKey::Digit(1));
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|f| draw_seed_editor(f, &editor, &Palette::for_base(2)))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("100000000"));
        assert!(text.contains("col 2/9"));
    }

    #[test]
    fn canvas_width_leaves_room_for_sidebar() {
        assert_eq!(canvas_width(80, true), 58);
        assert_eq!(canvas_width(80, false), 80);
        assert_eq!(canvas_width(10, true), 0);
    }
}

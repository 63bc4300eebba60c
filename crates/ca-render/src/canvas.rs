use ca_core::grid::Symbol;
use ca_core::palette::{Palette, Rgb};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::scrollback::Scrollback;

/// Demi-bloc inférieur : le fond porte la ligne du haut, le texte celle du bas.
pub const HALF_BLOCK: char = '▄';

/// Nuances du mode texte, du symbole 0 au plus dense.
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

#[inline]
fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Écrit directement les paires de lignes dans un `ratatui::Buffer`.
///
/// One terminal row per pair. Pairs fill the area from the top; once the
/// area is full the newest pair sits on the last row and older ones scroll
/// up.
///
/// # Example
/// ```
/// use ca_core::palette::Palette;
/// use ca_render::canvas::render_pairs;
/// use ca_render::scrollback::Scrollback;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let area = Rect::new(0, 0, 3, 2);
/// let mut buf = Buffer::empty(area);
/// let mut history = Scrollback::new(8);
/// history.push(&[0, 1, 0], &[1, 1, 1]);
/// render_pairs(&mut buf, area, &history, &Palette::for_base(2));
/// assert_eq!(buf[(1, 0)].symbol(), "▄");
/// ```
pub fn render_pairs(buf: &mut Buffer, area: Rect, history: &Scrollback, palette: &Palette) {
    for (cy, pair) in history.last(usize::from(area.height)).enumerate() {
        let y = area.y + cy as u16;
        for (cx, (&top, &bottom)) in pair.top.iter().zip(&pair.bottom).enumerate() {
            if cx >= usize::from(area.width) {
                break;
            }
            if let Some(cell) = buf.cell_mut((area.x + cx as u16, y)) {
                cell.set_char(HALF_BLOCK)
                    .set_fg(rgb(palette.color(bottom)))
                    .set_bg(rgb(palette.color(top)));
            }
        }
    }
}

/// Text rendering of one row for non-terminal output.
///
/// Symbols are spread over a fixed shade ramp according to `base`.
///
/// # Example
/// ```
/// use ca_render::canvas::shade_line;
/// assert_eq!(shade_line(&[0, 1, 0], 2), " █ ");
/// assert_eq!(shade_line(&[0, 1, 2], 3), " ▒█");
/// ```
#[must_use]
pub fn shade_line(row: &[Symbol], base: u8) -> String {
    let last = usize::from(base.max(2) - 1);
    let top = SHADES.len() - 1;
    row.iter()
        .map(|&s| SHADES[usize::from(s).min(last) * top / last])
        .collect()
}

#[cfg(test)]
mod tests {
    use ca_core::palette::{BLACK, WHITE};

    use super::*;

    fn history(pairs: &[(&[Symbol], &[Symbol])]) -> Scrollback {
        let mut h = Scrollback::new(16);
        for (top, bottom) in pairs {
            h.push(top, bottom);
        }
        h
    }

    #[test]
    fn colors_follow_top_and_bottom_rows() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        render_pairs(&mut buf, area, &history(&[(&[0, 1], &[1, 0])]), &Palette::for_base(2));
        assert_eq!(buf[(0, 0)].bg, rgb(WHITE));
        assert_eq!(buf[(0, 0)].fg, rgb(BLACK));
        assert_eq!(buf[(1, 0)].bg, rgb(BLACK));
        assert_eq!(buf[(1, 0)].fg, rgb(WHITE));
    }

    #[test]
    fn newest_pair_lands_on_last_row_when_full() {
        let area = Rect::new(0, 0, 1, 2);
        let mut buf = Buffer::empty(area);
        let h = history(&[(&[0], &[0]), (&[1], &[1]), (&[0], &[1])]);
        render_pairs(&mut buf, area, &h, &Palette::for_base(2));
        assert_eq!(buf[(0, 0)].bg, rgb(BLACK));
        assert_eq!(buf[(0, 1)].bg, rgb(WHITE));
        assert_eq!(buf[(0, 1)].fg, rgb(BLACK));
    }

    #[test]
    fn rows_wider_than_area_are_cut() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        render_pairs(&mut buf, area, &history(&[(&[1, 1, 1], &[1, 1, 1])]), &Palette::for_base(2));
        assert_eq!(buf[(1, 0)].symbol(), "▄");
    }

    #[test]
    fn shade_line_spans_the_ramp() {
        assert_eq!(shade_line(&[0, 1], 2), " █");
        assert_eq!(shade_line(&[2, 1, 0], 3), "█▒ ");
        assert_eq!(shade_line(&[9], 3), "█");
    }
}

use crate::app::state::AppState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Draw one column per bar, colored by vertical zone: green for the lower
/// 60% of the area, blue to 80%, red above.
pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let h = area.height as usize;
    let w = area.width as usize;
    if h == 0 || w == 0 {
        return;
    }

    let t1 = 6 * h / 10;
    let t2 = 8 * h / 10;

    let mut lines: Vec<Line> = Vec::with_capacity(h);
    for row in 0..h {
        let cells_from_bottom = h - row;
        let mut s = String::with_capacity(w);
        for x in 0..w {
            let v = app.bars.get(x).copied().unwrap_or(0.0).clamp(0.0, 1.0);
            let filled = (v * h as f32).round() as usize;
            s.push(if filled >= cells_from_bottom { '█' } else { ' ' });
        }
        let color = if cells_from_bottom > t2 {
            Color::Red
        } else if cells_from_bottom > t1 {
            Color::Blue
        } else {
            Color::Green
        };
        lines.push(Line::from(Span::styled(s, Style::default().fg(color))));
    }

    f.render_widget(Paragraph::new(lines), area);
}

/// Tick marks under the bars wherever a column crosses a 500 Hz multiple.
pub fn render_ruler(f: &mut Frame, area: Rect, app: &AppState) {
    let w = area.width as usize;
    if w == 0 {
        return;
    }

    let ruler = ruler_line(w, app.config.freq_lo, app.config.freq_hi);
    let line = Line::from(Span::styled(ruler, Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(vec![line]), area);
}

fn ruler_line(width: usize, freq_lo: u32, freq_hi: u32) -> String {
    let span = freq_hi.saturating_sub(freq_lo) as f32;
    let mut out = String::with_capacity(width);
    let mut old = (freq_lo % 500) as i64;
    for i in 0..width {
        let cur = freq_lo + (i as f32 * span / width.max(1) as f32) as u32;
        let rem = (cur % 500) as i64;
        // The remainder wraps when the column crosses a 500 Hz boundary.
        out.push(if rem < old { '+' } else { ' ' });
        old = rem;
    }
    out
}

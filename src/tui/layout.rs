use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 标准三段式布局：Header(3) + Content(弹性) + Footer(3)
pub fn main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

/// 渲染通用 header
pub fn render_header(f: &mut Frame, title: &str, area: Rect) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// 渲染通用 footer
pub fn render_footer(f: &mut Frame, text: &str, area: Rect) {
    let footer = Paragraph::new(format!(" {}", text))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(footer, area);
}

/// 估算内容区域可见行数（总高度减去 header/footer/borders）
pub fn visible_content_height(term_height: u16) -> usize {
    term_height.saturating_sub(8) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_fixed_header_and_footer() {
        let rects = main_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].height, 3);
        assert_eq!(rects[1].height, 18);
        assert_eq!(rects[2].height, 3);
    }

    #[test]
    fn tiny_terminal_has_no_content_rows() {
        assert_eq!(visible_content_height(24), 16);
        assert_eq!(visible_content_height(5), 0);
    }
}

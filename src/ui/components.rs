//! UI components for the TUI

use crate::app::{App, Focus};
use crate::form::{Field, RequestState};
use crate::suggestion::ConversationSuggestion;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

const TITLE: &str = "Trình Khởi Tạo Cuộc Trò Chuyện";
const SUBTITLE: &str = "Nhập thông tin về bối cảnh và mục tiêu của bạn, AI sẽ giúp bạn tìm ra cách bắt đầu cuộc trò chuyện một cách tự nhiên và hiệu quả nhất.";
const KEY_HINTS: &str = "Tab/Shift+Tab: chuyển ô · Enter: xuống dòng · Ctrl+S: tạo gợi ý · Esc: thoát";

/// Card titles and colours, in display order
pub const CARDS: [(&str, Color); 3] = [
    ("Gợi ý bắt chuyện", Color::Cyan),
    ("Phân tích & Diễn giải", Color::Green),
    ("Những hiểu lầm có thể xảy ra", Color::Yellow),
];

const INPUT_HEIGHT: u16 = 5;

pub fn render(app: &App, frame: &mut Frame) {
    let state = app.form.state();
    let banner_height = if state.error().is_some() { 4 } else { 0 };

    let [header, inputs, submit, banner, results, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(INPUT_HEIGHT * 2),
        Constraint::Length(3),
        Constraint::Length(banner_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header);
    render_inputs(app, frame, inputs);
    render_submit(app, frame, submit);
    if let Some(message) = state.error() {
        render_error(frame, banner, message);
    }

    match state {
        RequestState::Loading => render_loading(app, frame, results),
        RequestState::Success(suggestion) => render_cards(frame, results, suggestion),
        RequestState::Idle | RequestState::Failure(_) => {}
    }

    frame.render_widget(
        Paragraph::new(KEY_HINTS)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        footer,
    );
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_inputs(app: &App, frame: &mut Frame, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(INPUT_HEIGHT); 2]).split(area);
    let mut cells = Vec::with_capacity(Field::ALL.len());
    for row in rows.iter() {
        cells.extend(
            Layout::horizontal([Constraint::Percentage(50); 2])
                .split(*row)
                .iter()
                .copied(),
        );
    }

    for (field, cell) in Field::ALL.into_iter().zip(cells) {
        render_input(app, frame, cell, field);
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, field: Field) {
    let focused = app.focus == Focus::Input(field);
    let value = app.form.inputs().get(field);

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::bordered()
        .title(Span::styled(
            field.label(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .border_style(border);

    let mut lines: Vec<Line> = if value.is_empty() {
        vec![Line::from(Span::styled(
            field.placeholder(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        value.split('\n').map(Line::from).collect()
    };
    if focused {
        let caret = Span::styled("▏", Style::default().fg(Color::Cyan));
        if value.is_empty() {
            lines.insert(0, Line::from(caret));
        } else if let Some(last) = lines.last_mut() {
            last.push_span(caret);
        }
    }

    // Keep the end of long inputs visible, counting wrapped rows
    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let rows = paragraph.line_count(inner.width);
    let scroll = rows.saturating_sub(inner.height as usize) as u16;

    frame.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}

fn render_submit(app: &App, frame: &mut Frame, area: Rect) {
    let loading = app.form.state().is_loading();
    let enabled = app.form.can_submit();
    let label = if loading { "Đang tạo..." } else { "Tạo gợi ý" };

    let style = if enabled {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let border = if app.focus == Focus::Submit {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let width = (label.chars().count() as u16 + 8).min(area.width);
    let [button] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {label} "), style))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(border)),
        button,
    );
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title("Lỗi")
                    .border_style(Style::default().fg(Color::Red)),
            ),
        area,
    );
}

fn render_loading(app: &App, frame: &mut Frame, area: Rect) {
    let dots = ".".repeat(app.animation_frame as usize + 1);
    let [line] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(
        Paragraph::new(format!("AI đang suy nghĩ{dots}"))
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center),
        line,
    );
}

fn render_cards(frame: &mut Frame, area: Rect, suggestion: &ConversationSuggestion) {
    let areas = Layout::vertical([Constraint::Ratio(1, 3); 3]).split(area);

    for (((title, color), content), card) in CARDS
        .into_iter()
        .zip(suggestion.sections())
        .zip(areas.iter().copied())
    {
        let block = Block::bordered()
            .title(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(color));
        frame.render_widget(
            Paragraph::new(content)
                .wrap(Wrap { trim: false })
                .block(block),
            card,
        );
    }
}

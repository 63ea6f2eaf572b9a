//! Transcript and input rendering.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::core::message::Role;
use crate::core::session::SendPhase;

const TITLE: &str = "Edris - AI Assistant";
const PENDING_INDICATOR: &str = "Edris is thinking...";

/// Height of the bordered input box at the bottom of the frame.
pub const INPUT_AREA_HEIGHT: u16 = 3;

/// Build the transcript as display lines. Each message re-evaluates its own
/// direction so RTL bubbles right-align independently of their neighbors.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let theme = &app.theme;

    for msg in app.session.messages() {
        let alignment = if msg.direction().is_rtl() {
            Alignment::Right
        } else {
            Alignment::Left
        };

        match msg.role {
            Role::User => {
                lines.push(
                    Line::from(vec![
                        Span::styled("You: ", theme.user_prefix_style),
                        Span::styled(msg.content.clone(), theme.user_text_style),
                    ])
                    .alignment(alignment),
                );
                lines.push(Line::from(""));
            }
            Role::Assistant => {
                for content_line in msg.content.lines() {
                    lines.push(
                        Line::from(Span::styled(
                            content_line.to_string(),
                            theme.assistant_text_style,
                        ))
                        .alignment(alignment),
                    );
                }
                lines.push(Line::from(""));
            }
            Role::App => {
                for content_line in msg.content.lines() {
                    lines.push(Line::from(Span::styled(
                        content_line.to_string(),
                        theme.notice_text_style,
                    )));
                }
                lines.push(Line::from(""));
            }
        }
    }

    if app.session.phase() == SendPhase::Pending {
        lines.push(Line::from(Span::styled(
            PENDING_INDICATOR,
            theme.pending_indicator_style,
        )));
    }

    lines
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_AREA_HEIGHT)])
        .split(f.area());

    f.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(app.theme.background_color)),
        f.area(),
    );

    render_transcript(f, app, chunks[0]);
    render_input(f, app, chunks[1]);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let lines = transcript_lines(app);

    // Account for the title row; keep the scroll offset within bounds.
    let available_height = area.height.saturating_sub(1);
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    let scroll_offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .title(TITLE)
                .title_style(app.theme.title_style),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));

    f.render_widget(transcript, area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let rtl = app.session.direction().is_rtl();
    let alignment = if rtl { Alignment::Right } else { Alignment::Left };

    let input = Paragraph::new(app.input.as_str())
        .style(app.theme.input_text_style)
        .alignment(alignment)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.input_border_style)
                .title(input_title(app))
                .title_style(app.theme.input_title_style),
        );

    f.render_widget(input, area);

    // Cursor tracks the logical end of the input inside the border.
    let input_width = UnicodeWidthStr::width(app.input.as_str()) as u16;
    let inner_width = area.width.saturating_sub(2);
    let x = if rtl {
        area.x + 1 + inner_width.saturating_sub(input_width + 1)
    } else {
        area.x + 1 + input_width.min(inner_width.saturating_sub(1))
    };
    f.set_cursor_position((x, area.y + 1));
}

fn input_title(app: &App) -> String {
    let modes = app.session.active_modes();
    if modes.is_empty() {
        "Type your message (Enter to send, /help for commands, Ctrl+C to quit)".to_string()
    } else {
        format!(
            "Type your message (modes: {}) - Enter to send, Ctrl+C to quit",
            modes.join(", ")
        )
    }
}

/// Line count used by the event loop for scroll clamping.
pub fn transcript_line_count(app: &App) -> u16 {
    transcript_lines(app).len() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::tests::test_app;
    use crate::core::transport::QueryOutcome;

    #[test]
    fn transcript_opens_with_the_greeting() {
        let app = test_app();
        let lines = transcript_lines(&app);
        // Greeting line plus its spacing line.
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn pending_sessions_show_the_indicator() {
        let mut app = test_app();
        app.session.begin_send("hello").expect("accepted");

        let lines = transcript_lines(&app);
        let last = lines.last().expect("indicator line");
        assert_eq!(last.spans[0].content, PENDING_INDICATOR);
    }

    #[test]
    fn rtl_messages_are_right_aligned() {
        let mut app = test_app();
        let (_, generation) = app.session.begin_send("سلام").expect("accepted");
        app.session
            .resolve(generation, QueryOutcome::Response("درود".to_string()));

        let lines = transcript_lines(&app);
        let user_line = &lines[2];
        assert_eq!(user_line.alignment, Some(Alignment::Right));

        let greeting_line = &lines[0];
        assert_eq!(greeting_line.alignment, Some(Alignment::Left));
    }
}

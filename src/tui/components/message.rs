use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget};

use crate::core::appearance::Appearance;
use crate::core::message::Message;

/// Accent used for the featured author (border, name, badge).
pub const ACCENT: Color = Color::Rgb(0xff, 0x4b, 0x4b);
const NAME_COLOR: Color = Color::Gray;

/// Left border (1) + padding (1) for featured messages, padding (2) otherwise.
/// Both layouts consume the same width so bodies line up.
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Author line above the body.
const HEADER_HEIGHT: u16 = 1;
/// Blank row separating consecutive messages.
const MARGIN_BOTTOM: u16 = 1;

/// A stateless component that renders one chat message.
///
/// `MessageView` is transient: `MessageList` creates one per visible message
/// each frame. Layout:
///
/// ```text
/// ┃ taiga3537 [OFFICIAL] 12:30     ← featured author: accent border + badge
/// ┃ welcome everyone
///
///   anonymous 12:31                ← everyone else: plain, gray name
///   hi!
/// ```
///
/// Body text is wrapped here with `textwrap` rather than by `Paragraph`, so
/// [`calculate_height`](Self::calculate_height) and rendering always agree.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    pub appearance: &'a Appearance,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message, appearance: &'a Appearance) -> Self {
        Self {
            message,
            appearance,
        }
    }

    /// Rows this message occupies at the given width, margin included.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let body_lines = u16::try_from(wrap_body(&message.text, width).len()).unwrap_or(u16::MAX);
        HEADER_HEIGHT
            .saturating_add(body_lines)
            .saturating_add(MARGIN_BOTTOM)
    }

    fn header(&self, featured: bool) -> Line<'a> {
        let name_style = Style::default()
            .fg(if featured { ACCENT } else { NAME_COLOR })
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(
            self.appearance.display_name(self.message),
            name_style,
        )];
        if featured {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("[{}]", self.appearance.featured_badge),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        }
        let time = self.message.timestamp.with_timezone(&Local).format("%H:%M");
        spans.push(Span::styled(
            format!(" {time}"),
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    }
}

/// Wrap `text` for a message at `width`. Always yields at least one line.
fn wrap_body(text: &str, width: u16) -> Vec<String> {
    let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize;
    let options = textwrap::Options::new(content_width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);

    let mut lines: Vec<String> = text
        .lines()
        .flat_map(|line| {
            let wrapped = textwrap::wrap(line, &options);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped.into_iter().map(|l| l.into_owned()).collect()
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl Widget for MessageView<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let featured = self.appearance.is_featured(self.message);

        let block = if featured {
            Block::new()
                .borders(Borders::LEFT)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(ACCENT))
                .padding(Padding::left(1))
        } else {
            Block::new().padding(Padding::left(HORIZONTAL_OVERHEAD))
        };

        let card = Rect {
            height: area.height.saturating_sub(MARGIN_BOTTOM),
            ..area
        };
        let inner = block.inner(card);
        block.render(card, buf);

        let mut lines = vec![self.header(featured)];
        lines.extend(wrap_body(&self.message.text, area.width).into_iter().map(Line::from));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn featuring(author: &str) -> Appearance {
        Appearance {
            featured_author: Some(author.to_string()),
            ..Default::default()
        }
    }

    fn render(msg: &Message, appearance: &Appearance, width: u16) -> Buffer {
        let height = MessageView::calculate_height(msg, width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(MessageView::new(msg, appearance), f.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    // ==========================================================================
    // calculate_height
    // ==========================================================================

    #[test]
    fn single_line_message_height() {
        let msg = message("1", Some("bob"), "hello");
        assert_eq!(
            MessageView::calculate_height(&msg, 40),
            HEADER_HEIGHT + 1 + MARGIN_BOTTOM
        );
    }

    #[test]
    fn body_wraps_at_width() {
        // width 9 → content width 7: "hello" | "world"
        let msg = message("1", None, "hello world");
        assert_eq!(MessageView::calculate_height(&msg, 9), HEADER_HEIGHT + 2 + MARGIN_BOTTOM);
    }

    #[test]
    fn explicit_newlines_are_kept() {
        let msg = message("1", None, "one\n\nthree");
        assert_eq!(MessageView::calculate_height(&msg, 40), HEADER_HEIGHT + 3 + MARGIN_BOTTOM);
    }

    #[test]
    fn empty_body_still_takes_a_row() {
        let msg = message("1", None, "");
        assert_eq!(MessageView::calculate_height(&msg, 40), HEADER_HEIGHT + 1 + MARGIN_BOTTOM);
    }

    #[test]
    fn huge_message_height_saturates() {
        let body = vec!["x"; 65535].join("\n");
        let msg = message("1", Some("bob"), &body);
        assert_eq!(MessageView::calculate_height(&msg, 40), u16::MAX);

        let body = vec!["x"; 65539].join("\n");
        let msg = message("2", Some("bob"), &body);
        assert_eq!(MessageView::calculate_height(&msg, 40), u16::MAX);
    }

    #[test]
    fn degenerate_width_does_not_panic() {
        let msg = message("1", None, "abc");
        assert!(MessageView::calculate_height(&msg, 0) >= HEADER_HEIGHT + 1 + MARGIN_BOTTOM);
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    #[test]
    fn featured_author_gets_badge_and_accent() {
        let msg = message("1", Some("taiga3537"), "welcome");
        let buf = render(&msg, &featuring("taiga3537"), 40);

        let header = row_text(&buf, 0);
        assert!(header.contains("taiga3537"));
        assert!(header.contains("[OFFICIAL]"));
        assert!(row_text(&buf, 1).contains("welcome"));

        // Thick left border in the accent color
        assert_eq!(buf[(0, 0)].symbol(), "┃");
        assert_eq!(buf[(0, 0)].fg, ACCENT);
        // Name in the accent color
        assert_eq!(buf[(2, 0)].fg, ACCENT);
    }

    #[test]
    fn other_authors_render_plain() {
        let msg = message("1", Some("someone"), "hi");
        let buf = render(&msg, &featuring("taiga3537"), 40);

        let header = row_text(&buf, 0);
        assert!(header.contains("someone"));
        assert!(!header.contains("[OFFICIAL]"));
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(2, 0)].fg, NAME_COLOR);
    }

    #[test]
    fn missing_author_renders_anonymous_label() {
        let msg = message("1", None, "who am i");
        let buf = render(&msg, &Appearance::default(), 40);
        assert!(row_text(&buf, 0).contains("anonymous"));
    }

    #[test]
    fn custom_badge_label_is_used() {
        let appearance = Appearance {
            featured_author: Some("mod".to_string()),
            featured_badge: "STAFF".to_string(),
            ..Default::default()
        };
        let buf = render(&message("1", Some("mod"), "x"), &appearance, 40);
        assert!(row_text(&buf, 0).contains("[STAFF]"));
    }

    #[test]
    fn bottom_margin_row_is_blank() {
        let msg = message("1", Some("taiga3537"), "hi");
        let buf = render(&msg, &featuring("taiga3537"), 20);
        let last = buf.area.height - 1;
        assert_eq!(row_text(&buf, last).trim(), "");
    }
}

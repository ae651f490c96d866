use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

/// Split the frame into title, history and compose areas.
pub fn layout_areas(frame_area: Rect, input_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame_area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, history_area, input_area] = layout_areas(frame.area(), input_height);

    MessageList::new(&mut tui.message_list, app.messages.as_slice(), &app.appearance)
        .render(frame, history_area);

    let identity = app
        .client_id
        .clone()
        .unwrap_or_else(|| app.appearance.anonymous_label.clone());
    TitleBar::new(
        identity,
        app.messages.len(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{message, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn draws_empty_panel() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let app = test_app();
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Chat (as: anonymous)"));
        assert!(text.contains("No messages yet"));
        assert!(text.contains("Type a message..."));
    }

    #[test]
    fn draws_messages_and_count() {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let mut app = test_app();
        app.client_id = Some("alice".to_string());
        update(&mut app, Action::MessageReceived(message("1", Some("bob"), "hey alice")));
        update(&mut app, Action::MessageReceived(message("2", None, "who's there")));
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Chat (as: alice) · 2 messages"));
        assert!(text.contains("hey alice"));
        assert!(text.contains("who's there"));
        assert!(text.contains("anonymous"));
    }

    #[test]
    fn input_area_grows_with_draft() {
        let frame = Rect::new(0, 0, 60, 20);
        let [_, history_small, input_small] = layout_areas(frame, 3);
        let [_, history_big, input_big] = layout_areas(frame, 6);
        assert_eq!(input_small.height, 3);
        assert_eq!(input_big.height, 6);
        assert!(history_big.height < history_small.height);
    }
}

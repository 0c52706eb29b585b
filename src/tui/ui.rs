use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::{App, Overlay, Session};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    DocumentPickerView, Header, MessageList, UploadModal, Welcome,
};

/// Draw one frame: header, main area (welcome or chat), input bar while a
/// document is active, then whichever overlay is open on top.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let overlay_open = !matches!(app.overlay, Overlay::None);

    let input_height = match &app.session {
        Session::Active(_) => tui.input_bar.calculate_height(area.width),
        Session::NoDocument => 0,
    };
    let [header_area, main_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area);

    Header {
        document_name: app.session.document().map(|d| d.original_filename.as_str()),
        document_count: app.documents.len(),
        status_message: &app.status_message,
        shortcuts_enabled: !overlay_open,
    }
    .render(frame, header_area);

    match &app.session {
        Session::NoDocument => {
            Welcome {
                has_documents: !app.documents.is_empty(),
            }
            .render(frame, main_area);
        }
        Session::Active(active) => {
            MessageList::new(
                &mut tui.message_list,
                &active.messages,
                active.is_pending(),
                spinner_frame,
            )
            .render(frame, main_area);

            tui.input_bar.disabled = active.is_pending();
            tui.input_bar.focused = !overlay_open;
            tui.input_bar.spinner_frame = spinner_frame;
            tui.input_bar.render(frame, input_area);
        }
    }

    match &app.overlay {
        Overlay::None => {}
        Overlay::Upload(dialog) => UploadModal {
            state: &tui.upload_modal,
            dialog,
            spinner_frame,
        }
        .render(frame, area),
        Overlay::Picker(picker) => DocumentPickerView {
            state: &mut tui.picker,
            picker,
            active: app.session.document().map(|d| &d.id),
            spinner_frame,
        }
        .render(frame, area),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Document;
    use crate::core::action::{Action, update};
    use crate::core::upload::MSG_UPLOADING;
    use crate::test_support::{active_app, buffer_lines, test_app};
    use crate::tui::components::input_bar::PLACEHOLDER;
    use crate::tui::components::welcome::{PROMPT_WITH_DOCUMENTS, PROMPT_WITHOUT_DOCUMENTS};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    #[test]
    fn welcome_without_documents_has_no_input_bar() {
        let app = test_app();
        let screen = draw(&app, &mut TuiState::new());
        assert!(screen.contains(PROMPT_WITHOUT_DOCUMENTS));
        assert!(!screen.contains(PLACEHOLDER));
    }

    #[test]
    fn welcome_prompt_changes_with_documents() {
        let mut app = test_app();
        app.documents = vec![Document::new("1", "a.pdf")];
        let screen = draw(&app, &mut TuiState::new());
        assert!(screen.contains(PROMPT_WITH_DOCUMENTS));
        assert!(screen.contains("1 document"));
    }

    #[test]
    fn active_document_shows_chat_and_input() {
        let mut app = active_app("7", "report.pdf");
        update(&mut app, Action::Submit("What is the total?".to_string()));
        let mut tui = TuiState::new();
        let screen = draw(&app, &mut tui);

        assert!(screen.contains("report.pdf"));
        assert!(screen.contains("What is the total?"));
        assert!(screen.contains("Thinking..."));
        assert!(screen.contains("Waiting for answer..."));
        assert!(tui.input_bar.disabled);
    }

    #[test]
    fn upload_overlay_drawn_on_top() {
        let mut app = test_app();
        update(&mut app, Action::OpenUpload);
        if let Overlay::Upload(dialog) = &mut app.overlay {
            dialog.status = crate::core::upload::UploadStatus::Uploading;
        }
        let screen = draw(&app, &mut TuiState::new());
        assert!(screen.contains("Upload PDF Document"));
        assert!(screen.contains(MSG_UPLOADING));
    }

    #[test]
    fn picker_overlay_drawn_on_top() {
        let mut app = test_app();
        update(&mut app, Action::OpenPicker);
        let screen = draw(&app, &mut TuiState::new());
        assert!(screen.contains("Select a Document"));
        assert!(screen.contains("Loading documents..."));
    }
}

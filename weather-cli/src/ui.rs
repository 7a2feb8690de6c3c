use chrono::{DateTime, Local};
use miniweather_core::{Phase, Session, WeatherResult};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Stylize,
    text::Line,
    widgets::{Block, BorderType, Paragraph},
};

const INPUT_WIDTH: u16 = 40;
const RESULT_HEIGHT: u16 = 9;

/// Draws `session`. Reads state only.
pub fn render(frame: &mut Frame, session: &Session) {
    match session.phase {
        Phase::AcquiringCredential => render_credential_phase(frame, session),
        Phase::Querying => render_query_phase(frame, session),
    }
}

fn render_credential_phase(frame: &mut Frame, session: &Session) {
    let area = centered(frame.area(), INPUT_WIDTH + 2, 6);
    let [title, _, input] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(3),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new("ENTER API KEY").bold().centered(), title);
    render_input(frame, input, &session.credential_input, Block::bordered());
}

fn render_query_phase(frame: &mut Frame, session: &Session) {
    let area = centered(frame.area(), INPUT_WIDTH + 4, RESULT_HEIGHT + 5);
    let [result_area, _, input, hint] = Layout::vertical([
        Constraint::Length(RESULT_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    if let Some(result) = &session.last_result {
        render_result(frame, result_area, result, session.last_updated);
    }

    let block = Block::bordered().title(session.status_message.as_str());
    render_input(frame, input, &session.query_input, block);

    let help = Paragraph::new("Enter search · Esc quit").dim().centered();
    frame.render_widget(help, hint);
}

fn render_result(
    frame: &mut Frame,
    area: Rect,
    result: &WeatherResult,
    updated: Option<DateTime<Local>>,
) {
    let mut lines = vec![
        Line::default(),
        Line::from(result.temperature.as_str()).bold(),
        Line::default(),
        Line::from(result.description.as_str()),
        Line::from(result.location()),
    ];
    if let Some(at) = updated {
        lines.push(Line::from(format!("updated {}", at.format("%H:%M"))).dim());
    }

    let block = Block::bordered().border_type(BorderType::Thick);
    frame.render_widget(Paragraph::new(lines).centered().block(block), area);
}

/// Input box with the cursor parked after the text.
fn render_input(frame: &mut Frame, area: Rect, text: &str, block: Block) {
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(text).block(block), area);

    let offset = u16::try_from(Line::from(text).width()).unwrap_or(u16::MAX);
    let x = inner.x + offset.min(inner.width.saturating_sub(1));
    frame.set_cursor_position((x, inner.y));
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniweather_core::controller::ERROR_STATUS;
    use ratatui::{Terminal, backend::TestBackend, layout::Position};

    fn draw(session: &Session) -> (String, Position) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, session)).unwrap();

        let screen = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        let cursor = terminal.get_cursor_position().unwrap();
        (screen, cursor)
    }

    fn querying() -> Session {
        Session {
            phase: Phase::Querying,
            ..Session::new()
        }
    }

    #[test]
    fn credential_phase_prompts_for_key() {
        let (screen, _) = draw(&Session::new());

        assert!(screen.contains("ENTER API KEY"));
        assert!(!screen.contains("CITY, CT"));
    }

    #[test]
    fn cursor_follows_typed_text() {
        let (_, empty) = draw(&Session::new());
        let typed = Session {
            credential_input: "abc".into(),
            ..Session::new()
        };
        let (screen, after) = draw(&typed);

        assert!(screen.contains("abc"));
        assert_eq!(after.x, empty.x + 3);
        assert_eq!(after.y, empty.y);
    }

    #[test]
    fn query_phase_shows_placeholder_and_status() {
        let (screen, _) = draw(&querying());

        assert!(screen.contains("??.°C"));
        assert!(screen.contains("Waiting for Input"));
        assert!(screen.contains("CITY, CT"));
        assert!(screen.contains("Enter city name and press ENTER"));
    }

    #[test]
    fn query_phase_shows_result_and_error_status() {
        let session = Session {
            last_result: Some(WeatherResult {
                city: "Paris".into(),
                country_code: "FR".into(),
                temperature: "18.5°C".into(),
                description: "Clear sky".into(),
            }),
            status_message: ERROR_STATUS.into(),
            query_input: "Lyo".into(),
            ..querying()
        };

        let (screen, _) = draw(&session);

        assert!(screen.contains("18.5°C"));
        assert!(screen.contains("Clear sky"));
        assert!(screen.contains("Paris, FR"));
        assert!(screen.contains("error"));
        assert!(screen.contains("Lyo"));
    }

    #[test]
    fn rendering_leaves_session_untouched() {
        let session = querying();
        let before = session.clone();

        draw(&session);

        assert_eq!(session, before);
    }
}

//! Maps terminal events onto the controller's [`InputEvent`]s.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use miniweather_core::InputEvent;
use tracing::{debug, warn};

pub trait ClipboardSource {
    /// Current clipboard text, or `None` if it cannot be read.
    fn text(&mut self) -> Option<String>;
}

/// System clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSource for SystemClipboard {
    fn text(&mut self) -> Option<String> {
        if self.inner.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(err) => {
                    warn!(error = %err, "clipboard unavailable");
                    return None;
                }
            }
        }

        let clipboard = self.inner.as_mut()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(err) => {
                debug!(error = %err, "clipboard has no text");
                None
            }
        }
    }
}

pub fn translate(event: &Event, clipboard: &mut dyn ClipboardSource) -> Option<InputEvent> {
    match event {
        Event::Key(key) => translate_key(key, clipboard),
        Event::Paste(text) => Some(InputEvent::Paste(text.clone())),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent, clipboard: &mut dyn ClipboardSource) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    // AltGr arrives as CONTROL | ALT on Windows and produces ordinary characters.
    let alt_gr = ctrl && alt;

    match key.code {
        KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char('c') if ctrl && !alt_gr => Some(InputEvent::Quit),
        KeyCode::Char('v' | 'V') if ctrl && !alt_gr => clipboard.text().map(InputEvent::Paste),
        KeyCode::Char(_) if (ctrl || alt) && !alt_gr => Some(InputEvent::Ignored),
        KeyCode::Char(c) => Some(InputEvent::Char(c)),
        KeyCode::Enter => Some(InputEvent::Submit),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::CapsLock | KeyCode::Modifier(_) => {
            Some(InputEvent::Ignored)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, ModifierKeyCode};

    struct FixedClipboard(Option<&'static str>);

    impl ClipboardSource for FixedClipboard {
        fn text(&mut self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn translate_with(event: Event, clip: Option<&'static str>) -> Option<InputEvent> {
        translate(&event, &mut FixedClipboard(clip))
    }

    #[test]
    fn printable_characters() {
        assert_eq!(
            translate_with(key(KeyCode::Char('a'), KeyModifiers::NONE), None),
            Some(InputEvent::Char('a'))
        );
        assert_eq!(
            translate_with(key(KeyCode::Char('A'), KeyModifiers::SHIFT), None),
            Some(InputEvent::Char('A'))
        );
    }

    #[test]
    fn editing_keys() {
        assert_eq!(
            translate_with(key(KeyCode::Enter, KeyModifiers::NONE), None),
            Some(InputEvent::Submit)
        );
        assert_eq!(
            translate_with(key(KeyCode::Backspace, KeyModifiers::NONE), None),
            Some(InputEvent::Backspace)
        );
    }

    #[test]
    fn modifier_keys_are_ignored_not_typed() {
        for code in [
            KeyCode::Tab,
            KeyCode::BackTab,
            KeyCode::CapsLock,
            KeyCode::Modifier(ModifierKeyCode::LeftShift),
            KeyCode::Modifier(ModifierKeyCode::RightShift),
        ] {
            assert_eq!(
                translate_with(key(code, KeyModifiers::NONE), None),
                Some(InputEvent::Ignored)
            );
        }
    }

    #[test]
    fn ctrl_v_pastes_clipboard() {
        assert_eq!(
            translate_with(key(KeyCode::Char('v'), KeyModifiers::CONTROL), Some("abc")),
            Some(InputEvent::Paste("abc".into()))
        );
        assert_eq!(
            translate_with(key(KeyCode::Char('v'), KeyModifiers::CONTROL), None),
            None
        );
    }

    #[test]
    fn bracketed_paste() {
        assert_eq!(
            translate_with(Event::Paste("0123".into()), None),
            Some(InputEvent::Paste("0123".into()))
        );
    }

    #[test]
    fn quit_keys() {
        assert_eq!(
            translate_with(key(KeyCode::Esc, KeyModifiers::NONE), None),
            Some(InputEvent::Quit)
        );
        assert_eq!(
            translate_with(key(KeyCode::Char('c'), KeyModifiers::CONTROL), None),
            Some(InputEvent::Quit)
        );
    }

    #[test]
    fn other_control_chords_are_not_typed() {
        assert_eq!(
            translate_with(key(KeyCode::Char('x'), KeyModifiers::CONTROL), None),
            Some(InputEvent::Ignored)
        );
        assert_eq!(
            translate_with(key(KeyCode::Char('x'), KeyModifiers::ALT), None),
            Some(InputEvent::Ignored)
        );
    }

    #[test]
    fn alt_gr_characters_are_typed() {
        let alt_gr = KeyModifiers::CONTROL | KeyModifiers::ALT;

        for c in ['@', '{', 'c', 'v'] {
            assert_eq!(
                translate_with(key(KeyCode::Char(c), alt_gr), Some("clip")),
                Some(InputEvent::Char(c))
            );
        }
    }

    #[test]
    fn key_release_is_dropped() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(translate_with(Event::Key(release), None), None);
    }

    #[test]
    fn unrelated_events_are_dropped() {
        assert_eq!(translate_with(Event::FocusGained, None), None);
        assert_eq!(translate_with(Event::Resize(80, 24), None), None);
        assert_eq!(
            translate_with(key(KeyCode::F(5), KeyModifiers::NONE), None),
            None
        );
    }
}

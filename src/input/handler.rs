use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Heading, TurnCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(TurnCommand),
    NewGame,
    /// Change the pending player count by the given step
    AdjustPlayers(i32),
    /// Change the pending map size by the given number of increments
    AdjustMapSize(i32),
    Quit,
    None,
}

/// Which key steers which player. Letter keys are stored lowercase and
/// matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybindings {
    bindings: HashMap<KeyCode, TurnCommand>,
}

impl Keybindings {
    pub fn new(bindings: impl IntoIterator<Item = (KeyCode, TurnCommand)>) -> Self {
        Self {
            bindings: bindings
                .into_iter()
                .map(|(code, command)| (normalize(code), command))
                .collect(),
        }
    }

    pub fn lookup(&self, code: KeyCode) -> Option<TurnCommand> {
        self.bindings.get(&normalize(code)).copied()
    }

    /// Keys bound to the player at `index`, for the help footer
    pub fn keys_for(&self, index: usize) -> Vec<(KeyCode, Heading)> {
        let mut keys: Vec<(KeyCode, Heading)> = self
            .bindings
            .iter()
            .filter(|(_, command)| command.player == index)
            .map(|(&code, command)| (code, command.heading))
            .collect();
        keys.sort_by_key(|&(_, heading)| heading_order(heading));
        keys
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        let layout = [
            [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right],
            [
                KeyCode::Char('w'),
                KeyCode::Char('s'),
                KeyCode::Char('a'),
                KeyCode::Char('d'),
            ],
            [
                KeyCode::Char('i'),
                KeyCode::Char('k'),
                KeyCode::Char('j'),
                KeyCode::Char('l'),
            ],
            [
                KeyCode::Char('t'),
                KeyCode::Char('g'),
                KeyCode::Char('f'),
                KeyCode::Char('h'),
            ],
        ];
        let headings = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

        Self::new(layout.iter().enumerate().flat_map(|(player, keys)| {
            keys.iter()
                .zip(headings)
                .map(move |(&code, heading)| (code, TurnCommand::new(player, heading)))
        }))
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn heading_order(heading: Heading) -> u8 {
    match heading {
        Heading::Up => 0,
        Heading::Down => 1,
        Heading::Left => 2,
        Heading::Right => 3,
        Heading::None => 4,
    }
}

pub struct InputHandler {
    keybindings: Keybindings,
}

impl InputHandler {
    pub fn new(keybindings: Keybindings) -> Self {
        Self { keybindings }
    }

    pub fn keybindings(&self) -> &Keybindings {
        &self.keybindings
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(command) = self.keybindings.lookup(key.code) {
            return KeyAction::Turn(command);
        }

        match normalize(key.code) {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('n') | KeyCode::Enter => KeyAction::NewGame,
            KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::AdjustPlayers(1),
            KeyCode::Char('-') => KeyAction::AdjustPlayers(-1),
            KeyCode::Char(']') => KeyAction::AdjustMapSize(1),
            KeyCode::Char('[') => KeyAction::AdjustMapSize(-1),
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Keybindings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn turn(player: usize, heading: Heading) -> KeyAction {
        KeyAction::Turn(TurnCommand::new(player, heading))
    }

    #[test]
    fn test_arrow_keys_steer_player_one() {
        let handler = InputHandler::default();

        assert_eq!(handler.handle_key_event(press(KeyCode::Up)), turn(0, Heading::Up));
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            turn(0, Heading::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            turn(0, Heading::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            turn(0, Heading::Right)
        );
    }

    #[test]
    fn test_letter_clusters() {
        let handler = InputHandler::default();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            turn(1, Heading::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            turn(1, Heading::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('k'))),
            turn(2, Heading::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('l'))),
            turn(2, Heading::Right)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('f'))),
            turn(3, Heading::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('t'))),
            turn(3, Heading::Up)
        );
    }

    #[test]
    fn test_uppercase_letters() {
        let handler = InputHandler::default();

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(d_upper), turn(1, Heading::Right));
    }

    #[test]
    fn test_custom_bindings_replace_defaults() {
        let bindings = Keybindings::new([(KeyCode::Char('Z'), TurnCommand::new(1, Heading::Up))]);
        let handler = InputHandler::new(bindings);

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('z'))),
            turn(1, Heading::Up)
        );
        assert_eq!(handler.handle_key_event(press(KeyCode::Up)), KeyAction::None);
    }

    #[test]
    fn test_keys_for_player() {
        let bindings = Keybindings::default();
        let keys = bindings.keys_for(1);
        assert_eq!(
            keys,
            vec![
                (KeyCode::Char('w'), Heading::Up),
                (KeyCode::Char('s'), Heading::Down),
                (KeyCode::Char('a'), Heading::Left),
                (KeyCode::Char('d'), Heading::Right),
            ]
        );
        assert!(bindings.keys_for(4).is_empty());
    }

    #[test]
    fn test_control_keys() {
        let handler = InputHandler::default();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Enter)), KeyAction::NewGame);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('N'))),
            KeyAction::NewGame
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('+'))),
            KeyAction::AdjustPlayers(1)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('['))),
            KeyAction::AdjustMapSize(-1)
        );
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::default();

        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(x), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::default();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}

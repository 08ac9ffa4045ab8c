use bit_field::BitField;

/// Directional button lines as they reach the core. Active low: a set bit
/// means released, so an idle port reads `0xFF`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ButtonPort(pub u8);

impl ButtonPort {
    pub const RELEASED: ButtonPort = ButtonPort(0xFF);

    pub fn pressed(buttons: &[ControllerButton]) -> Self {
        let mut port = Self::RELEASED;
        for &button in buttons {
            port.set_pressed(button, true);
        }
        port
    }

    #[inline]
    pub fn is_pressed(&self, button: ControllerButton) -> bool {
        !self.0.get_bit(button.line())
    }

    pub fn set_pressed(&mut self, button: ControllerButton, pressed: bool) {
        self.0.set_bit(button.line(), !pressed);
    }
}

impl Default for ButtonPort {
    fn default() -> Self {
        Self::RELEASED
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControllerButton {
    Up,
    Down,
    Left,
    Right,
}

impl ControllerButton {
    /// Order in which simultaneous presses are applied within one tick.
    pub const PRIORITY: [ControllerButton; 4] = [
        ControllerButton::Up,
        ControllerButton::Down,
        ControllerButton::Left,
        ControllerButton::Right,
    ];

    /// Bit of the port carrying this button.
    #[inline]
    pub const fn line(self) -> usize {
        match self {
            ControllerButton::Up => 3,
            ControllerButton::Down => 2,
            ControllerButton::Left => 1,
            ControllerButton::Right => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputCommand {
    Controller(ControllerButton),
    Reset,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    JustPressed,
    Held,
    JustReleased,
    Released,
}

impl KeyState {
    pub fn new(pressed: bool) -> Self {
        if pressed {
            KeyState::JustPressed
        } else {
            KeyState::JustReleased
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self, KeyState::JustPressed | KeyState::Held)
    }

    /// State after one pass of input processing.
    pub fn update(&self) -> Self {
        match self {
            KeyState::JustPressed => KeyState::Held,
            KeyState::JustReleased => KeyState::Released,
            other => *other,
        }
    }
}

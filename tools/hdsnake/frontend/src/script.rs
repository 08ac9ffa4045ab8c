//! Button scripts for headless runs.
//!
//! A script is a comma-separated list of steps `<keys>[*count]`. Keys are any
//! of `U`, `D`, `L`, `R` (held together when combined, e.g. `UL`) or `.` for
//! nothing. Each step holds for `count` game ticks, default 1. Past the end
//! of the script nothing is held.

use anyhow::{bail, Context, Result};
use hdsnake_core::inputs::{ButtonPort, ControllerButton};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputScript {
    steps: Vec<(ButtonPort, u64)>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::new();

        for raw in text.split(',') {
            let step = raw.trim();
            if step.is_empty() {
                continue;
            }

            let (keys, count) = match step.split_once('*') {
                Some((keys, count)) => {
                    let count: u64 = count.trim().parse()
                        .with_context(|| format!("bad repeat count in step '{}'", step))?;
                    (keys.trim(), count)
                }
                None => (step, 1),
            };

            if count == 0 {
                bail!("step '{}' repeats zero times", step);
            }

            steps.push((parse_keys(keys).with_context(|| format!("in step '{}'", step))?, count));
        }

        Ok(Self { steps })
    }

    /// Buttons held while the game advances from tick `tick` to `tick + 1`.
    pub fn buttons_for_tick(&self, tick: u64) -> ButtonPort {
        let mut start = 0;
        for (buttons, count) in &self.steps {
            if tick < start + count {
                return *buttons;
            }
            start += count;
        }
        ButtonPort::RELEASED
    }

    pub fn len_ticks(&self) -> u64 {
        self.steps.iter().map(|(_, count)| count).sum()
    }
}

fn parse_keys(keys: &str) -> Result<ButtonPort> {
    if keys.is_empty() {
        bail!("no keys given");
    }
    if keys == "." {
        return Ok(ButtonPort::RELEASED);
    }

    let mut port = ButtonPort::RELEASED;
    for key in keys.chars() {
        let button = match key.to_ascii_uppercase() {
            'U' => ControllerButton::Up,
            'D' => ControllerButton::Down,
            'L' => ControllerButton::Left,
            'R' => ControllerButton::Right,
            other => bail!("unknown key '{}'", other),
        };
        port.set_pressed(button, true);
    }
    Ok(port)
}

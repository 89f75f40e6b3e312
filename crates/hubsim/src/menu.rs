//! Menu input sources for the simulated hub
//!
//! - `ScriptedMenu` replays a fixed list of picks, then reports the menu closed
//! - `ConsoleMenu` reads picks line by line; an empty line takes the highlighted option

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use hubcore::{HubError, HubResult};

/// Where the simulated hub gets menu picks from
pub trait MenuSource {
    fn choose(&mut self, options: &[&str]) -> HubResult<String>;
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedMenu {
    picks: VecDeque<String>,
}

impl ScriptedMenu {
    pub fn new<I, S>(picks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedMenu {
            picks: picks.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma separated list such as `"1,2,C"`
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|pick| !pick.is_empty()),
        )
    }

    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl MenuSource for ScriptedMenu {
    fn choose(&mut self, options: &[&str]) -> HubResult<String> {
        let pick = self.picks.pop_front().ok_or(HubError::MenuClosed)?;
        match options.iter().find(|option| option.eq_ignore_ascii_case(&pick)) {
            Some(option) => Ok(option.to_string()),
            None => Err(HubError::InvalidArgument(format!("{pick} is not on the menu {options:?}"))),
        }
    }
}

pub struct ConsoleMenu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleMenu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsoleMenu { input, output }
    }
}

fn io_error(err: std::io::Error) -> HubError {
    HubError::Io(err.to_string())
}

impl<R: BufRead, W: Write> MenuSource for ConsoleMenu<R, W> {
    fn choose(&mut self, options: &[&str]) -> HubResult<String> {
        let Some(first) = options.first() else {
            return Err(HubError::InvalidArgument("menu has no options".to_string()));
        };
        loop {
            let rendered: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, option)| if i == 0 { format!("[{option}]") } else { option.to_string() })
                .collect();
            write!(self.output, "menu {} > ", rendered.join(" ")).map_err(io_error)?;
            self.output.flush().map_err(io_error)?;

            let mut line = String::new();
            if self.input.read_line(&mut line).map_err(io_error)? == 0 {
                return Err(HubError::MenuClosed);
            }
            let pick = line.trim();
            if pick.is_empty() {
                return Ok(first.to_string());
            }
            if let Some(option) = options.iter().find(|option| option.eq_ignore_ascii_case(pick)) {
                return Ok(option.to_string());
            }
            writeln!(self.output, "no option {pick}").map_err(io_error)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OPTIONS: [&str; 3] = ["2", "3", "C"];

    #[test]
    fn test_scripted_replays_then_closes() {
        let mut menu = ScriptedMenu::parse("2, c");
        assert_eq!(menu.choose(&OPTIONS).unwrap(), "2");
        assert_eq!(menu.choose(&OPTIONS).unwrap(), "C");
        assert_eq!(menu.choose(&OPTIONS), Err(HubError::MenuClosed));
    }

    #[test]
    fn test_scripted_rejects_unknown() {
        let mut menu = ScriptedMenu::new(["9"]);
        assert!(matches!(menu.choose(&OPTIONS), Err(HubError::InvalidArgument(_))));
        assert_eq!(menu.remaining(), 0);
    }

    #[test]
    fn test_console_empty_line_takes_first() {
        let mut out = Vec::new();
        let mut menu = ConsoleMenu::new(Cursor::new("\n"), &mut out);
        assert_eq!(menu.choose(&OPTIONS).unwrap(), "2");
        drop(menu);
        assert!(String::from_utf8(out).unwrap().contains("[2] 3 C"));
    }

    #[test]
    fn test_console_reprompts_on_unknown() {
        let mut out = Vec::new();
        let mut menu = ConsoleMenu::new(Cursor::new("x\nc\n"), &mut out);
        assert_eq!(menu.choose(&OPTIONS).unwrap(), "C");
        drop(menu);
        assert!(String::from_utf8(out).unwrap().contains("no option x"));
    }

    #[test]
    fn test_console_eof_closes() {
        let mut menu = ConsoleMenu::new(Cursor::new(""), Vec::new());
        assert_eq!(menu.choose(&OPTIONS), Err(HubError::MenuClosed));
    }
}

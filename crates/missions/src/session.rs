use hubcore::Color;

use crate::menu::Menu;

/// Mutable state of one menu session on the hub
#[derive(Debug, Clone)]
pub struct Session {
    pub menu: Menu,
    /// Light color shown between runs, from the boot battery reading
    pub battery_color: Color,
    /// Clock reading when the season's first run finished
    pub cumulative_start_ms: Option<u64>,
}

impl Session {
    pub fn new(menu: Menu, battery_color: Color) -> Self {
        Session {
            menu,
            battery_color,
            cumulative_start_ms: None,
        }
    }
}

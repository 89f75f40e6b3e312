//! Rotating selection menu
//!
//! The hub menu lists every slot once. After a run, the list is rotated so it
//! starts with the slot following that run in the base order, which leaves the
//! run just finished at the end. Picking `Clean` leaves the rotation alone.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::MenuError;

/// One entry of the hub menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Numbered run routine, labelled "1", "2", ...
    Run(u8),
    /// Motor park gesture, labelled "C"
    Clean,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Run(n) => write!(f, "{n}"),
            Slot::Clean => f.write_str("C"),
        }
    }
}

impl FromStr for Slot {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.eq_ignore_ascii_case("c") {
            return Ok(Slot::Clean);
        }
        match label.parse::<u8>() {
            Ok(0) => Err(MenuError::ZeroRun),
            Ok(n) => Ok(Slot::Run(n)),
            Err(_) => Err(MenuError::UnknownLabel(label.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    slots: Vec<Slot>,
    last: Slot,
}

impl Menu {
    pub fn new(slots: Vec<Slot>) -> Result<Self, MenuError> {
        if slots.is_empty() {
            return Err(MenuError::Empty);
        }
        let mut seen = BTreeSet::new();
        for slot in &slots {
            if *slot == Slot::Run(0) {
                return Err(MenuError::ZeroRun);
            }
            if !seen.insert(*slot) {
                return Err(MenuError::Duplicate(*slot));
            }
        }
        Ok(Menu {
            slots,
            last: Slot::Clean,
        })
    }

    /// Runs `1..=runs` followed by `Clean`
    pub fn numbered(runs: u8) -> Result<Self, MenuError> {
        let mut slots: Vec<Slot> = (1..=runs).map(Slot::Run).collect();
        slots.push(Slot::Clean);
        Self::new(slots)
    }

    /// Slots in base order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Most recently executed run, `Clean` before the first one
    pub fn last(&self) -> Slot {
        self.last
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    /// Slots in the order to present them, starting after the last run
    pub fn rotated(&self) -> Vec<Slot> {
        let start = self
            .slots
            .iter()
            .position(|slot| *slot == self.last)
            .map_or(0, |i| i + 1);
        let len = self.slots.len();
        (0..len).map(|i| self.slots[(start + i) % len]).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.rotated().iter().map(Slot::to_string).collect()
    }

    /// Parse a menu pick and check it is on this menu
    pub fn resolve(&self, label: &str) -> Result<Slot, MenuError> {
        let slot: Slot = label.parse()?;
        if self.contains(slot) {
            Ok(slot)
        } else {
            Err(MenuError::NotOnMenu(slot))
        }
    }

    /// Remember an executed slot; `Clean` and unknown slots are ignored
    pub fn record(&mut self, slot: Slot) {
        if slot != Slot::Clean && self.contains(slot) {
            self.last = slot;
        }
    }
}

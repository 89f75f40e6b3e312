//! Run tables for each competition season

use hubcore::Platform;

use crate::dispatcher::Season;

pub mod submerged;

/// Names accepted by `by_name`
pub const SEASONS: &[&str] = &[submerged::NAME];

pub fn by_name<P: Platform>(name: &str) -> Option<Season<P>> {
    match name.to_ascii_lowercase().as_str() {
        submerged::NAME => Some(submerged::season()),
        _ => None,
    }
}

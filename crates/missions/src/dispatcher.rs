//! Mission dispatcher
//!
//! Maps one menu pick onto its run routine through a static table, times it,
//! and keeps the cumulative time from the end of the season's first run to the end of its last one.
//! Routine failures are logged and reported; they never end the session.

use drive::{Robot, RobotResult};
use hubcore::Platform;
use log::{error, info, warn};

use crate::animation::{RUNNING, RUNNING_INTERVAL_MS};
use crate::error::MenuError;
use crate::menu::{Menu, Slot};
use crate::session::Session;

/// One scripted run on the game board
pub type Routine<P> = fn(&mut Robot<P>) -> RobotResult<()>;

/// Match length (ms)
pub const MATCH_TIME_MS: u64 = 150_000;

/// A competition season: its run table plus the slots that bracket a full match
pub struct Season<P: Platform> {
    pub name: &'static str,
    routines: Vec<(u8, Routine<P>)>,
    first: Slot,
    last: Slot,
    time_budget_ms: u64,
}

impl<P: Platform> Season<P> {
    /// Season timed from its lowest-numbered run to its highest
    pub fn new(name: &'static str, routines: Vec<(u8, Routine<P>)>) -> Self {
        let first = routines.iter().map(|(n, _)| *n).min().unwrap_or(1);
        let last = routines.iter().map(|(n, _)| *n).max().unwrap_or(1);
        Season {
            name,
            routines,
            first: Slot::Run(first),
            last: Slot::Run(last),
            time_budget_ms: MATCH_TIME_MS,
        }
    }

    pub fn with_time_budget(mut self, budget_ms: u64) -> Self {
        self.time_budget_ms = budget_ms;
        self
    }

    /// Slot that starts the cumulative clock
    pub fn first(&self) -> Slot {
        self.first
    }

    /// Slot that reports the cumulative time
    pub fn last(&self) -> Slot {
        self.last
    }

    pub fn time_budget_ms(&self) -> u64 {
        self.time_budget_ms
    }

    pub fn routine(&self, run: u8) -> Option<Routine<P>> {
        self.routines
            .iter()
            .find(|(n, _)| *n == run)
            .map(|(_, routine)| *routine)
    }

    /// Every run in table order followed by `Clean`
    pub fn menu(&self) -> Result<Menu, MenuError> {
        let mut slots: Vec<Slot> = self.routines.iter().map(|(n, _)| Slot::Run(*n)).collect();
        slots.push(Slot::Clean);
        Menu::new(slots)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed,
    /// The routine returned an error, kept as its message
    Failed(String),
    /// No routine is registered for the slot
    Missing,
    /// The park gesture ran
    Parked,
}

/// Time from the end of the first run to the end of the last run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CumulativeTime {
    Measured { total_ms: u64, budget_ms: u64 },
    /// The first run has not started in this session
    NotStarted,
}

impl CumulativeTime {
    pub fn over_budget(&self) -> bool {
        matches!(self, CumulativeTime::Measured { total_ms, budget_ms } if total_ms > budget_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub slot: Slot,
    pub outcome: RunOutcome,
    pub elapsed_ms: u64,
    /// Set only when the season's last run was dispatched
    pub cumulative: Option<CumulativeTime>,
}

fn seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Execute one menu pick
pub fn dispatch<P: Platform>(
    robot: &mut Robot<P>,
    session: &mut Session,
    season: &Season<P>,
    slot: Slot,
) -> DispatchReport {
    let started = robot.now_ms();
    let run = match slot {
        Slot::Clean => {
            let outcome = match robot.park_all_motors() {
                Ok(()) => RunOutcome::Parked,
                Err(err) => {
                    error!("park gesture failed: {err}");
                    RunOutcome::Failed(err.to_string())
                }
            };
            return DispatchReport {
                slot,
                outcome,
                elapsed_ms: robot.now_ms() - started,
                cumulative: None,
            };
        }
        Slot::Run(run) => run,
    };

    let Some(routine) = season.routine(run) else {
        warn!("no routine registered for #{run} in season {}", season.name);
        return DispatchReport {
            slot,
            outcome: RunOutcome::Missing,
            elapsed_ms: 0,
            cumulative: None,
        };
    };

    robot.show_busy(&RUNNING, RUNNING_INTERVAL_MS);
    info!("Running #{slot}...");
    let label = slot.to_string();
    let scale = robot.config().turn_correction(&label);
    robot.set_turn_scale(scale);

    let result = routine(robot);
    robot.set_turn_scale(1.0);
    let finished = robot.now_ms();
    let elapsed_ms = finished - started;
    info!("Done running #{slot}. Time: {:.1} seconds.", seconds(elapsed_ms));
    // the match clock starts once the robot is back from the first run
    if slot == season.first() {
        session.cumulative_start_ms = Some(finished);
    }

    let outcome = match result {
        Ok(()) => RunOutcome::Completed,
        Err(err) => {
            error!("run #{slot} stopped early: {err}");
            RunOutcome::Failed(err.to_string())
        }
    };

    let cumulative = (slot == season.last()).then(|| {
        cumulative_time(session.cumulative_start_ms, finished, season)
    });

    robot.set_status_light(session.battery_color);
    session.menu.record(slot);

    DispatchReport {
        slot,
        outcome,
        elapsed_ms,
        cumulative,
    }
}

fn cumulative_time<P: Platform>(start_ms: Option<u64>, now_ms: u64, season: &Season<P>) -> CumulativeTime {
    let Some(start_ms) = start_ms else {
        warn!(
            "Total time unavailable: #{} has not run this session",
            season.first()
        );
        return CumulativeTime::NotStarted;
    };
    let total_ms = now_ms.saturating_sub(start_ms);
    let budget_ms = season.time_budget_ms();
    info!("Total time: {:.1} seconds.", seconds(total_ms));
    if total_ms > budget_ms {
        warn!(
            "{:.1} seconds over the {:.0} second match",
            seconds(total_ms - budget_ms),
            seconds(budget_ms)
        );
    } else {
        info!(
            "{:.1} seconds to spare in the {:.0} second match",
            seconds(budget_ms - total_ms),
            seconds(budget_ms)
        );
    }
    CumulativeTime::Measured { total_ms, budget_ms }
}

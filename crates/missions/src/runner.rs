//! Session lifecycle: bring the robot up, then serve menu picks until the
//! menu closes.

use drive::{Robot, RobotConfig, RobotError};
use hubcore::{Hub, HubError, Platform};
use log::{info, warn};

use crate::dispatcher::{DispatchReport, Season, dispatch};
use crate::error::MissionResult;
use crate::session::Session;

/// Claim the hardware and read the battery once for the idle light color
pub fn boot<P: Platform>(
    platform: &mut P,
    config: RobotConfig,
    season: &Season<P>,
) -> MissionResult<(Robot<P>, Session)> {
    let menu = season.menu()?;
    let mut robot = Robot::new(platform, config)?;
    let battery = robot.sample_battery_percent();
    info!("season {}: {} slots on the menu", season.name, menu.slots().len());
    Ok((robot, Session::new(menu, battery.color)))
}

/// Present the rotated menu and dispatch each pick.
///
/// Returns the reports of every dispatched pick once the menu input closes.
/// Picks that are not on the menu are logged and skipped.
pub fn run_menu_loop<P: Platform>(
    robot: &mut Robot<P>,
    session: &mut Session,
    season: &Season<P>,
) -> MissionResult<Vec<DispatchReport>> {
    let mut reports = Vec::new();
    loop {
        let labels = session.menu.labels();
        let options: Vec<&str> = labels.iter().map(String::as_str).collect();
        let pick = match robot.hub_mut().menu(&options) {
            Ok(pick) => pick,
            Err(HubError::MenuClosed) => {
                info!("menu closed after {} pick(s)", reports.len());
                return Ok(reports);
            }
            Err(HubError::InvalidArgument(reason)) => {
                warn!("ignoring menu pick: {reason}");
                continue;
            }
            Err(err) => return Err(RobotError::from(err).into()),
        };
        match session.menu.resolve(&pick) {
            Ok(slot) => reports.push(dispatch(robot, session, season, slot)),
            Err(err) => warn!("ignoring menu pick {pick:?}: {err}"),
        }
    }
}

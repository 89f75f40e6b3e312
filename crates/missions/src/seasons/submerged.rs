//! SUBMERGED season runs
//!
//! Each run starts from a launch area and chains the missions listed under
//! it. Missions without a tuned path are empty.

use drive::{Implement, MoveOptions, Robot, RobotResult, TurnOptions};
use hubcore::Platform;

use crate::dispatcher::{Routine, Season};

pub const NAME: &str = "submerged";

pub fn season<P: Platform>() -> Season<P> {
    Season::new(
        NAME,
        vec![
            (1, run1::<P> as Routine<P>),
            (2, run2::<P> as Routine<P>),
            (3, run3::<P> as Routine<P>),
            (4, run4::<P> as Routine<P>),
            (5, run5::<P> as Routine<P>),
            (6, run6::<P> as Routine<P>),
            (7, run7::<P> as Routine<P>),
        ],
    )
}

// Missions

/// Start facing the boat, centred, about 7 cm away
pub fn boat<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    r.home_implement(Implement::Small)?;
    r.actuate_implement(Implement::Small, -15.0, MoveOptions::at(500.0))?;
    r.drive_straight(70.0, MoveOptions::default())?;
    r.actuate_implement(Implement::Small, -180.0, MoveOptions::at(500.0))
}

pub fn seaweed<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn whales<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

/// Start facing the pusher, centred
pub fn octopus<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    r.drive_for(3000, None)
}

pub fn boxes<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn coral_nursery<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn shark<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn coral_reef<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn research_ship<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn angler_fish<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

pub fn submarine<P: Platform>(_r: &mut Robot<P>) -> RobotResult<()> {
    Ok(())
}

// Runs

/// Home to home: boat, seaweed
pub fn run1<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    r.drive_straight(350.0, MoveOptions::default())?;
    r.turn_in_place(45.0, TurnOptions::default())?;
    boat(r)?;
    seaweed(r)
}

/// Home to home: whales, octopus
pub fn run2<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    whales(r)?;
    octopus(r)
}

/// Home to away: boxes
pub fn run3<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    boxes(r)
}

/// Away to away: shark, coral nursery
pub fn run4<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    shark(r)?;
    coral_nursery(r)
}

/// Away to away: coral reef
pub fn run5<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    coral_reef(r)
}

/// Away to home: research ship
pub fn run6<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    research_ship(r)
}

/// Home: angler fish, submarine
pub fn run7<P: Platform>(r: &mut Robot<P>) -> RobotResult<()> {
    angler_fish(r)?;
    submarine(r)
}

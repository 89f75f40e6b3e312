use std::io::{self, Cursor};

use drive::{Implement, MoveOptions, Robot, RobotConfig, RobotResult};
use hubcore::Color;
use hubsim::drivebase::profile_duration_ms;
use hubsim::{ConsoleMenu, HubEvent, ScriptedMenu, SimConfig, SimPlatform, SimProbe};
use missions::seasons::{self, submerged};
use missions::{
    CumulativeTime, Routine, RunOutcome, Season, Session, Slot, boot, dispatch, run_menu_loop,
};

fn quiet() -> SimConfig {
    SimConfig {
        gyro_noise: 0.0,
        ..Default::default()
    }
}

struct Rig {
    robot: Robot<SimPlatform>,
    session: Session,
    probe: SimProbe,
}

fn rig_with(platform: SimPlatform, config: RobotConfig, season: &Season<SimPlatform>) -> Rig {
    let mut platform = platform;
    let probe = platform.probe();
    let (robot, session) = boot(&mut platform, config, season).unwrap();
    Rig { robot, session, probe }
}

fn rig(season: &Season<SimPlatform>) -> Rig {
    rig_with(SimPlatform::new(quiet()), RobotConfig::default(), season)
}

fn broken(r: &mut Robot<SimPlatform>) -> RobotResult<()> {
    r.actuate_implement(Implement::Big, 90.0, MoveOptions::default())
}

#[test]
fn test_boot_reads_battery_once() {
    let season = submerged::season();
    let platform = SimPlatform::new(quiet());
    platform.probe().force_battery_mv(Some(7200));
    let rig = rig_with(platform, RobotConfig::default(), &season);
    assert_eq!(rig.session.battery_color, Color::Red);
    assert_eq!(rig.probe.light(), Some(Color::Red));
    assert_eq!(rig.session.menu.last(), Slot::Clean);
    assert_eq!(rig.session.cumulative_start_ms, None);
}

#[test]
fn test_run_one_is_timed_and_restores_light() {
    let season = submerged::season();
    let mut rig = rig(&season);
    let idle = rig.session.battery_color;

    let report = dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(1));
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.cumulative, None);

    // drive 350, turn 45, stall home, back off 15, drive 70, swing 180
    let expected = profile_duration_ms(350.0, 500.0, 500.0)
        + profile_duration_ms(45.0, 500.0, 500.0)
        + 340.0
        + 30.0
        + profile_duration_ms(70.0, 500.0, 500.0)
        + 360.0;
    assert!((report.elapsed_ms as f64 - expected).abs() <= 1.0);

    assert_eq!(rig.probe.light(), Some(idle));
    assert!(rig.probe.events().contains(&HubEvent::Animation {
        frames: 8,
        interval_ms: 30
    }));
    assert!(rig.probe.events().contains(&HubEvent::Light(Some(Color::Magenta))));
    assert_eq!(rig.session.menu.last(), Slot::Run(1));
    // the match clock starts when run 1 returns, not when it starts
    assert_eq!(rig.session.cumulative_start_ms, Some(rig.robot.now_ms()));
    assert_eq!(rig.session.cumulative_start_ms, Some(report.elapsed_ms));
}

#[test]
fn test_last_run_without_first_reports_fallback() {
    let season = submerged::season();
    let mut rig = rig(&season);
    let report = dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(7));
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.cumulative, Some(CumulativeTime::NotStarted));
}

#[test]
fn test_full_match_total() {
    let season = submerged::season();
    let mut rig = rig(&season);
    dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(1));
    let start = rig.robot.now_ms();
    let mut last = None;
    for run in 2..=7 {
        last = Some(dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(run)));
    }
    let total = rig.robot.now_ms() - start;
    assert!(total < rig.robot.now_ms());

    let report = last.unwrap();
    match report.cumulative {
        Some(CumulativeTime::Measured { total_ms, budget_ms }) => {
            assert_eq!(total_ms, total);
            assert_eq!(budget_ms, 150_000);
        }
        other => panic!("expected a measured total, got {other:?}"),
    }
    assert!(!report.cumulative.unwrap().over_budget());
}

#[test]
fn test_over_budget_flagged() {
    let season = submerged::season().with_time_budget(1000);
    let mut rig = rig(&season);
    let reports: Vec<_> = (1..=7)
        .map(|run| dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(run)))
        .collect();
    assert!(reports[6].cumulative.unwrap().over_budget());
    assert!(reports[..6].iter().all(|r| r.cumulative.is_none()));
}

#[test]
fn test_missing_routine_does_nothing() {
    let season = Season::new("partial", vec![(1, submerged::run1::<SimPlatform> as Routine<SimPlatform>)]);
    let mut rig = rig(&season);
    let events = rig.probe.events().len();

    let report = dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(2));
    assert_eq!(report.outcome, RunOutcome::Missing);
    assert_eq!(rig.probe.events().len(), events);
    assert_eq!(rig.probe.time_ms(), 0.0);
    assert_eq!(rig.session.menu.last(), Slot::Clean);
}

#[test]
fn test_failing_routine_is_reported() {
    let season = Season::new("broken", vec![(1, broken as Routine<SimPlatform>)]);
    let mut config = RobotConfig::default();
    config.implements.clear();
    let mut rig = rig_with(SimPlatform::new(quiet()), config, &season);
    let idle = rig.session.battery_color;

    let report = dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(1));
    assert!(matches!(report.outcome, RunOutcome::Failed(ref msg) if msg.contains("Big")));
    assert_eq!(rig.probe.light(), Some(idle));
    assert_eq!(rig.session.menu.last(), Slot::Run(1));
}

#[test]
fn test_clean_parks_without_rotating() {
    let season = submerged::season();
    let mut rig = rig(&season);
    dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(3));

    let report = dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Clean);
    assert_eq!(report.outcome, RunOutcome::Parked);
    assert!(report.elapsed_ms > 0);
    assert_eq!(rig.session.menu.last(), Slot::Run(3));
}

#[test]
fn test_turn_correction_scoped_to_run() {
    let season = submerged::season();
    let config = RobotConfig::default().with_turn_correction("1", 1.1);
    let mut rig = rig_with(SimPlatform::new(quiet()), config, &season);

    dispatch(&mut rig.robot, &mut rig.session, &season, Slot::Run(1));
    assert!((rig.probe.pose().heading - 49.5).abs() < 1e-9);
    assert_eq!(rig.robot.turn_scale(), 1.0);
}

#[test]
fn test_menu_loop_skips_bad_picks() {
    let season = submerged::season();
    let platform = SimPlatform::new(quiet()).with_menu(ScriptedMenu::parse("1, C, x, 9, 2"));
    let mut rig = rig_with(platform, RobotConfig::default(), &season);

    let reports = run_menu_loop(&mut rig.robot, &mut rig.session, &season).unwrap();
    let slots: Vec<Slot> = reports.iter().map(|r| r.slot).collect();
    assert_eq!(slots, vec![Slot::Run(1), Slot::Clean, Slot::Run(2)]);
    assert_eq!(rig.session.menu.last(), Slot::Run(2));
}

#[test]
fn test_console_enter_walks_the_rotation() {
    let season = submerged::season();
    let input = Cursor::new(b"\n\n\n".as_slice());
    let platform = SimPlatform::new(quiet()).with_menu(ConsoleMenu::new(input, io::sink()));
    let mut rig = rig_with(platform, RobotConfig::default(), &season);

    let reports = run_menu_loop(&mut rig.robot, &mut rig.session, &season).unwrap();
    let slots: Vec<Slot> = reports.iter().map(|r| r.slot).collect();
    assert_eq!(slots, vec![Slot::Run(1), Slot::Run(2), Slot::Run(3)]);
}

#[test]
fn test_season_lookup() {
    assert!(seasons::by_name::<SimPlatform>("Submerged").is_some());
    assert!(seasons::by_name::<SimPlatform>("cargo connect").is_none());
}

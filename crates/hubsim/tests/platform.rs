use hubcore::{Clock, Direction, Hub, HubError, Motor, Platform, Port, Stop};
use hubsim::{HubEvent, ScriptedMenu, SimConfig, SimPlatform};

#[test]
fn test_ports_are_exclusive() {
    let mut platform = SimPlatform::new(SimConfig::default());
    platform.motor(Port::A, Direction::Clockwise).unwrap();
    let err = platform.motor(Port::A, Direction::Counterclockwise).unwrap_err();
    assert_eq!(err, HubError::PortInUse(Port::A));
    assert_eq!(platform.probe().claimed_ports(), vec![Port::A]);
}

#[test]
fn test_hub_claimed_once() {
    let mut platform = SimPlatform::new(SimConfig::default());
    assert!(platform.hub().is_ok());
    assert!(matches!(platform.hub(), Err(HubError::DeviceClaimed(_))));
    assert!(platform.probe().hub_claimed());
}

#[test]
fn test_clock_shared_with_motors() {
    let mut platform = SimPlatform::new(SimConfig::default());
    let clock = platform.clock();
    let mut motor = platform.motor(Port::C, Direction::Clockwise).unwrap();

    motor.run_angle(500.0, 360.0, Stop::Hold, false).unwrap();
    assert!(!motor.done());
    // 360 deg at 500 deg/s
    clock.wait(720);
    assert!(motor.done());
    assert_eq!(clock.now_ms(), 720);
    assert!((motor.angle() - 360.0).abs() < 1e-9);
}

#[test]
fn test_unbounded_motor_never_stalls() {
    let mut platform = SimPlatform::new(SimConfig::default());
    let mut motor = platform.motor(Port::C, Direction::Clockwise).unwrap();
    assert_eq!(
        motor.run_until_stalled(300.0, Stop::Coast, 40),
        Err(HubError::NoStall(Port::C))
    );
}

#[test]
fn test_hub_records_what_it_shows() {
    let mut platform = SimPlatform::new(SimConfig::default()).with_menu(ScriptedMenu::parse("2"));
    let probe = platform.probe();
    let mut hub = platform.hub().unwrap();

    hub.display_number(7);
    assert_eq!(hub.menu(&["1", "2", "C"]).unwrap(), "2");
    assert_eq!(hub.menu(&["1", "2", "C"]), Err(HubError::MenuClosed));
    assert_eq!(probe.events(), vec![HubEvent::Number(7)]);
}

#[test]
fn test_forced_battery_reaches_hub() {
    let mut platform = SimPlatform::new(SimConfig::default());
    let probe = platform.probe();
    let hub = platform.hub().unwrap();
    probe.force_battery_mv(Some(7321));
    assert_eq!(hub.battery_voltage(), 7321);
    probe.force_battery_mv(None);
    assert!(hub.battery_voltage() > 7000);
}

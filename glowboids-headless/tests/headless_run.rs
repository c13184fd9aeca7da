use glowboids_core::Vector2D;
use glowboids_headless::{load_settings, run, FrameRecord, RunConfig, Seed};
use glowboids_shared::FlockSettings;

fn frames_from(output: &[u8]) -> Vec<FrameRecord> {
    String::from_utf8(output.to_vec())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn emits_requested_frames() {
    let config = RunConfig {
        frames: 30,
        emit_every: Some(10),
        ..RunConfig::default()
    };
    let mut output = Vec::new();

    let summary = run(&config, &mut output).unwrap();

    let frames = frames_from(&output);
    assert_eq!(
        frames.iter().map(|f| f.frame).collect::<Vec<_>>(),
        vec![10, 20, 30]
    );
    for frame in &frames {
        assert_eq!(frame.positions.len(), 160);
        assert!(frame
            .positions
            .iter()
            .all(|[x, y]| (-1.0..=1.0).contains(x) && (-1.0..=1.0).contains(y)));
    }
    assert_eq!(summary.frames, 30);
    assert_eq!(summary.agents, 160);
}

#[test]
fn no_frames_written_by_default() {
    let config = RunConfig {
        frames: 5,
        ..RunConfig::default()
    };
    let mut output = Vec::new();
    run(&config, &mut output).unwrap();
    assert!(output.is_empty());
}

#[test]
fn summary_respects_limits() {
    let settings = FlockSettings::default();
    let config = RunConfig {
        frames: 240,
        dt: 0.05,
        attractor: Some(Vector2D::new(-500.0, 900.0)),
        ..RunConfig::default()
    };

    let summary = run(&config, &mut std::io::sink()).unwrap();

    assert!(summary.max_speed <= settings.max_speed * (1.0 + 1e-5));
    assert!(summary.max_acceleration <= settings.max_force * (1.0 + 1e-5));
    assert!(summary.mean_speed > 0.0);
}

#[test]
fn fixed_seed_runs_match() {
    let config = RunConfig {
        frames: 60,
        agents: 40,
        seed: Seed::Fixed(0xC0FFEE),
        emit_every: Some(20),
        ..RunConfig::default()
    };
    let mut first = Vec::new();
    let mut second = Vec::new();

    let a = run(&config, &mut first).unwrap();
    let b = run(&config, &mut second).unwrap();

    assert_eq!(first, second);
    assert_eq!(a, b);
    assert_eq!(a.seed, 0xC0FFEE);
}

#[test]
fn custom_settings_change_the_run() {
    let slow = FlockSettings {
        max_speed: 50.0,
        cruise_speed: 20.0,
        ..FlockSettings::default()
    };
    let config = RunConfig {
        frames: 120,
        settings: slow,
        ..RunConfig::default()
    };

    let summary = run(&config, &mut std::io::sink()).unwrap();
    assert!(summary.max_speed <= 50.0 * (1.0 + 1e-5));
}

#[test]
fn invalid_configs_are_rejected() {
    let cases = [
        RunConfig {
            width: 0,
            ..RunConfig::default()
        },
        RunConfig {
            dt: 0.0,
            ..RunConfig::default()
        },
        RunConfig {
            agents: 161,
            ..RunConfig::default()
        },
        RunConfig {
            emit_every: Some(0),
            ..RunConfig::default()
        },
        RunConfig {
            settings: FlockSettings {
                max_force: -1.0,
                ..FlockSettings::default()
            },
            ..RunConfig::default()
        },
    ];

    for config in cases.iter() {
        assert!(run(config, &mut std::io::sink()).is_err(), "{config:?}");
    }
}

#[test]
fn settings_file_round_trip() {
    let path = std::env::temp_dir().join(format!(
        "glowboids-settings-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{ "neighbor_radius": 40.0, "edge_force": 100.0 }"#).unwrap();

    let settings = load_settings(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(settings.neighbor_radius, 40.0);
    assert_eq!(settings.edge_force, 100.0);
    assert_eq!(settings.max_speed, 600.0);
}

#[test]
fn missing_settings_file_is_an_error() {
    let path = std::env::temp_dir().join("glowboids-definitely-missing.json");
    let err = load_settings(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read settings file"));
}

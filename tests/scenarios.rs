use glam::Vec2;

use spidertoy::hunter::ChasePhase;
use spidertoy::{
    HunterPose, HunterState, PointerOutcome, PreyId, SimConfig, SimEvent, Simulation, Span,
    StateTag, Viewport,
};

const DT: f32 = 1.0 / 60.0;

/// Defaults with the spawn schedule pushed out of the way.
fn no_spawns() -> SimConfig {
    SimConfig {
        first_spawn_delay: Span::new(1000.0, 1000.0),
        ..SimConfig::default()
    }
}

fn sim_at(config: SimConfig, hunter: Vec2, seed: u64) -> Simulation {
    Simulation::new(
        config,
        Viewport::new(800.0, 600.0),
        HunterPose {
            pos: hunter,
            angle: 0.0,
        },
        fastrand::Rng::with_seed(seed),
    )
    .unwrap()
}

/// Tick until `pred` matches an event, collecting everything seen on the way.
fn run_until(
    sim: &mut Simulation,
    max_secs: f32,
    pred: impl Fn(&SimEvent) -> bool,
) -> Option<Vec<SimEvent>> {
    let mut seen = Vec::new();
    let ticks = (max_secs / DT) as u32;
    for _ in 0..ticks {
        sim.tick(DT);
        let events = sim.drain_events();
        let hit = events.iter().any(&pred);
        seen.extend(events);
        if hit {
            return Some(seen);
        }
    }
    None
}

#[test]
fn hunter_runs_down_a_roach() {
    let mut sim = sim_at(no_spawns(), Vec2::new(100.0, 100.0), 1);
    let id = sim.spawn_prey_at(Vec2::new(-20.0, 300.0), Vec2::new(400.0, 300.0));

    sim.tick(DT);
    match sim.hunter_state() {
        HunterState::ChasePrey(chase) => assert_eq!(chase.target, id),
        other => panic!("expected a chase, got {other:?}"),
    }
    // Prey cut the idle walk short.
    assert!(!sim.hunter().wander.arrived);

    let mut caught = None;
    let mut charged = false;
    let mut last_gap: Option<f32> = None;
    for _ in 0..(30.0 / DT) as u32 {
        sim.tick(DT);
        caught = sim.drain_events().iter().find_map(|e| match e {
            SimEvent::PreyCaught { id, .. } => Some(*id),
            _ => None,
        });
        if caught.is_some() {
            break;
        }
        last_gap = match sim.hunter_state() {
            HunterState::ChasePrey(chase) if chase.phase == ChasePhase::Charge => {
                let gap = sim.hunter().pos.distance(sim.population().position(id).unwrap());
                if let Some(prev) = last_gap {
                    assert!(gap <= prev + 1e-3, "gap grew from {prev} to {gap} while charging");
                }
                charged = true;
                Some(gap)
            }
            _ => None,
        };
    }
    assert!(charged, "never reached the charge");
    assert_eq!(caught, Some(id));
    assert_eq!(sim.hunter_state_tag(), StateTag::Wander);

    let pose = sim.prey_poses();
    assert!(pose.is_empty() || (pose.len() == 1 && pose[0].ensnared));
}

#[test]
fn web_only_pointer_catch() {
    let config = SimConfig {
        web_chance: 1.0,
        attack_chance: 0.0,
        cursor_sit_chance: 0.0,
        ..no_spawns()
    };
    let mut sim = sim_at(config, Vec2::new(300.0, 300.0), 2);
    sim.set_pointer(Vec2::new(302.0, 300.0));

    let events = run_until(&mut sim, 1.0, |e| matches!(e, SimEvent::PointerCaught { .. }))
        .expect("pointer was never caught");
    match events.as_slice() {
        [SimEvent::WebPlaced { pos, size, .. }, SimEvent::PointerCaught { outcome }] => {
            assert_eq!(*outcome, PointerOutcome::Web);
            assert!(pos.distance(Vec2::new(302.0, 300.0)) < 1e-3);
            assert!((48.0..=86.0).contains(size));
        }
        other => panic!("unexpected events {other:?}"),
    }
    assert_eq!(sim.hunter_state_tag(), StateTag::Wander);

    // The ignore window keeps the hunter off the pointer for a while.
    for _ in 0..60 {
        sim.tick(DT);
    }
    assert!(sim
        .drain_events()
        .iter()
        .all(|e| !matches!(e, SimEvent::PointerCaught { .. })));
}

#[test]
fn shrinking_the_viewport_pulls_everything_in() {
    let config = SimConfig {
        first_spawn_delay: Span::new(0.5, 0.5),
        prey_spawn_interval: Span::new(0.5, 0.5),
        ..SimConfig::default()
    };
    let mut sim = sim_at(config, Vec2::new(100.0, 100.0), 3);
    let id = sim.spawn_prey_at(Vec2::new(50.0, 50.0), Vec2::new(750.0, 550.0));

    sim.set_viewport(300.0, 200.0);
    let wp = sim.population().waypoint(id).unwrap();
    assert!(wp.x <= 280.0 && wp.y <= 180.0);

    let mut known: Vec<PreyId> = sim.prey_poses().iter().map(|p| p.id).collect();
    for _ in 0..300 {
        sim.tick(DT);
        for pose in sim.prey_poses() {
            if known.contains(&pose.id) {
                continue;
            }
            // Fresh spawns sit just off the new, smaller edges.
            assert!(pose.pos.x >= -21.0 && pose.pos.x <= 321.0, "{:?}", pose.pos);
            assert!(pose.pos.y >= -21.0 && pose.pos.y <= 221.0, "{:?}", pose.pos);
            let wp = sim.population().waypoint(pose.id).unwrap();
            assert!(wp.x <= 300.0 && wp.y <= 200.0);
            known.push(pose.id);
        }
    }
    assert!(known.len() > 1);
}

#[test]
fn prey_preempts_an_attack_without_its_follow_up() {
    let config = SimConfig {
        web_chance: 0.0,
        attack_chance: 1.0,
        attack_min_hits: 3,
        attack_max_hits: 3,
        prey_speed: 10.0,
        ..no_spawns()
    };
    let mut sim = sim_at(config, Vec2::new(300.0, 300.0), 4);
    sim.set_pointer(Vec2::new(302.0, 300.0));
    run_until(&mut sim, 1.0, |e| matches!(e, SimEvent::PointerCaught { .. }))
        .expect("pointer was never caught");
    assert_eq!(sim.hunter_state_tag(), StateTag::Attack);

    let id = sim.spawn_prey_at(Vec2::new(600.0, 500.0), Vec2::new(600.0, 500.0));
    sim.tick(DT);
    match sim.hunter_state() {
        HunterState::ChasePrey(chase) => assert_eq!(chase.target, id),
        other => panic!("expected a chase, got {other:?}"),
    }

    // Nothing from the dropped session may surface before the prey is dealt with.
    let events = run_until(&mut sim, 30.0, |e| matches!(e, SimEvent::PreyCaught { .. }))
        .expect("prey was never caught");
    assert!(events
        .iter()
        .all(|e| !matches!(e, SimEvent::AttackCompleted { .. })));
}

#[test]
fn attack_follow_up_fires_exactly_once() {
    let config = SimConfig {
        web_chance: 0.0,
        attack_chance: 1.0,
        attack_min_hits: 2,
        attack_max_hits: 2,
        ..no_spawns()
    };
    let mut sim = sim_at(config, Vec2::new(300.0, 300.0), 5);
    sim.set_pointer(Vec2::new(302.0, 300.0));

    let events = run_until(&mut sim, 30.0, |e| matches!(e, SimEvent::AttackCompleted { .. }))
        .expect("attack never completed");
    let completions: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::AttackCompleted { hits } => Some(*hits),
            _ => None,
        })
        .collect();
    assert_eq!(completions, vec![2]);
    assert_eq!(sim.hunter_state_tag(), StateTag::Wander);

    // Follow-up cooldown: no second attack can finish within a second.
    for _ in 0..60 {
        sim.tick(DT);
        assert!(sim
            .drain_events()
            .iter()
            .all(|e| !matches!(e, SimEvent::AttackCompleted { .. })));
    }
}

#[test]
fn spawn_batches_are_capped_and_ids_unique() {
    let config = SimConfig {
        first_spawn_delay: Span::new(0.1, 0.1),
        prey_spawn_interval: Span::new(0.5, 1.0),
        max_spawn_batch: 2,
        ..SimConfig::default()
    };
    let mut sim = sim_at(config, Vec2::new(400.0, 300.0), 6);

    let mut max_seen: Option<PreyId> = None;
    let mut seen = std::collections::HashSet::new();
    for _ in 0..(20.0 / DT) as u32 {
        let before = sim.prey_count();
        sim.tick(DT);
        let poses = sim.prey_poses();
        let fresh: Vec<PreyId> = poses
            .iter()
            .map(|p| p.id)
            .filter(|id| !seen.contains(id))
            .collect();
        assert!(fresh.len() <= 2, "batch of {}", fresh.len());
        assert!(sim.prey_count() <= before + 2);
        for id in fresh {
            assert!(max_seen.map_or(true, |m| id > m));
            max_seen = Some(id);
            seen.insert(id);
        }
        sim.drain_events();
    }
    assert!(seen.len() > 10);
}

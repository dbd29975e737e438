//! Arena Survivor headless driver
//!
//! Plays one round on autopilot and prints the summary as JSON.
//!
//! Usage: `arena-survivor [settings.json] [profile.json] [hero] [weapon]`
//! Pass `-` to skip a file argument.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::path::Path;

    use arena_survivor::sim::collision::nearest_enemies;
    use arena_survivor::sim::{HeroId, RoundState, TickOutcome, WeaponId};
    use arena_survivor::{GamePhase, ProfileSnapshot, Session, Settings};
    use glam::Vec2;

    /// Enemies considered when steering away
    const THREAT_COUNT: usize = 5;
    /// Enemies closer than this trigger a dash
    const PANIC_DISTANCE: f32 = 60.0;

    fn load_profile(path: &Path) -> Result<ProfileSnapshot, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn file_arg(arg: Option<&String>) -> Option<&Path> {
        arg.filter(|a| a.as_str() != "-").map(Path::new)
    }

    /// Steer away from the nearest enemies, drifting back toward the center
    fn steer(round: &RoundState) -> Vec2 {
        let center = round.arena * 0.5;
        let mut away = Vec2::ZERO;
        for i in nearest_enemies(&round.enemies, round.player_pos, THREAT_COUNT) {
            let offset = round.player_pos - round.enemies[i].pos;
            let dist = offset.length().max(1.0);
            away += offset / (dist * dist);
        }
        let home = (center - round.player_pos) / center.length().max(1.0);
        (away * 400.0 + home).normalize_or_zero()
    }

    fn in_danger(round: &RoundState) -> bool {
        nearest_enemies(&round.enemies, round.player_pos, 1)
            .first()
            .is_some_and(|&i| round.enemies[i].pos.distance(round.player_pos) < PANIC_DISTANCE)
    }

    pub fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
        let settings = match file_arg(args.get(1)) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let profile = match file_arg(args.get(2)) {
            Some(path) => load_profile(path)?,
            None => ProfileSnapshot::default(),
        };
        let hero: HeroId = match args.get(3) {
            Some(id) => id.parse()?,
            None => HeroId::default(),
        };
        let weapon: WeaponId = match args.get(4) {
            Some(id) => id.parse()?,
            None => WeaponId::default(),
        };

        let frame_dt = settings.frame_dt;
        let max_seconds = settings.max_round_seconds;
        let mut session = Session::new(settings);
        session.start_round(hero, weapon, profile)?;

        while session.phase() == GamePhase::Playing {
            let Some(round) = session.round() else {
                break;
            };
            if round.elapsed >= max_seconds {
                log::info!("Time cap of {}s reached", max_seconds);
                break;
            }

            if let Some(choice) = round.upgrade_choice.as_ref().and_then(|c| c.first().copied()) {
                session.select_upgrade(choice)?;
                continue;
            }

            let axis = steer(round);
            let charged = round.charge >= arena_survivor::consts::MAX_CHARGE;
            let dash = in_danger(round) && round.elapsed >= round.dash_ready_at;
            session.set_axis(axis);
            if charged {
                session.trigger_power()?;
            }
            if dash {
                session.trigger_dash()?;
            }

            if session.advance(frame_dt)? == TickOutcome::Fatal {
                break;
            }
            for event in session.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        match session.last_summary() {
            Some(summary) => println!("{}", serde_json::to_string_pretty(summary)?),
            None => {
                if let Some(round) = session.round() {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&arena_survivor::session::summarize(
                            round,
                            session.profile()
                        ))?
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Survivor (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = autopilot::run(&args) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}

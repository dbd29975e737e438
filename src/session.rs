//! Round lifecycle and command surface
//!
//! [`Session`] is the single owner of the live [`RoundState`]. The host
//! feeds it [`Command`]s (or calls the matching methods), advances it once
//! per rendered frame and drains [`GameEvent`]s back out.
//!
//! Phases: Home -> Playing -> GameOver -> Playing | Home.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::REWARD_CAP;
use crate::error::SessionError;
use crate::profile::{ProfileSnapshot, RoundSummary};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, HeroId, RoundState, TickInput, TickOutcome, UpgradeId, WeaponId, apply_upgrade,
    cast_hero_power, tick,
};

/// Where the session is in the round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Idle, hero and weapon selection
    #[default]
    Home,
    /// Simulation active
    Playing,
    /// Summary shown over the final round state
    GameOver,
}

/// Inbound command from the UI/input host
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartRound {
        hero: HeroId,
        weapon: WeaponId,
        profile: ProfileSnapshot,
    },
    SetAxis(Vec2),
    SetPointer(Option<Vec2>),
    Dash,
    HeroPower,
    SelectUpgrade(UpgradeId),
    TogglePause,
    /// Advance one frame by `dt` seconds
    Advance(f32),
    Restart,
    ReturnHome,
}

/// Currency granted for a final score, capped and non-decreasing
pub fn compute_reward(score: u64) -> u32 {
    let score = score as f64;
    let raw = (score.sqrt() * 1.6 + score / 250.0).floor();
    raw.min(REWARD_CAP as f64) as u32
}

/// Build the summary for a finished round
pub fn summarize(round: &RoundState, profile: &ProfileSnapshot) -> RoundSummary {
    let score = round.display_score();
    RoundSummary {
        hero: round.hero,
        weapon: round.weapon,
        score,
        survival_seconds: round.elapsed.max(0.0).floor() as u32,
        kills: round.kills,
        spawned_enemies: round.spawned,
        best_combo: round.best_combo,
        level: round.level,
        reward: compute_reward(score),
        new_best: score > profile.best_score,
    }
}

/// Owner of the round lifecycle
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    phase: GamePhase,
    round: Option<RoundState>,
    paused: bool,
    profile: ProfileSnapshot,
    hero: HeroId,
    weapon: WeaponId,
    input: TickInput,
    events: Vec<GameEvent>,
    last_summary: Option<RoundSummary>,
    rounds_started: u64,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            phase: GamePhase::Home,
            round: None,
            paused: false,
            profile: ProfileSnapshot::default(),
            hero: HeroId::default(),
            weapon: WeaponId::default(),
            input: TickInput::default(),
            events: Vec::new(),
            last_summary: None,
            rounds_started: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Live round while playing, or the final state after game over
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Profile as last seen, with this session's results folded in
    pub fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dispatch a command to the matching method
    pub fn apply(&mut self, command: Command) -> Result<(), SessionError> {
        let result = match command {
            Command::StartRound {
                hero,
                weapon,
                profile,
            } => self.start_round(hero, weapon, profile),
            Command::SetAxis(axis) => {
                self.set_axis(axis);
                Ok(())
            }
            Command::SetPointer(pointer) => {
                self.set_pointer(pointer);
                Ok(())
            }
            Command::Dash => self.trigger_dash(),
            Command::HeroPower => self.trigger_power(),
            Command::SelectUpgrade(upgrade) => self.select_upgrade(upgrade),
            Command::TogglePause => self.toggle_pause().map(|_| ()),
            Command::Advance(dt) => self.advance(dt).map(|_| ()),
            Command::Restart => self.restart(),
            Command::ReturnHome => {
                self.return_home();
                Ok(())
            }
        };
        if let Err(err) = &result {
            log::warn!("Command rejected: {}", err);
        }
        result
    }

    /// Begin a fresh round, discarding any round in progress
    pub fn start_round(
        &mut self,
        hero: HeroId,
        weapon: WeaponId,
        profile: ProfileSnapshot,
    ) -> Result<(), SessionError> {
        if !profile.has_weapon(weapon) {
            return Err(SessionError::WeaponLocked(weapon));
        }

        let seed = self.next_seed();
        let round = RoundState::new(seed, hero, weapon, &profile.meta)
            .with_arena(self.settings.arena_width, self.settings.arena_height);
        log::info!(
            "Round started: hero={} weapon={} seed={} shield={}",
            hero,
            weapon,
            seed,
            round.build.max_shield
        );

        self.hero = hero;
        self.weapon = weapon;
        self.profile = profile;
        self.round = Some(round);
        self.phase = GamePhase::Playing;
        self.paused = false;
        self.input = TickInput::default();
        Ok(())
    }

    /// New round with the last hero, weapon and profile
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.phase == GamePhase::Home {
            return Err(SessionError::NotPlaying(self.phase));
        }
        self.start_round(self.hero, self.weapon, self.profile.clone())
    }

    /// Discard the round and go back to selection
    pub fn return_home(&mut self) {
        if self.phase == GamePhase::Playing {
            log::info!("Round abandoned");
        }
        self.round = None;
        self.phase = GamePhase::Home;
        self.paused = false;
        self.input = TickInput::default();
    }

    /// Held movement keys; each component is clamped to [-1, 1]
    pub fn set_axis(&mut self, axis: Vec2) {
        self.input.axis = if axis.is_finite() {
            axis.clamp(Vec2::NEG_ONE, Vec2::ONE)
        } else {
            Vec2::ZERO
        };
    }

    /// Pointer target in arena coordinates, `None` when released
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.input.pointer = pointer.filter(|p| p.is_finite());
    }

    pub fn trigger_dash(&mut self) -> Result<(), SessionError> {
        let input = self.input.clone();
        let round = self.active_round()?;
        if round.try_dash(&input) {
            Ok(())
        } else {
            Err(SessionError::DashNotReady(round.dash_ready_at - round.elapsed))
        }
    }

    pub fn trigger_power(&mut self) -> Result<(), SessionError> {
        let round = self.active_round()?;
        if !cast_hero_power(round) {
            return Err(SessionError::PowerNotCharged(round.charge));
        }
        self.collect_round_events();
        Ok(())
    }

    /// Resolve the open level-up choice
    pub fn select_upgrade(&mut self, upgrade: UpgradeId) -> Result<(), SessionError> {
        let round = self.playing_round()?;
        let Some(choices) = round.upgrade_choice.as_ref() else {
            return Err(SessionError::NoUpgradePending);
        };
        if !choices.contains(&upgrade) {
            return Err(SessionError::UpgradeNotOffered(upgrade));
        }

        apply_upgrade(round, upgrade);
        round.upgrade_choice = None;
        round.status(format!("Upgrade: {}", upgrade.label()));
        round.offer_next_choice();
        self.collect_round_events();
        Ok(())
    }

    /// Flip the pause flag. Returns the new state.
    pub fn toggle_pause(&mut self) -> Result<bool, SessionError> {
        if self.phase != GamePhase::Playing {
            return Err(SessionError::NotPlaying(self.phase));
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        Ok(self.paused)
    }

    /// Advance the round by one frame
    ///
    /// Negative or non-finite deltas count as zero; large ones are clamped
    /// to the frame cap. Paused rounds report `Frozen` without advancing.
    pub fn advance(&mut self, dt: f32) -> Result<TickOutcome, SessionError> {
        if self.phase != GamePhase::Playing {
            return Err(SessionError::NotPlaying(self.phase));
        }
        if self.paused {
            return Ok(TickOutcome::Frozen);
        }

        let dt = self.clamp_dt(dt);
        let input = self.input.clone();
        let Some(round) = self.round.as_mut() else {
            return Err(SessionError::NotPlaying(self.phase));
        };
        let outcome = tick(round, &input, dt);
        self.collect_round_events();

        if outcome == TickOutcome::Fatal {
            self.end_round();
        }
        Ok(outcome)
    }

    fn clamp_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid frame delta {}", dt);
            return 0.0;
        }
        let max = self.settings.effective_max_frame_dt();
        if dt > max {
            log::warn!("Frame delta {:.3}s clamped to {:.3}s", dt, max);
            return max;
        }
        dt
    }

    fn end_round(&mut self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let summary = summarize(round, &self.profile);
        log::info!(
            "Round over: score={} time={}s kills={} level={} reward={}{}",
            summary.score,
            summary.survival_seconds,
            summary.kills,
            summary.level,
            summary.reward,
            if summary.new_best { " (new best)" } else { "" }
        );

        self.profile.best_score = self.profile.best_score.max(summary.score);
        self.profile.currency += summary.reward as u64;
        self.phase = GamePhase::GameOver;
        self.paused = false;
        self.events.push(GameEvent::RoundEnded(summary.clone()));
        self.last_summary = Some(summary);
    }

    /// Round that accepts gameplay commands: playing and not paused
    fn playing_round(&mut self) -> Result<&mut RoundState, SessionError> {
        if self.phase != GamePhase::Playing {
            return Err(SessionError::NotPlaying(self.phase));
        }
        if self.paused {
            return Err(SessionError::Paused);
        }
        self.round
            .as_mut()
            .ok_or(SessionError::NotPlaying(self.phase))
    }

    /// Like [`Self::playing_round`], and no upgrade choice is open
    fn active_round(&mut self) -> Result<&mut RoundState, SessionError> {
        let round = self.playing_round()?;
        if round.is_frozen() {
            return Err(SessionError::ChoicePending);
        }
        Ok(round)
    }

    fn collect_round_events(&mut self) {
        if let Some(round) = self.round.as_mut() {
            self.events.append(&mut round.events);
        }
    }

    /// Fixed seed advances per round; otherwise draw from OS entropy
    fn next_seed(&mut self) -> u64 {
        let n = self.rounds_started;
        self.rounds_started += 1;
        match self.settings.seed {
            Some(seed) => seed.wrapping_add(n),
            None => rand::random(),
        }
    }
}

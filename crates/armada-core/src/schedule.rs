//! Fixed-Timestep Scheduler
//!
//! Phase-ordered update loop for the combat simulation:
//! - Physics, gameplay, UI and render phases, always run in that order
//! - Per-phase handler lists sorted by priority once, at registration
//! - Accumulator-driven fixed-step mode and a legacy variable-step mode
//! - Start/stop/pause/resume lifecycle
//!
//! The scheduler never owns a timing source. The host calls [`Scheduler::tick_at`]
//! with a millisecond timestamp (or [`Scheduler::tick`] with a delta) from
//! whatever drives its frames: a render callback, an OS timer or a test.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use smallvec::SmallVec;

use crate::time::{DeltaTime, FrameClock, FrameStats};
use crate::{CoreError, CoreResult, LoopConfig};

/// Update phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Integration and AI steering
    Physics,
    /// Damage resolution, projectiles and bookkeeping
    Gameplay,
    /// HUD and other presentation state
    Ui,
    /// Runs every tick, even while the game gate is closed
    Render,
}

impl Phase {
    /// All phases in execution order
    pub const ALL: [Phase; 4] = [Phase::Physics, Phase::Gameplay, Phase::Ui, Phase::Render];

    /// Lower-case phase name
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Physics => "physics",
            Phase::Gameplay => "gameplay",
            Phase::Ui => "ui",
            Phase::Render => "render",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.name() == s)
            .ok_or_else(|| CoreError::UnknownPhase(s.to_string()))
    }
}

/// A unit of per-tick work over a caller-owned context
pub trait UpdateHandler<C> {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Run one update with the phase's delta time
    fn update(&mut self, ctx: &mut C, dt: f64) -> anyhow::Result<()>;
}

/// Adapts a closure into an [`UpdateHandler`]
pub struct FnHandler<F> {
    name: String,
    func: F,
}

impl<F> FnHandler<F> {
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<C, F> UpdateHandler<C> for FnHandler<F>
where
    F: FnMut(&mut C, f64) -> anyhow::Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &mut C, dt: f64) -> anyhow::Result<()> {
        (self.func)(ctx, dt)
    }
}

/// Identifies a registration for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration<C> {
    id: HandlerId,
    priority: i32,
    handler: Box<dyn UpdateHandler<C>>,
}

/// Ordered handler lists, one per phase
pub struct PhaseRegistry<C> {
    phases: [Vec<Registration<C>>; 4],
    next_id: u64,
}

impl<C> PhaseRegistry<C> {
    pub fn new() -> Self {
        Self {
            phases: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            next_id: 0,
        }
    }

    /// Register a handler. Higher priority runs first; equal priorities keep
    /// registration order.
    pub fn register(
        &mut self,
        phase: Phase,
        priority: i32,
        handler: Box<dyn UpdateHandler<C>>,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        let list = &mut self.phases[phase.index()];
        list.push(Registration {
            id,
            priority,
            handler,
        });
        // Stable sort keeps insertion order among equal priorities
        list.sort_by(|a, b| b.priority.cmp(&a.priority));
        id
    }

    /// Register a closure
    pub fn register_fn<F>(
        &mut self,
        phase: Phase,
        name: impl Into<String>,
        priority: i32,
        func: F,
    ) -> HandlerId
    where
        F: FnMut(&mut C, f64) -> anyhow::Result<()> + 'static,
        C: 'static,
    {
        self.register(phase, priority, Box::new(FnHandler::new(name, func)))
    }

    /// Remove a handler; returns false if it was not registered
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        for list in &mut self.phases {
            if let Some(index) = list.iter().position(|entry| entry.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// Remove every handler of one phase
    pub fn clear(&mut self, phase: Phase) {
        self.phases[phase.index()].clear();
    }

    /// Remove every handler
    pub fn clear_all(&mut self) {
        for list in &mut self.phases {
            list.clear();
        }
    }

    /// Number of handlers registered for a phase
    pub fn len(&self, phase: Phase) -> usize {
        self.phases[phase.index()].len()
    }

    /// Check if no handler is registered at all
    pub fn is_empty(&self) -> bool {
        self.phases.iter().all(Vec::is_empty)
    }

    /// Handler names of a phase in execution order
    pub fn names(&self, phase: Phase) -> SmallVec<[&str; 8]> {
        self.phases[phase.index()]
            .iter()
            .map(|entry| entry.handler.name())
            .collect()
    }

    /// Run every handler of a phase. Errors and panics are logged and
    /// counted; they never stop the remaining handlers.
    pub fn run(&mut self, phase: Phase, ctx: &mut C, dt: f64) -> u32 {
        let _span = tracing::debug_span!("phase", phase = phase.name()).entered();
        let mut failures = 0;

        for entry in &mut self.phases[phase.index()] {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.handler.update(ctx, dt)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failures += 1;
                    log::error!("Error in {} handler '{}': {:#}", phase, entry.handler.name(), err);
                }
                Err(payload) => {
                    failures += 1;
                    log::error!(
                        "Panic in {} handler '{}': {}",
                        phase,
                        entry.handler.name(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        failures
    }
}

impl<C> Default for PhaseRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Clamped frame delta
    pub dt: DeltaTime,
    /// Physics steps executed
    pub fixed_updates: u32,
    /// Handlers that returned an error or panicked
    pub failures: u32,
    /// Whether the game gate let the simulation phases run
    pub game_active: bool,
}

type GameGate<C> = Box<dyn Fn(&C) -> bool>;

/// Phase-ordered fixed-timestep loop
pub struct Scheduler<C> {
    config: LoopConfig,
    registry: PhaseRegistry<C>,
    clock: FrameClock,
    stats: FrameStats,
    accumulator: f64,
    state: LoopState,
    game_gate: Option<GameGate<C>>,
}

impl<C> Scheduler<C> {
    /// Create a stopped scheduler
    pub fn new(config: LoopConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            clock: FrameClock::new(config.max_delta, config.fixed_timestep),
            stats: FrameStats::new(config.stats_window),
            registry: PhaseRegistry::new(),
            accumulator: 0.0,
            state: LoopState::Stopped,
            game_gate: None,
            config,
        })
    }

    /// Loop configuration
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Switch between fixed-step and variable-step mode
    pub fn set_fixed_timestep(&mut self, enabled: bool) {
        self.config.use_fixed_timestep = enabled;
    }

    /// Handler registry
    pub fn registry(&self) -> &PhaseRegistry<C> {
        &self.registry
    }

    /// Register a handler for a phase
    pub fn register(
        &mut self,
        phase: Phase,
        priority: i32,
        handler: Box<dyn UpdateHandler<C>>,
    ) -> HandlerId {
        self.registry.register(phase, priority, handler)
    }

    /// Register a closure for a phase
    pub fn register_fn<F>(
        &mut self,
        phase: Phase,
        name: impl Into<String>,
        priority: i32,
        func: F,
    ) -> HandlerId
    where
        F: FnMut(&mut C, f64) -> anyhow::Result<()> + 'static,
        C: 'static,
    {
        self.registry.register_fn(phase, name, priority, func)
    }

    /// Remove a handler
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        self.registry.unregister(id)
    }

    /// Gate the physics, gameplay and UI phases on a predicate over the
    /// context. Render always runs.
    pub fn set_game_gate<F>(&mut self, gate: F)
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.game_gate = Some(Box::new(gate));
    }

    /// Begin ticking from a clean slate
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.accumulator = 0.0;
        self.clock.reset();
        self.stats.reset();
        self.state = LoopState::Running;
        log::debug!("Scheduler started");
    }

    /// Stop ticking and drop all timing state
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.accumulator = 0.0;
        self.clock.reset();
        log::debug!("Scheduler stopped");
    }

    /// Stop ticking but keep the accumulator for a later resume
    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
            log::debug!("Scheduler paused");
        }
    }

    /// Resume a paused loop. The timestamp baseline is dropped so the
    /// pause itself does not show up as one huge delta.
    pub fn resume(&mut self) {
        if self.state != LoopState::Paused {
            return;
        }
        self.clock.reset();
        self.state = LoopState::Running;
        log::debug!("Scheduler resumed");
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Check if ticks are being processed
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frame statistics
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Unconsumed simulation time
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Interpolation factor between the last two physics steps
    pub fn interpolation(&self) -> f64 {
        (self.accumulator / self.config.fixed_timestep).clamp(0.0, 1.0)
    }

    /// Host entry point: process one frame observed at `now_ms`.
    ///
    /// Returns `None` when the scheduler is stopped or paused.
    pub fn tick_at(&mut self, ctx: &mut C, now_ms: f64) -> Option<TickReport> {
        if !self.is_running() {
            return None;
        }
        let dt = self.clock.advance(now_ms);
        Some(self.run_frame(ctx, dt))
    }

    /// Host entry point for callers that measure their own delta
    pub fn tick(&mut self, ctx: &mut C, dt: f64) -> Option<TickReport> {
        if !self.is_running() {
            return None;
        }
        let dt = DeltaTime::from_secs(dt).clamped(self.config.max_delta);
        Some(self.run_frame(ctx, dt))
    }

    fn run_frame(&mut self, ctx: &mut C, dt: DeltaTime) -> TickReport {
        let _span = tracing::debug_span!("tick", dt = dt.as_secs()).entered();
        self.stats.record(dt.as_secs());

        let step = self.config.fixed_timestep;
        let game_active = self.game_gate.as_ref().is_none_or(|gate| gate(ctx));
        let mut fixed_updates = 0;
        let mut failures = 0;

        if game_active {
            if self.config.use_fixed_timestep {
                self.accumulator += dt.as_secs();
                while self.accumulator >= step && fixed_updates < self.config.max_updates_per_frame {
                    failures += self.registry.run(Phase::Physics, ctx, step);
                    self.accumulator -= step;
                    fixed_updates += 1;
                }
                failures += self.registry.run(Phase::Gameplay, ctx, dt.as_secs());
            } else {
                // Legacy mode steps by the fixed amount once per frame
                failures += self.registry.run(Phase::Physics, ctx, step);
                failures += self.registry.run(Phase::Gameplay, ctx, step);
                fixed_updates = 1;
            }
            failures += self.registry.run(Phase::Ui, ctx, dt.as_secs());
        }

        failures += self.registry.run(Phase::Render, ctx, dt.as_secs());

        TickReport {
            dt,
            fixed_updates,
            failures,
            game_active,
        }
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            config: LoopConfig::default(),
            registry: PhaseRegistry::new(),
            clock: FrameClock::default(),
            stats: FrameStats::default(),
            accumulator: 0.0,
            state: LoopState::Stopped,
            game_gate: None,
        }
    }
}

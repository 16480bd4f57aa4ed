//! # Armada CLI
//!
//! Command-line host for the Armada combat core.
//!
//! ## Commands
//! - `simulate` - Run a headless battle through the scheduler
//! - `rating` - Look up the combat rating for a kill count
//! - `damage` - Resolve one hit against a shield/armor pair
//! - `profiles` - List the AI behavior profiles

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use armada_combat::ai::Behavior;
use armada_combat::damage::{DamageOutcome, Pools, damage_split_for_key};
use armada_combat::rating::{combat_rating, next_rating};
use armada_combat::{CombatConfig, CombatEvent, ShipClass, SimulationContext, TargetCommand, context};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

/// Armada combat core CLI
#[derive(Parser)]
#[command(name = "armada")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Combat configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a headless battle
    Simulate(SimulateArgs),

    /// Show the combat rating for a kill count
    Rating {
        /// Confirmed kills
        kills: u32,
    },

    /// Resolve one hit against a shield/armor pair
    Damage {
        /// Weapon key (primary, spread, heavy, turret, missile, beam, enemy)
        #[arg(short, long, default_value = "primary")]
        weapon: String,

        /// Nominal damage
        #[arg(short, long)]
        amount: f32,

        /// Shield as current/max
        #[arg(short, long, default_value = "50/50")]
        shield: String,

        /// Armor as current/max
        #[arg(long, default_value = "100/100")]
        armor: String,
    },

    /// List AI behavior profiles
    Profiles,
}

/// Options for a headless battle
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Frames to run
    #[arg(short, long, default_value = "600")]
    pub frames: u32,

    /// Enemies spawned around the player
    #[arg(short, long, default_value = "5")]
    pub enemies: usize,

    /// Enemy ship class
    #[arg(long, default_value = "fighter")]
    pub class: String,

    /// Enemy AI behavior
    #[arg(short, long, default_value = "interceptor")]
    pub behavior: String,

    /// Spawn seed
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Step physics on the fixed-timestep accumulator
    #[arg(long)]
    pub fixed_step: bool,

    /// Host frame time in milliseconds
    #[arg(long, default_value = "16.6")]
    pub frame_ms: f64,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of a headless battle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub frames: u32,
    pub fixed_updates: u64,
    pub handler_failures: u64,
    pub kills: u32,
    pub credits: u64,
    pub enemies_remaining: usize,
    pub player_alive: bool,
    pub player_shield: f32,
    pub player_armor: f32,
    pub hits: u32,
    pub disabled: u32,
    pub rating: &'static str,
    pub fps: f64,
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate(args) => {
            log::info!(
                "Simulating {} frames against {} {} ({})",
                args.frames,
                args.enemies,
                args.class,
                args.behavior
            );
            let summary = run_simulation(config, &args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }

        Commands::Rating { kills } => {
            let rating = combat_rating(kills);
            println!("{} kills: {} ({})", kills, rating.name, rating.color);
            match next_rating(kills) {
                Some((next, needed)) => println!("  {} more for {}", needed, next.name),
                None => println!("  Top rating reached"),
            }
        }

        Commands::Damage {
            weapon,
            amount,
            shield,
            armor,
        } => {
            let (outcome, pools) = resolve_damage(&config, &weapon, amount, &shield, &armor)?;
            println!("Hit with {} for {}", weapon, amount);
            println!("  Shield: -{:.2} -> {:.2}/{}", outcome.shield_damage, pools.shield, pools.max_shield);
            println!("  Armor:  -{:.2} -> {:.2}/{}", outcome.armor_damage, pools.armor, pools.max_armor);
            if outcome.newly_disabled {
                println!("  Target disabled");
            }
            if outcome.newly_destroyed {
                println!("  Target destroyed");
            }
        }

        Commands::Profiles => {
            println!("{:<12} {:>10} {:>6} {:>9} {:>9}", "behavior", "aggression", "flee", "pursuit", "preferred");
            for behavior in Behavior::ALL {
                let profile = behavior.profile();
                println!(
                    "{:<12} {:>10.2} {:>6.2} {:>9} {:>9}",
                    behavior.key(),
                    profile.aggression,
                    profile.flee_threshold,
                    profile.pursuit_range,
                    profile.preferred_range
                );
            }
        }
    }

    Ok(())
}

/// Load the combat configuration, or defaults without a file
pub fn load_config(path: Option<&Path>) -> Result<CombatConfig> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            CombatConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(CombatConfig::default()),
    }
}

/// Parse a `current/max` pool pair
pub fn parse_pool(value: &str) -> Result<(f32, f32)> {
    let Some((current, max)) = value.split_once('/') else {
        bail!("expected current/max, got '{}'", value);
    };
    let current: f32 = current.trim().parse().with_context(|| format!("bad current value in '{}'", value))?;
    let max: f32 = max.trim().parse().with_context(|| format!("bad max value in '{}'", value))?;
    if max < 0.0 || current < 0.0 {
        bail!("pool values must not be negative: '{}'", value);
    }
    Ok((current, max))
}

/// Apply one hit from `weapon` to the given pools
pub fn resolve_damage(
    config: &CombatConfig,
    weapon: &str,
    amount: f32,
    shield: &str,
    armor: &str,
) -> Result<(DamageOutcome, Pools)> {
    let (shield, max_shield) = parse_pool(shield)?;
    let (armor, max_armor) = parse_pool(armor)?;
    let mut pools = Pools::new(max_shield, max_armor)
        .with_disable_threshold(config.damage.default_disable_threshold)
        .with_current(shield, armor);

    let split = damage_split_for_key(weapon, amount);
    let outcome = config.damage.resolve(&mut pools, split.energy, split.mass);
    Ok((outcome, pools))
}

/// Run a seeded battle through the scheduler. The player holds position,
/// locks the nearest enemy and fires at it.
pub fn run_simulation(config: CombatConfig, args: &SimulateArgs) -> Result<SimulationSummary> {
    if !(args.frame_ms.is_finite() && args.frame_ms > 0.0) {
        bail!("frame time must be positive, got {}", args.frame_ms);
    }

    let class = ShipClass::from_key_or_default(&args.class);
    let behavior = Behavior::from_key_or_default(&args.behavior);

    let mut scheduler = context::build_scheduler(&config)?;
    scheduler.set_fixed_timestep(args.fixed_step);

    let mut ctx = SimulationContext::new(config);
    let mut rng = StdRng::seed_from_u64(args.seed);
    for _ in 0..args.enemies {
        ctx.spawn_enemy_around(&mut rng, class, behavior, 400.0, 900.0);
    }

    let mut summary = SimulationSummary {
        frames: 0,
        fixed_updates: 0,
        handler_failures: 0,
        kills: 0,
        credits: 0,
        enemies_remaining: 0,
        player_alive: true,
        player_shield: 0.0,
        player_armor: 0.0,
        hits: 0,
        disabled: 0,
        rating: "",
        fps: 0.0,
    };

    scheduler.start();
    let mut now_ms = 0.0;
    for _ in 0..args.frames {
        steer_player(&mut ctx);

        let Some(report) = scheduler.tick_at(&mut ctx, now_ms) else {
            break;
        };
        now_ms += args.frame_ms;
        summary.frames += 1;
        summary.fixed_updates += u64::from(report.fixed_updates);
        summary.handler_failures += u64::from(report.failures);

        for event in ctx.drain_events() {
            match event {
                CombatEvent::Hit { .. } => summary.hits += 1,
                CombatEvent::ShipDisabled { .. } => summary.disabled += 1,
                _ => {}
            }
        }

        if !ctx.is_running() {
            log::info!("Player destroyed on frame {}", summary.frames);
            break;
        }
        if ctx.enemies.is_empty() {
            log::info!("All enemies destroyed on frame {}", summary.frames);
            break;
        }
    }
    scheduler.stop();

    let player = &ctx.player;
    summary.kills = player.kills;
    summary.credits = player.credits;
    summary.enemies_remaining = ctx.enemies.len();
    summary.player_alive = player.is_alive();
    summary.player_shield = player.ship.pools.shield;
    summary.player_armor = player.ship.pools.armor;
    summary.rating = combat_rating(player.kills).name;
    summary.fps = scheduler.stats().fps();
    Ok(summary)
}

/// Stand-in for the input collaborator
fn steer_player(ctx: &mut SimulationContext) {
    if ctx.locked_target().is_none() {
        ctx.input.target_command = Some(TargetCommand::Nearest);
    }
    let aim = ctx.locked_target().map(|target| target.position());
    ctx.input.primary_fire = aim.is_some();
    ctx.input.missile_fire = aim.is_some();
    if let Some(aim) = aim {
        ctx.input.aim = aim;
    }
}

fn print_summary(summary: &SimulationSummary) {
    println!("Frames:     {} ({} fixed updates)", summary.frames, summary.fixed_updates);
    println!("Kills:      {} ({} credits)", summary.kills, summary.credits);
    println!("Remaining:  {}", summary.enemies_remaining);
    println!(
        "Player:     {} (shield {:.1}, armor {:.1})",
        if summary.player_alive { "alive" } else { "destroyed" },
        summary.player_shield,
        summary.player_armor
    );
    println!("Hits:       {} ({} disabled)", summary.hits, summary.disabled);
    println!("Rating:     {}", summary.rating);
    println!("FPS:        {:.1}", summary.fps);
    if summary.handler_failures > 0 {
        println!("Failures:   {}", summary.handler_failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate_args(extra: &[&str]) -> SimulateArgs {
        let mut argv = vec!["armada", "simulate"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Simulate(args) => args,
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from(["armada", "profiles"]);
        assert!(matches!(cli.command, Commands::Profiles));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_simulate_command() {
        let args = simulate_args(&["-f", "120", "-e", "3", "--class", "heavy", "--fixed-step", "--json"]);
        assert_eq!(args.frames, 120);
        assert_eq!(args.enemies, 3);
        assert_eq!(args.class, "heavy");
        assert_eq!(args.behavior, "interceptor");
        assert!(args.fixed_step && args.json);
        assert!((args.frame_ms - 16.6).abs() < 1e-9);
    }

    #[test]
    fn test_damage_command() {
        let cli = Cli::parse_from(["armada", "damage", "-w", "missile", "-a", "80", "-s", "10/50"]);
        if let Commands::Damage { weapon, amount, shield, armor } = cli.command {
            assert_eq!(weapon, "missile");
            assert_eq!(amount, 80.0);
            assert_eq!(shield, "10/50");
            assert_eq!(armor, "100/100");
        } else {
            panic!("Expected Damage command");
        }
    }

    #[test]
    fn test_parse_pool() {
        assert_eq!(parse_pool("25/50").unwrap(), (25.0, 50.0));
        assert_eq!(parse_pool(" 0 / 30 ").unwrap(), (0.0, 30.0));
        assert!(parse_pool("25").is_err());
        assert!(parse_pool("a/b").is_err());
        assert!(parse_pool("-1/10").is_err());
    }

    #[test]
    fn test_resolve_damage() {
        let config = CombatConfig::default();
        // Laser: 80% energy into the shield, the rest into armor
        let (outcome, pools) = resolve_damage(&config, "primary", 20.0, "50/50", "30/30").unwrap();
        assert!((outcome.shield_damage - 16.0).abs() < 1e-4);
        assert!((pools.armor - 26.0).abs() < 1e-4);

        let (outcome, pools) = resolve_damage(&config, "missile", 80.0, "0/50", "30/100").unwrap();
        assert!(outcome.newly_destroyed);
        assert_eq!(pools.armor, 0.0);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let args = simulate_args(&["-f", "180", "-e", "4", "--seed", "9"]);
        let first = run_simulation(CombatConfig::default(), &args).unwrap();
        let second = run_simulation(CombatConfig::default(), &args).unwrap();
        assert_eq!(first, second);
        assert!(first.frames > 0);
        assert_eq!(first.handler_failures, 0);
        assert_eq!(first.kills as usize + first.enemies_remaining, 4);
    }

    #[test]
    fn test_fixed_step_simulation_counts_updates() {
        let args = simulate_args(&["-f", "30", "-e", "1", "--fixed-step", "--frame-ms", "33.3"]);
        let summary = run_simulation(CombatConfig::default(), &args).unwrap();
        assert!(summary.fixed_updates >= u64::from(summary.frames));
    }

    #[test]
    fn test_rejects_bad_frame_time() {
        let args = simulate_args(&["--frame-ms", "0"]);
        assert!(run_simulation(CombatConfig::default(), &args).is_err());
    }
}

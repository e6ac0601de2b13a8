use anyhow::Result;
use clap::Parser;
use phalanx_core::modifiers::paths;
use phalanx_core::{
    step_sim, CheatSpec, Command, EventLogObserver, ObserverRegistry, PlayerId, PlayerInputs,
    SimConfig, Snapshot, StatPath,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player activating the cheat
    #[arg(long, default_value_t = 1)]
    player: u32,

    /// Cheat to apply: superfast, attack-speed, or a stat path for the
    /// generic multiplier (e.g. Attack/Ranged/Damage/Pierce)
    #[arg(long, default_value = "superfast")]
    cheat: String,

    /// Factor handed to the cheat
    #[arg(long, default_value_t = 1.5)]
    multiplier: f32,

    /// Idle ticks to run after the cheat tick
    #[arg(short, long, default_value_t = 3)]
    ticks: u32,

    /// Reject cheat commands (competitive-match configuration)
    #[arg(long)]
    no_cheats: bool,

    /// Write JSONL modifier events to this file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_cheat(args: &Args) -> Result<CheatSpec> {
    match args.cheat.as_str() {
        "superfast" => Ok(CheatSpec::Superfast {
            speed_multiplier: args.multiplier,
        }),
        "attack-speed" => Ok(CheatSpec::CavalryAttackSpeed {
            scale: args.multiplier,
        }),
        stat if stat.contains('/') => Ok(CheatSpec::StatMultiplier {
            stat: StatPath::from(stat),
            multiplier: args.multiplier,
        }),
        other => anyhow::bail!(
            "unknown cheat `{other}` (expected superfast, attack-speed, or a stat path)"
        ),
    }
}

/// Stat paths a cheat touches, for the before/after report.
fn report_paths(cheat: &CheatSpec) -> Vec<StatPath> {
    match cheat {
        CheatSpec::Superfast { .. } => vec![StatPath::from(paths::RANGED_PIERCE_DAMAGE)],
        CheatSpec::StatMultiplier { stat, .. } => vec![stat.clone()],
        CheatSpec::CavalryAttackSpeed { .. } => vec![
            StatPath::from(paths::RANGED_REPEAT_TIME),
            StatPath::from(paths::RANGED_PREPARE_TIME),
        ],
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    log::info!("Starting phalanx-sim...");

    let cheat = parse_cheat(&args)?;
    let config = SimConfig {
        cheats_enabled: !args.no_cheats,
    };
    let player = PlayerId(args.player);

    let mut registry = ObserverRegistry::new();
    if let Some(path) = &args.events {
        registry.register(Box::new(EventLogObserver::to_file(path)?));
    }

    let mut state = phalanx_core::testing::skirmish_state();
    let template = "cavalry_javelineer";
    let watched = report_paths(&cheat);

    let player_ent = state.players.get_player_by_id(player)?;
    let before: Vec<_> = watched
        .iter()
        .map(|path| state.stat_value(player_ent, template, path))
        .collect::<std::result::Result<_, _>>()?;

    // Baseline snapshot so observers can diff the cheat tick against it
    registry.notify(&Snapshot::new(state.clone(), state.tick));

    // Cheat tick
    let inputs = vec![PlayerInputs {
        player,
        commands: vec![Command::Cheat(cheat.clone())],
    }];
    state = step_sim(&state, &inputs, &config);
    registry.notify(&Snapshot::new(state.clone(), state.tick));

    // Idle ticks
    for _ in 0..args.ticks {
        state = step_sim(&state, &[], &config);
        registry.notify(&Snapshot::new(state.clone(), state.tick));
    }

    log::info!("Simulation finished at tick {}", state.tick);

    for (path, before) in watched.iter().zip(before) {
        let after = state.stat_value(player_ent, template, path)?;
        println!("{template} {path}: {before} -> {after}");
    }

    Ok(())
}

//! Brick Assault headless runner
//!
//! Drives the simulation with a fixed-timestep accumulator and a simple
//! autopilot, logging events as they happen. Useful for soak-testing
//! configs and level files without a renderer.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use brick_assault::GameConfig;
use brick_assault::consts::{MAX_SUBSTEPS, SIM_DT};
use brick_assault::sim::{
    FnSubscriber, GameEvent, GamePhase, GameState, LevelConfig, LoggingSubscriber, TickInput, UpgradeId, tick,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless brick-breaker simulation runner", long_about = None)]
struct Args {
    /// Tuning overrides (JSON, missing fields take defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level files (JSON), played in order and then repeated
    #[arg(long = "level")]
    levels: Vec<PathBuf>,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Pace frames against the wall clock instead of fast-forwarding
    #[arg(long)]
    realtime: bool,
    /// Print the effective tuning as JSON and exit
    #[arg(long)]
    print_config: bool,
}

/// Fixed-timestep driver
struct Runner {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    shop_cursor: usize,
}

impl Runner {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput::default(),
            shop_cursor: 0,
        }
    }

    /// Consume one frame's worth of wall time in fixed ticks
    fn update(&mut self, frame_dt: f32) {
        let dt = frame_dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.autopilot();
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.launch = false;
            self.input.pause = false;
            self.input.purchase = None;
        }
    }

    /// Track the ball, keep firing, launch whenever possible and shop between levels
    fn autopilot(&mut self) {
        let state = &self.state;
        self.input.target_x = Some(state.ball.pos.x);
        self.input.fire = state.bat.turrets > 0;
        match state.phase {
            GamePhase::Intro => self.input.launch = true,
            GamePhase::Playing => self.input.launch = state.ball.is_sticky(),
            GamePhase::Upgrade => {
                let affordable = UpgradeId::ALL
                    .iter()
                    .cycle()
                    .skip(self.shop_cursor)
                    .take(UpgradeId::ALL.len())
                    .find(|id| {
                        let level = state.upgrades.level(**id);
                        level < id.max_level() && id.cost(level) <= state.points
                    })
                    .copied();
                match affordable {
                    Some(id) => {
                        self.shop_cursor = (self.shop_cursor + 1) % UpgradeId::ALL.len();
                        self.input.purchase = Some(id);
                    }
                    None => self.input.launch = true,
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load_from_file(path).with_context(|| format!("load config {:?}", path))?,
        None => GameConfig::default(),
    };
    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }
    let levels = args
        .levels
        .iter()
        .map(|path| LevelConfig::load_from_file(path).with_context(|| format!("load level {:?}", path)))
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Brick Assault (headless) starting: seed {}, {} level file(s)",
        args.seed,
        levels.len()
    );

    let tally: Rc<RefCell<BTreeMap<&'static str, u32>>> = Rc::default();
    let sink = tally.clone();
    let mut state = GameState::new(args.seed, config, levels);
    state.subscribe(LoggingSubscriber);
    state.subscribe(FnSubscriber::new("tally", move |e: &GameEvent| {
        *sink.borrow_mut().entry(e.name()).or_insert(0) += 1;
    }));

    let mut runner = Runner::new(state);
    let frame = Duration::from_secs_f32(SIM_DT);
    let mut simulated = 0.0;
    let mut last = Instant::now();
    while simulated < args.seconds && runner.state.phase != GamePhase::GameOver {
        let frame_dt = if args.realtime {
            std::thread::sleep(frame.saturating_sub(last.elapsed()));
            let now = Instant::now();
            let dt = (now - last).as_secs_f32();
            last = now;
            dt
        } else {
            SIM_DT
        };
        runner.update(frame_dt);
        simulated += frame_dt;
    }

    let state = &runner.state;
    log::info!(
        "Finished after {:.1}s: phase {:?}, level {}, score {}, lives {}",
        simulated,
        state.phase,
        state.level.number,
        state.score,
        state.lives
    );
    for (name, count) in tally.borrow().iter() {
        log::info!("  {:<20} {}", name, count);
    }
    println!(
        "{}",
        serde_json::json!({
            "seed": state.rng.seed(),
            "phase": state.phase,
            "level": state.level.number,
            "score": state.score,
            "lives": state.lives,
            "events": &*tally.borrow(),
        })
    );
    Ok(())
}

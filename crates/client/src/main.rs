mod config;
mod feed;
mod sink;
mod world;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::Instant;

use config::ClientConfig;
use hexmotion::{
    ActionPacket, ActionQueue, Actor, Clock, HecsCoord, HexMap, LocalPlayer, MotionConfig,
    PlayerInput, SystemClock,
};
use sink::LogSink;
use world::World;

#[derive(Parser)]
#[command(name = "hexmotion_client")]
#[command(about = "Headless hex grid action playback")]
struct Args {
    #[arg(
        short,
        long,
        help = "JSON-lines file of action packets to replay (a demo feed is used otherwise)"
    )]
    packets: Option<PathBuf>,

    #[arg(long, help = "JSON file overriding motion tunables")]
    motion_config: Option<PathBuf>,

    #[arg(short, long, default_value_t = 60)]
    frame_rate: u32,

    #[arg(long, default_value_t = 10)]
    rows: usize,

    #[arg(long, default_value_t = 10)]
    cols: usize,

    #[arg(short, long, default_value_t = 5.0, help = "Stop after this many seconds")]
    run_secs: f32,

    #[arg(long, default_value_t = 0)]
    player_id: i32,

    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_parser = config::parse_input,
        help = "Local player inputs, e.g. right,forward,forward,left"
    )]
    inputs: Vec<PlayerInput>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let motion = match &args.motion_config {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MotionConfig::from_json(&data)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => MotionConfig::default(),
    };

    let config = ClientConfig {
        frame_rate: args.frame_rate.max(1),
        map_rows: args.rows,
        map_cols: args.cols,
        run_secs: args.run_secs,
        player_id: args.player_id,
        packets: args.packets,
        script: args.inputs,
        motion,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

/// Outgoing packets go to stdout, one JSON object per line.
fn transmit(packet: ActionPacket) -> bool {
    match packet.to_json() {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            log::warn!("could not encode packet: {e}");
            false
        }
    }
}

async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let map = Arc::new(HexMap::new(config.map_rows, config.map_cols));
    let center = HecsCoord::from_offset_coordinates(
        (config.map_rows / 2) as i32,
        (config.map_cols / 2) as i32,
    );

    let (tx, mut rx) = mpsc::channel::<ActionPacket>(256);
    let feed = match config.packets.clone() {
        Some(path) => tokio::spawn(feed::replay_file(path, tx)),
        None => tokio::spawn(feed::demo_feed(
            tx,
            config.motion.clone(),
            HecsCoord::from_offset_coordinates(1, 1),
        )),
    };

    let mut world = World::new(clock.clone(), map.clone(), config.motion.clone());

    let queue = ActionQueue::new("player", clock.clone(), map.clone());
    let actor = Actor::new(
        config.player_id,
        Arc::new(queue),
        LogSink::new("player"),
        &config.motion,
    );
    actor.spawn_at(center, 0.0, config.motion.expiration_from(clock.now()));
    let mut player = LocalPlayer::new(actor, transmit, map, clock.clone(), config.motion.clone());

    let mut script: VecDeque<PlayerInput> = config.script.iter().copied().collect();
    let frame = Duration::from_secs_f64(1.0 / f64::from(config.frame_rate));
    let mut interval = tokio::time::interval(frame);
    let deadline =
        Instant::now() + Duration::try_from_secs_f32(config.run_secs.max(0.0)).unwrap_or_default();
    let mut feed_open = true;

    log::info!(
        "running {}x{} map at {} fps for {}s",
        config.map_rows,
        config.map_cols,
        config.frame_rate,
        config.run_secs
    );

    loop {
        interval.tick().await;

        while feed_open {
            match rx.try_recv() {
                Ok(packet) => world.apply(packet),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => feed_open = false,
            }
        }

        world.tick();
        player.update();

        if !player.is_busy() {
            if let Some(input) = script.pop_front() {
                if !player.handle_input(input) {
                    log::info!("player input {input:?} rejected");
                }
            }
        }

        if Instant::now() >= deadline {
            log::info!("run time elapsed");
            break;
        }
        if !feed_open && script.is_empty() && world.is_idle() && !player.is_busy() {
            log::info!("feed drained and all actors idle");
            break;
        }
    }

    if let Some(sink) = player.actor().sink() {
        let position = sink.position();
        log::info!(
            "player finished at {} ({:.2}, {:.2}) facing {:.0}",
            player.actor().location(),
            position.x,
            position.z,
            sink.heading_degrees()
        );
    }

    log::info!("{} remote actors still on the board", world.len());

    feed.abort();
    match feed.await {
        Ok(Err(e)) => log::warn!("packet feed failed: {e:#}"),
        Ok(Ok(())) => {}
        Err(e) if e.is_cancelled() => {}
        Err(e) => log::warn!("packet feed task failed: {e}"),
    }

    Ok(())
}

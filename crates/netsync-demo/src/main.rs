// Numan Thabit 2025
use anyhow::{Context, Result};
use clap::Parser;
use netsync_core::{DeltaCompressor, PacketWriter, StreamSource};
use netsync_demo::config::{CliArgs, Config, Role};
use netsync_demo::record::{PlayerCodec, PlayerState, TickCodec, TickContext};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tracing::{info, warn};

type Roster = DeltaCompressor<PlayerState, TickContext, PlayerCodec, TickCodec>;

/// Ticks the demo runs for before the server closes the connection. A real
/// service would keep ticking until shutdown; this binary exists to show the
/// wire format working end to end, so it stops after a bounded run.
const DEMO_TICK_COUNT: u64 = 200;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = CliArgs::parse();
    let config = Config::from_cli(&cli)?;

    match config.role {
        Role::Server => run_server(&config).await,
        Role::Client => run_client(&config).await,
    }
}

async fn run_server(config: &Config) -> Result<()> {
    let listener = TcpListener::bind(config.addr)
        .await
        .context("failed to bind listen socket")?;
    info!(addr = %config.addr, roster_size = config.roster_size, "netsync-demo server listening");

    let (stream, peer) = tokio::select! {
        accepted = listener.accept() => accepted.context("accept failed")?,
        _ = shutdown_signal() => {
            info!("shutdown signal received before any client connected");
            return Ok(());
        }
    };
    info!(%peer, "client connected");

    let initial: Vec<PlayerState> = vec![PlayerState::default(); config.roster_size];
    let mut roster = Roster::new(initial).context("failed to construct roster")?;
    let mut writer = PacketWriter::new(stream);

    for tick in 0..DEMO_TICK_COUNT {
        let next_state = simulate_tick(&roster, tick, config.roster_size);
        let ctx = TickContext { tick };
        if let Err(err) = roster.write_packet(&mut writer, &next_state, &ctx).await {
            warn!(error = %err, "failed to write packet; client likely disconnected");
            break;
        }
        tokio::time::sleep(config.tick_interval).await;
    }

    info!("demo run complete, closing connection");
    Ok(())
}

/// Deterministic motion so the demo is reproducible without pulling in a
/// random number generator: each slot orbits at a phase offset from its
/// index, and loses one health point every other tick until it bottoms out.
fn simulate_tick(roster: &Roster, tick: u64, roster_size: usize) -> Vec<PlayerState> {
    let mut next = roster.current_state().to_vec();
    for (index, player) in next.iter_mut().enumerate() {
        let phase = (tick as f32) * 0.1 + (index as f32) * (std::f32::consts::TAU / roster_size as f32);
        player.x = phase.cos() * 10.0;
        player.y = phase.sin() * 10.0;
        if tick == 0 {
            player.health = 100;
        } else if tick % 2 == 0 {
            player.health = player.health.saturating_sub(1).max(1);
        }
    }
    next
}

async fn run_client(config: &Config) -> Result<()> {
    let stream = TcpStream::connect(config.addr)
        .await
        .context("failed to connect to server")?;
    info!(addr = %config.addr, "connected to server");

    let initial: Vec<PlayerState> = vec![PlayerState::default(); config.roster_size];
    let mut roster = Roster::new(initial).context("failed to construct roster")?;
    let mut source = StreamSource::new(stream);

    roster
        .apply_packet(&mut source)
        .await
        .context("applying packets from server")?;

    for (index, player) in roster.current_state().iter().enumerate() {
        info!(
            index,
            x = player.x,
            y = player.y,
            health = player.health,
            last_synced_tick = player.last_synced_tick,
            "final player state"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(%err, "failed to install shutdown handler");
    }
    info!("shutdown signal received");
}

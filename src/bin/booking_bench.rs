//! Booking Throughput Benchmark
//!
//! Feeds a deterministic stream of random bookings through a registry and
//! reports wall time.
//!
//! Usage:
//!   cargo run --release --bin booking_bench
//!   cargo run --release --bin booking_bench -- --bookings 5000000 --map-kind ordered

use anyhow::{Context, Result};
use clap::Parser;
use quanta::Clock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotel_stats::{ClientId, MapKind, StatsConfig, Time, DEFAULT_WINDOW_SPAN};

const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ01234567890";
const NAME_LEN: usize = 12;

#[derive(Parser, Debug)]
#[command(name = "booking_bench")]
#[command(about = "Benchmark sliding-window booking statistics")]
struct Args {
    /// Number of bookings to record
    #[arg(long, default_value = "1000000")]
    bookings: usize,

    /// Number of distinct hotels
    #[arg(long, default_value = "1000")]
    hotels: usize,

    /// Number of distinct clients
    #[arg(long, default_value = "20000")]
    clients: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Statistics window span
    #[arg(long, default_value_t = DEFAULT_WINDOW_SPAN)]
    window_span: Time,

    /// Hotel index map: hashed or ordered
    #[arg(long, default_value = "hashed")]
    map_kind: MapKind,
}

fn generate_hotels(rng: &mut ChaCha8Rng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            (0..NAME_LEN)
                .map(|_| NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())] as char)
                .collect()
        })
        .collect()
}

fn generate_clients(rng: &mut ChaCha8Rng, count: usize) -> Vec<ClientId> {
    (0..count).map(|_| rng.gen_range(1..=999_999_999)).collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "booking_bench=info".into()),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.hotels > 0 && args.clients > 0, "need at least one hotel and client");

    let config = StatsConfig {
        window_span: args.window_span,
        map_kind: args.map_kind,
    };
    let mut registry = config.build_registry().context("Invalid window span")?;

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let hotels = generate_hotels(&mut rng, args.hotels);
    let clients = generate_clients(&mut rng, args.clients);

    let clock = Clock::new();
    let start = clock.now();
    let mut time: Time = 0;
    for _ in 0..args.bookings {
        let hotel = &hotels[rng.gen_range(0..hotels.len())];
        let client = clients[rng.gen_range(0..clients.len())];
        let rooms = rng.gen_range(1..=1000);
        time += rng.gen_range(0..=1000);
        registry.record(time, hotel, client, rooms)?;
    }
    let elapsed = clock.now().duration_since(start);

    info!(
        bookings = args.bookings,
        hotels = registry.entity_count(),
        map_kind = %args.map_kind,
        elapsed_ms = elapsed.as_millis() as u64,
        "benchmark complete"
    );
    println!("Duration: {} ms", elapsed.as_millis());
    Ok(())
}

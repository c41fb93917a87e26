use clap::{Parser, ValueEnum};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use zstd::Encoder;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use ptorzot::{count_solutions, describe_solution, find_solution, Level, GAME_SIZE};

const CHUNK_SIZE: usize = 250;
const CHANNEL_BUFFER: usize = 200;
const COMPRESSION_LEVEL: i32 = 3;

//
// Dataset rows
//

/// One puzzle in the emitted corpus: the game parameters plus one witness
/// solution, and optionally the exhaustive solution count.
#[derive(Debug, Serialize)]
struct PuzzleInstance {
    level: &'static str,
    numbers: [u32; GAME_SIZE],
    target: u32,
    solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    solutions: Option<usize>,
}

impl PuzzleInstance {
    fn from_steps(
        level: Level,
        numbers: [u32; GAME_SIZE],
        target: u32,
        steps: &[ptorzot::Step],
        counted: bool,
    ) -> Self {
        Self {
            level: level.as_str(),
            numbers,
            target,
            solution: describe_solution(&numbers, steps),
            solutions: counted.then(|| count_solutions(&numbers, target)),
        }
    }

    fn sampled(level: Level, counted: bool) -> Self {
        let game = level.new_game();
        let (numbers, target) = (*game.numbers(), game.target());
        let steps =
            find_solution(&numbers, target).expect("generated targets are reachable");
        Self::from_steps(level, numbers, target, &steps, counted)
    }
}

//
// Generators
//

/// Generate one chunk of sampled instances in parallel. Each rayon worker
/// draws from its own thread-local RNG.
fn generate_chunk(level: Level, counted: bool, size: usize) -> Vec<PuzzleInstance> {
    (0..size)
        .into_par_iter()
        .map(|_| PuzzleInstance::sampled(level, counted))
        .collect()
}

/// Every target in the level's range that the solver can actually reach
/// from the given numbers.
fn exhaustive_instances_for(level: Level, numbers: [u32; GAME_SIZE]) -> Vec<PuzzleInstance> {
    level
        .target_range()
        .filter_map(|target| {
            let steps = find_solution(&numbers, target)?;
            Some(PuzzleInstance::from_steps(level, numbers, target, &steps, false))
        })
        .collect()
}

//
// Writer thread
//

/// Message type for communicating chunks to the writer thread.
enum ChunkMessage {
    Data(Vec<PuzzleInstance>),
    Terminate,
}

/// Spawns a writer thread that drains the channel and appends each instance
/// as one JSON line to the zstd-compressed output file.
fn spawn_writer_thread(
    file: File,
    progress_bar: ProgressBar,
    rx: mpsc::Receiver<ChunkMessage>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let buf_writer = BufWriter::new(file);
        let mut encoder =
            Encoder::new(buf_writer, COMPRESSION_LEVEL).expect("Failed to create encoder");
        let mut total_written = 0u64;
        while let Ok(message) = rx.recv() {
            match message {
                ChunkMessage::Data(instances) => {
                    let mut buffer = String::with_capacity(instances.len() * 120);
                    for instance in instances {
                        let json =
                            serde_json::to_string(&instance).expect("Serialization failed");
                        buffer.push_str(&json);
                        buffer.push('\n');
                        total_written += 1;
                    }
                    if let Err(e) = encoder.write_all(buffer.as_bytes()) {
                        log::error!("failed to write to encoder: {e}");
                        break;
                    }
                    progress_bar.set_position(total_written);
                }
                ChunkMessage::Terminate => break,
            }
        }
        encoder.finish().expect("Failed to finish encoding");
    })
}

fn chunk_progress_bar(total: u64, style: &str) -> (MultiProgress, ProgressBar) {
    let m = MultiProgress::new();
    m.set_draw_target(ProgressDrawTarget::stderr_with_hz(5));
    let pb = m.add(ProgressBar::new(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "[{{elapsed_precise}}] {{bar:40.{style}}} {{pos:>7}}/{{len:7}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("##-"),
    );
    (m, pb)
}

//
// Mode-specific runner functions
//

fn run_random_mode(
    num_instances: usize,
    level: Level,
    counted: bool,
    file: File,
) -> io::Result<()> {
    let style = if counted { "green/white" } else { "cyan/blue" };
    let (_m, pb) = chunk_progress_bar(num_instances as u64, style);

    let (tx, rx) = mpsc::sync_channel(CHANNEL_BUFFER);
    let writer_handle = spawn_writer_thread(file, pb.clone(), rx);

    let chunks_needed = num_instances.div_ceil(CHUNK_SIZE);
    for chunk_index in 0..chunks_needed {
        let mut instances = generate_chunk(level, counted, CHUNK_SIZE);
        if chunk_index == chunks_needed - 1 {
            let total_needed = num_instances - (chunks_needed - 1) * CHUNK_SIZE;
            instances.truncate(total_needed);
        }
        tx.send(ChunkMessage::Data(instances))
            .expect("Failed to send chunk");
    }

    tx.send(ChunkMessage::Terminate)
        .expect("Failed to send termination signal");
    writer_handle.join().expect("Writer thread panicked");
    pb.finish_with_message("Completed");
    Ok(())
}

fn run_exhaustive_mode(level: Level, file: File) -> io::Result<()> {
    let multisets: Vec<[u32; GAME_SIZE]> = (1..=9u32)
        .combinations_with_replacement(GAME_SIZE)
        .map(|combo| combo.try_into().expect("combinations have GAME_SIZE elements"))
        .collect();
    println!(
        "Performing exhaustive search over {} number sets (targets: {:?})...",
        multisets.len(),
        level.target_range()
    );
    let (_m, pb) = chunk_progress_bar(multisets.len() as u64, "magenta/black");

    let (tx, rx) = mpsc::sync_channel(CHANNEL_BUFFER);
    let writer_handle = spawn_writer_thread(file, ProgressBar::hidden(), rx);

    for batch in multisets.chunks(CHUNK_SIZE) {
        let instances: Vec<PuzzleInstance> = batch
            .par_iter()
            .flat_map_iter(|&numbers| exhaustive_instances_for(level, numbers))
            .collect();
        pb.inc(batch.len() as u64);
        tx.send(ChunkMessage::Data(instances))
            .expect("Failed to send chunk");
    }

    tx.send(ChunkMessage::Terminate)
        .expect("Failed to send termination signal");
    writer_handle.join().expect("Writer thread panicked");
    pb.finish_with_message("Completed");
    Ok(())
}

//
// Command-line definitions
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Sampled games, one witness solution each.
    Random,
    /// Sampled games, annotated with exhaustive solution counts.
    Counted,
    /// Every number multiset crossed with every reachable in-range target.
    Exhaustive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LevelArg {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Easy => Level::Easy,
            LevelArg::Medium => Level::Medium,
            LevelArg::Hard => Level::Hard,
            LevelArg::VeryHard => Level::VeryHard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Mode of dataset generation.
    #[arg(long, value_enum, default_value_t = Mode::Random)]
    mode: Mode,

    /// Difficulty level whose target range drives generation.
    #[arg(long, value_enum, default_value_t = LevelArg::Easy)]
    level: LevelArg,

    /// Output file name.
    #[arg(short, long, default_value = "ptorzot_dataset.jsonl.zst")]
    outfile: String,

    /// Number of instances to generate (random and counted modes).
    #[arg(long, default_value = "1000")]
    num_instances: usize,
}

//
// Main
//

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    println!("Starting dataset generation in mode: {:?}", args.mode);
    let start_time = Instant::now();

    let file = File::create(&args.outfile)?;

    match args.mode {
        Mode::Random => run_random_mode(args.num_instances, args.level.into(), false, file)?,
        Mode::Counted => run_random_mode(args.num_instances, args.level.into(), true, file)?,
        Mode::Exhaustive => run_exhaustive_mode(args.level.into(), file)?,
    }

    let elapsed = start_time.elapsed();
    println!("\nFinal Statistics:");
    println!("Total time: {:?}", elapsed);
    println!("Output written to: {}", args.outfile);
    Ok(())
}

//! Baseball simulation CLI
//!
//! Thin driver over `bb_core`: run a full CPU-vs-CPU game from a roster
//! request file, or from a synthetic demo matchup, and print the line
//! score, box score, and play log.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bb_core::{
    build_engine, run_to_completion, Batter, BattingStats, GameRecord, GameRequest, Pitcher,
    PitchingStats, SimulationRun, TeamData, TeamSide, TimeOfDay, Weather,
};

#[derive(Parser)]
#[command(name = "bb_cli")]
#[command(about = "Run baseball game simulations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full game from a GameRequest JSON file
    Simulate {
        /// Input request JSON file path
        #[arg(long)]
        request: PathBuf,

        /// Override the seed in the request
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full snapshot replay JSON to this path
        #[arg(long)]
        snapshots: Option<PathBuf>,

        /// Pretty-print the snapshot replay JSON
        #[arg(long, default_value = "false")]
        pretty: bool,

        /// Print the entire play log instead of just the final plays
        #[arg(long, default_value = "false")]
        full_log: bool,
    },

    /// Simulate a synthetic league-average matchup (no data files needed)
    Demo {
        /// Simulation seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Weather: clear, wind_out, wind_in, rain, dome
        #[arg(long, default_value = "clear")]
        weather: String,

        /// Time of day: day, twilight, night
        #[arg(long)]
        time_of_day: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { request, seed, snapshots, pretty, full_log } => {
            let raw = fs::read_to_string(&request)
                .with_context(|| format!("reading request file {}", request.display()))?;
            let mut parsed: GameRequest =
                serde_json::from_str(&raw).context("parsing GameRequest JSON")?;
            if let Some(seed) = seed {
                parsed.seed = seed;
            }
            run_and_report(parsed, snapshots, pretty, full_log)
        }
        Commands::Demo { seed, weather, time_of_day } => {
            let weather: Weather = serde_json::from_value(serde_json::Value::String(weather))
                .context("unknown weather value")?;
            let time_of_day: Option<TimeOfDay> = match time_of_day {
                Some(value) => Some(
                    serde_json::from_value(serde_json::Value::String(value))
                        .context("unknown time_of_day value")?,
                ),
                None => None,
            };
            let request = GameRequest {
                schema_version: bb_core::SCHEMA_VERSION,
                seed,
                player_side: TeamSide::Home,
                weather,
                time_of_day,
                home_team: demo_team("Harbor City", "HRB", 100),
                away_team: demo_team("River Valley", "RIV", 200),
            };
            run_and_report(request, None, false, false)
        }
    }
}

fn run_and_report(
    request: GameRequest,
    snapshots: Option<PathBuf>,
    pretty: bool,
    full_log: bool,
) -> Result<()> {
    let mut engine = build_engine(request).context("building the game engine")?;
    let run = run_to_completion(&mut engine);

    print_line_score(&run.final_state);
    print_box_score(&run.final_state);
    print_play_log(&run.final_state, full_log);

    if let Some(path) = snapshots {
        write_snapshots(&run, &path, pretty)?;
        println!("\nWrote {} snapshots to {}", run.snapshots.len(), path.display());
    }
    Ok(())
}

fn write_snapshots(run: &SimulationRun, path: &PathBuf, pretty: bool) -> Result<()> {
    let json = if pretty { run.to_json_pretty() } else { run.to_json() }
        .context("serializing the snapshot replay")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn print_line_score(record: &GameRecord) {
    let innings = record.away_score.len();
    print!("\n{:<16}", "");
    for inning in 1..=innings {
        print!("{:>3}", inning);
    }
    println!("{:>5}{:>4}{:>4}", "R", "H", "E");

    for (name, score, total, hits, errors) in [
        (
            &record.away_team.abbreviation,
            &record.away_score,
            record.away_total,
            record.away_hits,
            record.away_errors,
        ),
        (
            &record.home_team.abbreviation,
            &record.home_score,
            record.home_total,
            record.home_hits,
            record.home_errors,
        ),
    ] {
        print!("{:<16}", name);
        for runs in score {
            print!("{:>3}", runs);
        }
        println!("{:>5}{:>4}{:>4}", total, hits, errors);
    }
}

fn print_box_score(record: &GameRecord) {
    for (team, lines, pitching) in [
        (&record.away_team.name, &record.away_box, &record.away_pitching_line),
        (&record.home_team.name, &record.home_box, &record.home_pitching_line),
    ] {
        println!("\n{}", team);
        println!(
            "{:<22}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}",
            "Batter", "AB", "R", "H", "HR", "RBI", "BB", "SO", "SB"
        );
        for line in lines {
            println!(
                "{:<22}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}",
                line.name, line.ab, line.r, line.h, line.hr, line.rbi, line.bb, line.so, line.sb
            );
        }
        println!(
            "P: {} - IP {}, H {}, R {}, ER {}, BB {}, SO {}",
            pitching.name,
            pitching.innings_pitched(),
            pitching.hits,
            pitching.runs,
            pitching.earned_runs,
            pitching.walks,
            pitching.strikeouts
        );
    }
}

fn print_play_log(record: &GameRecord, full_log: bool) {
    println!();
    if full_log {
        for entry in &record.play_log {
            println!("{}", entry);
        }
    } else {
        println!("{}", record.last_play);
    }
}

fn demo_team(name: &str, abbreviation: &str, id_base: u32) -> TeamData {
    // Deterministic stat spread: the top of the order hits for average,
    // the middle for power, the bottom trails off.
    let lineup = (0..9)
        .map(|slot| {
            let avg = 0.310 - 0.010 * slot as f64;
            let slg = 0.540 - 0.020 * slot as f64;
            let k_rate = 0.170 + 0.015 * slot as f64;
            Batter {
                id: id_base + slot as u32,
                name: format!("{} Batter {}", abbreviation, slot + 1),
                position: "CF".to_string(),
                stats: BattingStats { avg, slg, k_rate, hr_rate: None },
                splits: None,
            }
        })
        .collect();
    TeamData {
        name: name.to_string(),
        abbreviation: abbreviation.to_string(),
        lineup,
        pitcher: Pitcher {
            id: id_base + 50,
            name: format!("{} Starter", abbreviation),
            stats: PitchingStats { era: 3.90, k_per_9: 8.8, bb_per_9: 2.9 },
            splits: None,
        },
        bullpen: vec![
            Pitcher {
                id: id_base + 51,
                name: format!("{} Reliever", abbreviation),
                stats: PitchingStats { era: 3.40, k_per_9: 9.6, bb_per_9: 3.3 },
                splits: None,
            },
            Pitcher {
                id: id_base + 52,
                name: format!("{} Closer", abbreviation),
                stats: PitchingStats { era: 2.70, k_per_9: 11.2, bb_per_9: 2.5 },
                splits: None,
            },
        ],
    }
}

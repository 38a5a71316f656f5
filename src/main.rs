// Driver: decides the next submission for one authoritative snapshot
//
// Usage:
//   cube-paint <snapshot.json> [--config <path>] [--all]
//
// Prints the two submission strings for the controlled slots, one per line.
// With --all, every evaluated heading combination is listed as well.

use log::{error, info};
use std::env;
use std::fs;
use std::process;

use cube_paint::config::Config;
use cube_paint::debug_logger::DebugLogger;
use cube_paint::engine::GameState;
use cube_paint::explorer::Explorer;
use cube_paint::types::Snapshot;

fn print_usage() {
    eprintln!("cube-paint");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  cube-paint <snapshot.json> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --config <path>   Path to Sim.toml (default: Sim.toml)");
    eprintln!("  --all             Also list every evaluated branch");
    eprintln!("  --help            Show this help message");
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let snapshot_path = &args[1];
    let mut config_path: Option<String> = None;
    let mut list_all = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--all" => {
                list_all = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: Could not load config from '{}': {}", path, e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    let contents = fs::read_to_string(snapshot_path).unwrap_or_else(|e| {
        eprintln!("Error: Failed to read snapshot '{}': {}", snapshot_path, e);
        process::exit(1);
    });
    let snapshot: Snapshot = serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error: Failed to parse snapshot '{}': {}", snapshot_path, e);
        process::exit(1);
    });

    if !snapshot.is_live() {
        info!("Game is not accepting moves (status {:?})", snapshot.status);
        return;
    }

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path);
    let explorer = Explorer::new(config);

    if list_all {
        let outcomes = GameState::from_snapshot(&snapshot)
            .and_then(|state| explorer.explore(&state))
            .unwrap_or_else(|e| {
                error!("Failed to explore turn {}: {}", snapshot.turn, e);
                process::exit(1);
            });
        for outcome in outcomes.iter() {
            println!(
                "{:?} owned={} area={:?} score={:?}",
                outcome.rotations, outcome.owned, outcome.area, outcome.score
            );
        }
    }

    match explorer.decide(&snapshot) {
        Ok(submission) => {
            for line in submission.iter() {
                println!("{}", line);
            }
            logger.log_turn(&snapshot, &submission);
        }
        Err(e) => {
            error!("Failed to decide turn {}: {}", snapshot.turn, e);
            process::exit(1);
        }
    }
}

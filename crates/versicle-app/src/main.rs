//! Versicle — daily inspirational audio messages

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::bounded;

use versicle_app::app::{AppCommand, AppController, AppSnapshot};
use versicle_app::data::Clip;
use versicle_app::error::AppError;
use versicle_app::generate::{SURPRISE_THEME, VISIBLE_THEMES};
use versicle_app::providers::{GeminiClient, SpeechSynthesizer, TextGenerator};

/// Versicle — daily inspirational audio messages
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Name to personalize today's message for (generates on startup)
    #[arg(long)]
    name: Option<String>,

    /// Theme for today's message; defaults to the surprise pick
    #[arg(long)]
    theme: Option<String>,
}

fn main() -> Result<(), AppError> {
    env_logger::init();
    let args = Args::parse();

    let client = match GeminiClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Warning: {} (generation will fail until it is set)", e);
            GeminiClient::new(String::new())?
        }
    };
    let client = Arc::new(client);
    let text: Arc<dyn TextGenerator> = client.clone();
    let speech: Arc<dyn SpeechSynthesizer> = client;

    // Shared command channel + state
    let (cmd_tx, cmd_rx) = bounded(64);
    let shared_state = Arc::new(Mutex::new(AppSnapshot::default()));

    let controller_state = shared_state.clone();
    let controller_tx = cmd_tx.clone();
    let controller = thread::Builder::new()
        .name("controller".into())
        .spawn(move || {
            AppController::new(cmd_rx, controller_tx, controller_state, text, speech).run();
        })?;

    // Give the controller a moment to load today's cached record
    thread::sleep(Duration::from_millis(200));

    if let Some(name) = args.name {
        let theme = args.theme.unwrap_or_else(|| SURPRISE_THEME.to_string());
        println!("Generating today's message for {}...", name);
        let _ = cmd_tx.send(AppCommand::Generate { name, theme });
    } else {
        print_status(&shared_state);
    }
    print_help();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };

        match command {
            "generate" | "gen" => {
                let Some(name) = parts.next() else {
                    println!("usage: generate <name> [theme...]");
                    continue;
                };
                let theme_words: Vec<&str> = parts.collect();
                let theme = if theme_words.is_empty() {
                    SURPRISE_THEME.to_string()
                } else {
                    theme_words.join(" ")
                };
                println!("Generating... (type `status` to follow along)");
                let _ = cmd_tx.send(AppCommand::Generate {
                    name: name.to_string(),
                    theme,
                });
            }
            "pray" => {
                println!("Generating a prayer... (type `status` to follow along)");
                let _ = cmd_tx.send(AppCommand::GeneratePrayer);
            }
            "play" => {
                let _ = cmd_tx.send(AppCommand::Play(clip_arg(parts.next())));
            }
            "pause" => {
                let _ = cmd_tx.send(AppCommand::Pause(clip_arg(parts.next())));
            }
            "volume" | "vol" => match parts.next().and_then(|v| v.parse::<f32>().ok()) {
                Some(volume) => {
                    let _ = cmd_tx.send(AppCommand::SetVolume(volume));
                }
                None => println!("usage: volume <0.0..=2.0>"),
            },
            "export" => {
                let Some(path) = parts.next() else {
                    println!("usage: export <path.wav> [prayer]");
                    continue;
                };
                let _ = cmd_tx.send(AppCommand::ExportWav {
                    clip: clip_arg(parts.next()),
                    path: PathBuf::from(path),
                });
            }
            "share" => {
                let _ = cmd_tx.send(AppCommand::Share(clip_arg(parts.next())));
            }
            "pix" | "copy" => {
                let _ = cmd_tx.send(AppCommand::CopyPaymentKey);
                println!("Payment key copied to clipboard.");
            }
            "themes" => {
                println!("Themes: {}", VISIBLE_THEMES.join(", "));
                println!("Or: {}", SURPRISE_THEME);
            }
            "status" | "s" => {
                // Let a just-sent command land before reading
                thread::sleep(Duration::from_millis(150));
                print_status(&shared_state);
            }
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            other => println!("Unknown command: {} (try `help`)", other),
        }
    }

    let _ = cmd_tx.send(AppCommand::Shutdown);
    let _ = controller.join();
    Ok(())
}

fn clip_arg(arg: Option<&str>) -> Clip {
    match arg {
        Some("prayer") | Some("p") => Clip::Prayer,
        _ => Clip::Revelation,
    }
}

fn fmt_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn print_status(shared_state: &Arc<Mutex<AppSnapshot>>) {
    let snap = shared_state
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone();

    match &snap.record {
        Some(record) => {
            println!(
                "Today ({}): message for {} on {}",
                record.date_key, record.person_name, record.theme
            );
            println!("  {}", record.revelation_text);
            if let Some(prayer) = &record.prayer_text {
                println!("  Prayer: {}", prayer);
            }
        }
        None => println!("No message generated today."),
    }

    for (label, clip) in [("revelation", &snap.revelation), ("prayer", &snap.prayer)] {
        if clip.loaded {
            println!(
                "  {}: {} {} / {}",
                label,
                clip.state,
                fmt_duration(clip.elapsed),
                fmt_duration(clip.total)
            );
        }
    }

    if let Some(e) = &snap.revelation_error {
        println!("  ! {}", e);
    }
    if let Some(e) = &snap.prayer_error {
        println!("  ! {}", e);
    }
    println!("Status: {}", snap.status_text);
}

fn print_help() {
    println!("Commands:");
    println!("  generate <name> [theme...]   generate today's message");
    println!("  pray                         generate a prayer for today's message");
    println!("  play|pause [prayer]          playback control");
    println!("  volume <0.0..=2.0>           set output volume");
    println!("  export <path.wav> [prayer]   export a clip as WAV");
    println!("  share [prayer]               share a clip");
    println!("  pix                          copy the payment key");
    println!("  themes | status | help | quit");
}

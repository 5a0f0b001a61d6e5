use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{info, warn};

use frameline::{
    all_presets, build_session_config, find_preset, PersistedSettings, Session, SessionEvent,
    SessionInput,
};

/// Run frame-range tracks headlessly and report when each one finishes.
#[derive(Parser, Debug)]
#[command(name = "frameline", version)]
struct Args {
    /// Session file (YAML) with tracks and shared settings
    session: Option<PathBuf>,

    /// Run a built-in preset instead of a session file
    #[arg(short, long, conflicts_with = "session")]
    preset: Option<String>,

    /// List built-in presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Settings file (YAML); created with defaults if missing
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Write the session's settings back to the settings file
    #[arg(long, requires = "settings")]
    save_settings: bool,

    /// Simulated display refresh rate in Hz
    #[arg(long, default_value_t = 60.0)]
    display_rate: f64,

    /// Print the foremost note of every track once per simulated second
    #[arg(long)]
    trace: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.list_presets {
        for preset in all_presets() {
            println!("{} ({} tracks)", preset.name, preset.num_tracks());
        }
        return;
    }

    if args.display_rate <= 0.0 {
        eprintln!("Display rate must be positive");
        process::exit(1);
    }

    let settings = match &args.settings {
        Some(path) => load_or_create_settings(path),
        None => PersistedSettings::default(),
    };

    let input = match (&args.session, &args.preset) {
        (Some(path), _) => read_session(path),
        (None, Some(name)) => match find_preset(name) {
            Some(preset) => preset.to_input(&settings),
            None => {
                eprintln!("Unknown preset '{}'. Use --list-presets to see them.", name);
                process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Usage: frameline <session.yaml> | --preset <name> | --list-presets");
            process::exit(1);
        }
    };

    let config = match build_session_config(&input) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut session = Session::default();
    if let Err(e) = session.start_all(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if args.save_settings {
        if let Some(path) = &args.settings {
            save_settings(path, &config.persisted());
        }
    }

    run(&mut session, args.display_rate, args.trace);
}

fn run(session: &mut Session, display_rate: f64, trace: bool) {
    let dt = 1.0 / display_rate;
    let t_max = session
        .tracks()
        .iter()
        .map(|track| track.t_max())
        .fold(0.0, f64::max);
    // every note is culled well before this
    let deadline = t_max + 5.0;

    let mut elapsed = 0.0;
    let mut next_trace = 0.0;
    while elapsed < deadline {
        if trace && elapsed >= next_trace {
            print_views(session, elapsed);
            next_trace += 1.0;
        }

        elapsed += dt;
        let tick = session.tick(dt);
        for event in &tick.events {
            match event {
                SessionEvent::TrackFinished { track, at } => {
                    println!("track {} finished at {:.3}s", track + 1, at);
                }
                SessionEvent::PlaybackEnded => {
                    println!("playback ended at {:.3}s", elapsed);
                    return;
                }
            }
        }
    }

    warn!("playback did not end within {:.1}s", deadline);
}

fn print_views(session: &Session, elapsed: f64) {
    for view in session.views() {
        match view.note {
            Some(note) if note.visible => println!(
                "{:>7.3}s  track {}  note {}  x={:.1} w={:.1}  target={:.1}",
                elapsed,
                view.id + 1,
                note.id,
                note.rect.x,
                note.rect.width,
                view.target.x
            ),
            Some(_) => println!("{:>7.3}s  track {}  (note off screen)", elapsed, view.id + 1),
            None => println!("{:>7.3}s  track {}  (no notes)", elapsed, view.id + 1),
        }
    }
}

fn read_session(path: &Path) -> SessionInput {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    };

    match SessionInput::from_yaml(&source) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error in session file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn load_or_create_settings(path: &Path) -> PersistedSettings {
    if !path.exists() {
        warn!("Settings file not found at '{}', creating default...", path.display());
        let settings = PersistedSettings::default();
        save_settings(path, &settings);
        return settings;
    }

    let loaded = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| PersistedSettings::from_yaml(&content).map_err(|e| e.to_string()));

    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn save_settings(path: &Path, settings: &PersistedSettings) {
    let yaml = match settings.to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = fs::write(path, yaml) {
        eprintln!("Error writing to '{}': {}", path.display(), e);
        process::exit(1);
    }
    info!("saved settings to {}", path.display());
}

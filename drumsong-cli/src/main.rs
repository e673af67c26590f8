use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use drumsong_core::config::Config;
use drumsong_core::fx::StaticRack;
use drumsong_core::paths::DrumkitRoots;
use drumsong_core::persistence::{self, legacy, LoadedSong, SaveContext};
use drumsong_types::{Song, SongMode};

const USAGE: &str = "usage: drumsong [-v|--verbose] <command>

commands:
  info <song>               print a summary of a song file
  dump <song>               print the song model as JSON
  upgrade <in> <out>        re-save a song in the current format
  pattern-kit <pattern>     print the drum kit a pattern file was made for
  new <out>                 save an empty song using the configured defaults";

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    if let Err(e) = TermLogger::init(log_level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("drumsong: could not initialize logging: {}", e);
    }

    log::debug!("drumsong {} (log level: {:?})", drumsong_core::VERSION, log_level);
}

enum Command<'a> {
    Info(&'a Path),
    Dump(&'a Path),
    Upgrade(&'a Path, &'a Path),
    PatternKit(&'a Path),
    New(&'a Path),
}

fn parse_command(args: &[String]) -> Option<Command<'_>> {
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "-v" && *a != "--verbose")
        .collect();

    match positional.as_slice() {
        ["info", song] => Some(Command::Info(Path::new(*song))),
        ["dump", song] => Some(Command::Dump(Path::new(*song))),
        ["upgrade", input, output] => Some(Command::Upgrade(Path::new(*input), Path::new(*output))),
        ["pattern-kit", pattern] => Some(Command::PatternKit(Path::new(*pattern))),
        ["new", output] => Some(Command::New(Path::new(*output))),
        _ => None,
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let Some(command) = parse_command(&args) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let config = Config::load();
    let roots = config.drumkit_roots();

    let result = match command {
        Command::Info(path) => info(path, &roots),
        Command::Dump(path) => dump(path, &roots),
        Command::Upgrade(input, output) => upgrade(input, output, &roots),
        Command::PatternKit(path) => pattern_kit(path),
        Command::New(path) => {
            let mut song = Song::new_with_defaults(config.defaults());
            persistence::save_song(path, &mut song, &SaveContext::new(&roots)).map_err(Into::into)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("drumsong: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn info(path: &Path, roots: &DrumkitRoots) -> Result<(), Box<dyn Error>> {
    let legacy = legacy::is_legacy_dialect(path);
    let LoadedSong { song, effects, version } = persistence::load_song(path, roots)?;

    let mode = match song.mode {
        SongMode::Song => "song",
        SongMode::Pattern => "pattern",
    };

    println!("name:        {}", song.name);
    println!("author:      {}", song.author);
    println!("written by:  {}{}", version, if legacy { " (legacy format)" } else { "" });
    println!("tempo:       {} bpm", song.bpm);
    println!("mode:        {}", mode);
    println!("components:  {}", song.components.len());
    println!(
        "instruments: {} ({} layers)",
        song.instruments.len(),
        song.instruments.iter().map(|i| i.layer_count()).sum::<usize>()
    );
    println!("patterns:    {} ({} notes)", song.patterns.len(), song.note_count());
    println!("sequence:    {} groups", song.pattern_sequence.len());
    println!("effects:     {} of {} slots", effects.iter().flatten().count(), effects.len());
    if !song.timeline.tempo_markers.is_empty() {
        println!("tempo marks: {}", song.timeline.tempo_markers.len());
    }
    Ok(())
}

fn dump(path: &Path, roots: &DrumkitRoots) -> Result<(), Box<dyn Error>> {
    let loaded = persistence::load_song(path, roots)?;
    println!("{}", serde_json::to_string_pretty(&loaded.song)?);
    Ok(())
}

/// Effects recorded in the input are carried over to the output.
fn upgrade(input: &Path, output: &Path, roots: &DrumkitRoots) -> Result<(), Box<dyn Error>> {
    let loaded = persistence::load_song(input, roots)?;
    let mut song = loaded.song;

    let mut rack = StaticRack::new();
    for (slot, info) in loaded.effects.into_iter().enumerate() {
        if let Some(info) = info {
            rack = rack.with_slot(slot, info);
        }
    }

    let ctx = SaveContext::new(roots).with_effects(&rack);
    persistence::save_song(output, &mut song, &ctx)?;
    println!("{} -> {}", input.display(), output.display());
    Ok(())
}

fn pattern_kit(path: &Path) -> Result<(), Box<dyn Error>> {
    let name = persistence::drumkit_name_for_pattern(path)
        .ok_or_else(|| format!("{}: not a readable pattern file", path.display()))?;
    println!("{}", name);
    Ok(())
}

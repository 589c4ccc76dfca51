use std::env;
use std::io::{self, BufRead, Write};

use tutti::engine::RodioBackend;
use tutti::library::{DirectoryResolver, SourceResolver};
use tutti::{SessionPlayer, Settings};

#[derive(Debug, PartialEq)]
enum Command {
    Play,
    Pause,
    Toggle,
    Seek(f64),
    Volume(usize, f32),
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let cmd = match parts.next()? {
        "play" => Command::Play,
        "pause" => Command::Pause,
        "t" | "toggle" => Command::Toggle,
        "seek" => Command::Seek(parts.next()?.parse().ok()?),
        "vol" => Command::Volume(parts.next()?.parse().ok()?, parts.next()?.parse().ok()?),
        "s" | "status" => Command::Status,
        "q" | "quit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn print_status(player: &SessionPlayer) {
    let snapshot = player.snapshot();
    let duration = snapshot
        .duration
        .map(|d| format!("{d:.1}s"))
        .unwrap_or_else(|| "--".to_string());
    println!(
        "{} {:.1}s / {duration}",
        if snapshot.playing { "playing" } else { "paused" },
        snapshot.current_time
    );
    for (i, track) in snapshot.tracks.iter().enumerate() {
        println!(
            "  [{i}] {:<16} vol {:.2} at {:.1}s {:?}",
            track.id, track.volume, track.position, track.status
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let song = args.next().ok_or("usage: tutti <song> [library-dir]")?;
    let dir = args.next().unwrap_or("Music".to_string());

    let settings = Settings::load_or_default();
    let sources = DirectoryResolver::new(&dir, settings.library.clone()).resolve(&song)?;
    let player = SessionPlayer::spawn(sources, settings.playback.clone(), RodioBackend::open_default)?;

    println!("commands: play, pause, toggle, seek <secs>, vol <track> <0..1>, status, quit");
    print_status(&player);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let result = match parse_command(&line) {
            Some(Command::Play) => player.play(),
            Some(Command::Pause) => player.pause(),
            Some(Command::Toggle) => player.toggle_playback(),
            Some(Command::Seek(secs)) => player.seek_to(secs),
            Some(Command::Volume(index, volume)) => player.set_volume(index, volume),
            Some(Command::Status) => {
                print_status(&player);
                Ok(())
            }
            Some(Command::Quit) => break,
            None => {
                println!("unknown command: {}", line.trim());
                Ok(())
            }
        };
        if let Err(err) = result {
            eprintln!("{err}");
        }
        io::stdout().flush()?;
    }

    player.quit();
    Ok(())
}

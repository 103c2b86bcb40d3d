use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{never, select, tick, unbounded};
use log::{debug, info};

use yearplay::cli::{Args, DatasetKind};
use yearplay::config::ControllerConfig;
use yearplay::entities::builtin::{timeline_layout, works_layout};
use yearplay::entities::{Dataset, Item, creative_works, personal_timeline};
use yearplay::render::{Circle, TextSurface};
use yearplay::shell::{HELP, Input, Shell, init_logger};
use yearplay::PlaybackCommand;

/// Host frame period for pumping autoplay
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbosity, args.log_file.clone())?;

    info!("yearplay {} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Command-line args: {:?}", args);

    let config = ControllerConfig::from_env_and_cli(args.config.clone())?;
    if let Some(path) = &args.dump_config {
        config.save(path)?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    match args.dataset {
        DatasetKind::Works => {
            let data = creative_works();
            let layout = works_layout(&data);
            run(&args, config, data, layout)
        }
        DatasetKind::Timeline => {
            let data = personal_timeline();
            let layout = timeline_layout(&data);
            run(&args, config, data, layout)
        }
        DatasetKind::Empty => {
            let data = Dataset::new(Vec::new());
            let layout = works_layout(&data);
            run(&args, config, data, layout)
        }
    }
}

fn run<I, F>(args: &Args, config: ControllerConfig, dataset: Dataset<I>, layout: F) -> Result<()>
where
    I: Item,
    F: Fn(&I) -> Circle,
{
    let title = args.dataset.title();
    let surface = TextSurface::new(title, layout, io::stdout(), config.transition());
    let mut shell = Shell::new(title, args.dataset.key_name(), Some(surface), dataset, config);

    // Startup options go through the bus like any other request
    let mut startup = Vec::new();
    if let Some(ms) = args.speed_ms {
        startup.push(PlaybackCommand::SetSpeed(ms));
    }
    if let Some(index) = args.start_index {
        startup.push(PlaybackCommand::ScrubTo(index));
    }
    if args.show_all {
        startup.push(PlaybackCommand::ShowAll);
    }
    if args.autoplay {
        startup.push(PlaybackCommand::TogglePlayPause);
    }
    for cmd in startup {
        shell.request(cmd);
    }
    shell.process_events();
    println!("{}", shell.status());

    let (tx, rx) = unbounded::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut lines = rx;
    let frames = tick(FRAME);
    loop {
        select! {
            recv(lines) -> msg => match msg {
                Ok(line) => match shell.handle_input(&line) {
                    Input::Quit => break,
                    Input::Help => println!("{}", HELP),
                    Input::Unknown(e) => eprintln!("{} (type 'help')", e),
                    Input::Ignored(_) => println!("controls disabled"),
                    Input::Command(_) | Input::Empty => {}
                },
                Err(_) => {
                    // Keep animating after piped input ends, stop otherwise
                    let playing = shell
                        .visualization
                        .controller()
                        .is_some_and(|c| c.is_playing());
                    if !playing {
                        info!("stdin closed");
                        break;
                    }
                    lines = never();
                }
            },
            recv(frames) -> _ => {}
        }
        if shell.update() {
            println!("{}", shell.status());
        }
    }

    shell.visualization.unmount();
    Ok(())
}

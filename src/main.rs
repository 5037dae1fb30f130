// What you SEE:
// • "LOADING" while the stamp images load in the background.
// • Mouse mode: move the pointer and stamps pop up behind it, then shrink and fade.
// • Touch mode (--touch): stamps pop up at random spots on a clock, and wherever you press.
// • ESC quits.

mod config;
mod draw;
mod error;
mod lifecycle;
mod scheduler;
mod selection;
mod session;
mod source;
mod stamp;
mod surface;
mod trigger;
mod types;

use clap::Parser;
use config::{Args, LogFormat, SourceKind, Timing, STAMP_FILENAMES};
use draw::{draw_loading, draw_surface, draw_text_5x7, Drawer};
use error::Error;
use selection::Selector;
use session::Session;
use source::{load_or_degrade, ImageSource, LocalSource, RemoteSource};
use std::thread::JoinHandle;
use std::time::Instant;
use surface::Surface;
use tracing::{error, info};
use trigger::{InputMode, TriggerMonitor};
use types::{FrameBuffer, ImageResource, Point};

const BACKGROUND: u32 = 0x00_F4_EF_E6; // warm paper
const INK: u32 = 0x00_30_2C_28;

/// Either still waiting on the images, or up and reacting to input.
enum Phase {
    Loading(JoinHandle<Vec<ImageResource>>),
    Running(Session),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    init_logging(&args);
    info!("stamp-trail v{}", env!("CARGO_PKG_VERSION"));

    let timing = Timing::default();
    let mode = InputMode::detect(args.touch);

    /* --- Window + screen buffer ---
       Visual: an empty paper-colored window. */
    let mut drawer = Drawer::new("Stamp Trail", args.width, args.height)?;
    let mut screen = FrameBuffer::new(args.width, args.height);

    /* --- Image load runs off the UI thread ---
       Visual: "LOADING" stays up until this settles. */
    let mut phase = Phase::Loading(spawn_loader(&args));

    let start = Instant::now();
    let mut last_pointer: Option<Point> = None;
    let mut was_down = false;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = start.elapsed();

        // Loading settled? Hide the indicator and start listening to input.
        phase = match phase {
            Phase::Loading(handle) if handle.is_finished() => {
                let resources = handle.join().unwrap_or_else(|_| {
                    error!("{}", Error::LoaderPanicked);
                    Vec::new()
                });
                Phase::Running(Session::new(
                    resources,
                    Selector::new(args.selection, args.selection_seed()),
                    TriggerMonitor::new(mode, &timing, args.monitor_seed()),
                    timing,
                    Surface::new(args.width, args.height),
                ))
            }
            other => other,
        };

        screen.fill(BACKGROUND);

        match &mut phase {
            Phase::Loading(_) => draw_loading(&mut screen, INK),
            Phase::Running(session) => {
                // 1) Frame boundary: timers, frame callbacks, periodic trigger
                session.tick(now);

                // 2) Input observed this frame; new stamps reveal on the next one
                let pointer = drawer.pointer();
                let down = drawer.left_mouse_down();
                match session.mode() {
                    InputMode::Continuous => {
                        if let Some(p) = pointer.filter(|p| Some(*p) != last_pointer) {
                            session.pointer_moved(p, now);
                        }
                    }
                    InputMode::Periodic => {
                        if let (true, false, Some(p)) = (down, was_down, pointer) {
                            session.touch_started(p, now);
                        }
                    }
                }
                last_pointer = pointer;
                was_down = down;

                // 3) Paint the stamp layer (+ optional HUD)
                draw_surface(&mut screen, session.surface(), now);
                if args.hud {
                    let hud = format!(
                        "STAMPS: {}  NEXT: {}",
                        session.surface().len(),
                        session.stamps().next_index()
                    );
                    draw_text_5x7(&mut screen, 8, 8, &hud, INK, 2);
                }
            }
        }

        /* Present to the window (this is when the on-screen image updates). */
        drawer.present(&screen)?;
    }

    if let Phase::Running(session) = &mut phase {
        session.shutdown();
    }
    Ok(())
}

/// Start loading images on a worker thread. Any failure ends up as an empty list.
fn spawn_loader(args: &Args) -> JoinHandle<Vec<ImageResource>> {
    let kind = args.source;
    let assets = args.assets.clone();
    let listing_url = args.listing_url.clone();
    let limit = args.listing_limit();
    let max_edge = args.stamp_size;
    let policy = args.load_policy;

    std::thread::spawn(move || {
        let source: Box<dyn ImageSource> = match kind {
            SourceKind::Local => Box::new(LocalSource::new(assets, STAMP_FILENAMES, max_edge, policy)),
            SourceKind::Remote => match RemoteSource::new(listing_url, limit, max_edge, policy) {
                Ok(remote) => Box::new(remote),
                Err(e) => {
                    error!("Error preloading images: {e}");
                    return Vec::new();
                }
            },
        };
        load_or_degrade(source.as_ref())
    })
}

fn init_logging(args: &Args) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("stamp_trail={log_level},warn"))
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    match args.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

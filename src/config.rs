// Compile-time timing constants plus the runtime options parsed from the command line.

use crate::selection::SelectionPolicy;
use crate::source::LoadPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub const FADEOUT_DELAY: Duration = Duration::from_millis(1000);      // time a stamp stays before fading out
pub const TRANSITION_DURATION: Duration = Duration::from_millis(750); // fade in/out length, and exit-start -> removal
pub const MIN_CURSOR_TRAVEL: f32 = 100.0;                             // pointer travel (px) needed for a new stamp
pub const MOBILE_FREQ: Duration = Duration::from_millis(125);         // periodic-mode spacing between stamps

pub const STAMP_DIR: &str = "assets/stamps";
pub const STAMP_FILENAMES: &[&str] = &[
    "Stamp_1_Blue.png",
    "Stamp_1_Green.png",
    "Stamp_1_Purple.png",
    "Stamp_1_Red.png",
    "Stamp_2_Blue.png",
    "Stamp_2_Green.png",
    "Stamp_2_Purple.png",
    "Stamp_2_Red.png",
    "Stamp_3_Blue.png",
    "Stamp_3_Green.png",
    "Stamp_3_Purple.png",
    "Stamp_3_Red.png",
    "Stamp_4_Blue.png",
    "Stamp_4_Green.png",
    "Stamp_4_Purple.png",
    "Stamp_4_Red.png",
];

pub const LISTING_URL: &str = "https://picsum.photos/v2/list";
pub const LISTING_LIMIT: usize = 100; // the listing endpoint never pages past this

/// Timing knobs for the trigger monitor and the stamp lifecycle.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    pub fade_out_delay: Duration,
    pub transition: Duration,
    pub min_travel: f32,
    pub periodic_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            fade_out_delay: FADEOUT_DELAY,
            transition: TRANSITION_DURATION,
            min_travel: MIN_CURSOR_TRAVEL,
            periodic_interval: MOBILE_FREQ,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Stamps bundled under the assets directory
    Local,
    /// Photos from the remote listing endpoint
    Remote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Command-line arguments for stamp-trail
#[derive(Parser, Debug)]
#[command(name = "stamp-trail")]
#[command(version, about = "Leaves a trail of fading stamps behind the pointer", long_about = None)]
pub struct Args {
    /// Where stamp images come from
    #[arg(long, value_enum, default_value = "local", env = "STAMP_SOURCE")]
    pub source: SourceKind,

    /// Directory holding the bundled stamp images
    #[arg(long, default_value = STAMP_DIR, env = "STAMP_DIR")]
    pub assets: PathBuf,

    /// Remote listing endpoint (remote source only)
    #[arg(long, default_value = LISTING_URL, env = "STAMP_LISTING_URL")]
    pub listing_url: String,

    /// How many listing entries to load (capped at 100)
    #[arg(long, default_value_t = LISTING_LIMIT)]
    pub listing_limit: usize,

    /// Which image the next stamp uses
    #[arg(long, value_enum, default_value = "random")]
    pub selection: SelectionPolicy,

    /// What to do when some images fail to load
    #[arg(long, value_enum, default_value = "partial")]
    pub load_policy: LoadPolicy,

    /// Touch device: stamp periodically at random spots instead of following the pointer
    #[arg(long, env = "STAMP_TOUCH")]
    pub touch: bool,

    #[arg(long, default_value_t = 1280)]
    pub width: usize,

    #[arg(long, default_value_t = 720)]
    pub height: usize,

    /// Longest edge of a stamp, in pixels
    #[arg(long, default_value_t = 160)]
    pub stamp_size: u32,

    /// Seed for stamp selection and periodic placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show the live stamp count
    #[arg(long)]
    pub hud: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Args {
    pub fn listing_limit(&self) -> usize {
        self.listing_limit.min(LISTING_LIMIT)
    }

    pub fn selection_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Derived from `--seed` so placement does not replay the selection stream.
    pub fn monitor_seed(&self) -> Option<u64> {
        self.seed.map(|s| s ^ 0x9E37_79B9_7F4A_7C15)
    }
}

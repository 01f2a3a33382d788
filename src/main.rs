use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use ytmb::{
    cli::{self, RunOptions},
    config, error,
    engine::{CombinationMethod, SampleMethod, SampleSize},
    logging,
    programs::{
        AdvancedParameters, BlendParameters, DEFAULT_BLEND_LENGTH, PlaylistsParameters, Program,
        WriteMethod,
    },
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Show debug output on the console
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Write the debug log to this file instead of the data directory
    #[clap(long, global = true)]
    log: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage users
    Users(UsersOptions),

    /// List the playlists of a user
    Playlists(PlaylistsOptions),

    /// Random, equal-length picks from each source, interleaved, then overwrite
    Mixtape(PlaylistsProgramOptions),

    /// Every track of each source in order, then update
    Compilation(PlaylistsProgramOptions),

    /// Combine source playlists with explicit sampling and writing choices
    Advanced(AdvancedOptions),

    /// Sample the home feeds of several users into one playlist
    Blend(BlendOptions),

    /// Remove every track from a playlist
    Clear(ClearOptions),

    /// Handle saved routines
    Routines(RoutinesOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct UsersOptions {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UsersSubcommand {
    /// Register a user from a library snapshot
    Add(UsersAddOpts),
    /// List registered users
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct UsersAddOpts {
    pub name: String,

    /// JSON library snapshot to import
    #[clap(long)]
    pub snapshot: PathBuf,

    /// Replace an existing user of the same name
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    pub user: String,
}

/// Options shared by every program command.
#[derive(Args, Debug, Clone)]
pub struct TargetOpts {
    /// User owning the target playlist
    #[clap(long)]
    pub user: String,

    /// Id of the target playlist
    #[clap(long, conflicts_with = "create", required_unless_present = "create")]
    pub target: Option<String>,

    /// Create a new target playlist with this title
    #[clap(long)]
    pub create: Option<String>,

    /// Write even if the target playlist is not empty
    #[clap(long)]
    pub force: bool,

    /// Save as a routine with this name instead of running
    #[clap(long)]
    pub save: Option<String>,

    /// Description of the saved routine
    #[clap(long, requires = "save")]
    pub desc: Option<String>,
}

impl TargetOpts {
    fn target_playlist(&self) -> String {
        self.target.clone().unwrap_or_default()
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            force: self.force,
            create: self.create.clone(),
            save: self.save.clone(),
            desc: self.desc.clone(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsProgramOptions {
    /// Source playlist id; can be repeated
    #[clap(long = "source", required = true, num_args = 1)]
    pub sources: Vec<String>,

    #[command(flatten)]
    pub target: TargetOpts,
}

impl PlaylistsProgramOptions {
    fn parameters(&self) -> PlaylistsParameters {
        PlaylistsParameters {
            name: self.target.user.clone(),
            source_playlists: self.sources.clone(),
            target_playlist: self.target.target_playlist(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AdvancedOptions {
    /// Source playlist id; can be repeated
    #[clap(long = "source", required = true, num_args = 1)]
    pub sources: Vec<String>,

    /// all, shortest_playlist or a number of tracks per source
    #[clap(long, default_value = "all")]
    pub sample_size: SampleSize,

    /// random or in_order
    #[clap(long, default_value = "in_order")]
    pub sample_method: SampleMethod,

    /// interleaved, concatenated or shuffled
    #[clap(long, default_value = "concatenated")]
    pub combination_method: CombinationMethod,

    /// update or overwrite
    #[clap(long, default_value = "update")]
    pub write_method: WriteMethod,

    #[command(flatten)]
    pub target: TargetOpts,
}

#[derive(Parser, Debug, Clone)]
pub struct BlendOptions {
    /// User whose home feed is sampled; can be repeated
    #[clap(long = "with", required = true, num_args = 1)]
    pub source_users: Vec<String>,

    /// Number of tracks in the blend
    #[clap(long, default_value_t = DEFAULT_BLEND_LENGTH)]
    pub length: usize,

    #[command(flatten)]
    pub target: TargetOpts,
}

#[derive(Parser, Debug, Clone)]
pub struct ClearOptions {
    #[clap(long)]
    pub user: String,

    #[clap(long)]
    pub target: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RoutinesOptions {
    #[command(subcommand)]
    pub command: RoutinesSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RoutinesSubcommand {
    /// List saved routines
    List,
    /// Remove a saved routine
    Remove { name: String },
    /// Run a saved routine
    Run { name: String },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings.with_debug(cli.verbose),
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    let log_path = cli.log.clone().unwrap_or_else(|| settings.log_path());
    let _guard = match logging::init(&settings, &log_path) {
        Ok(guard) => guard,
        Err(e) => error!("Cannot open log file {}. Err: {}", log_path.display(), e),
    };

    match cli.command {
        Command::Users(opt) => match opt.command {
            UsersSubcommand::Add(a) => cli::add_user(&settings, &a.name, &a.snapshot, a.force).await,
            UsersSubcommand::List => cli::list_users(&settings).await,
        },

        Command::Playlists(opt) => cli::list_playlists(&settings, &opt.user).await,

        Command::Mixtape(opt) => {
            let program = Program::Mixtape(opt.parameters());
            cli::run_program(&settings, program, opt.target.run_options()).await
        }
        Command::Compilation(opt) => {
            let program = Program::Compilation(opt.parameters());
            cli::run_program(&settings, program, opt.target.run_options()).await
        }
        Command::Advanced(opt) => {
            let program = Program::Advanced(AdvancedParameters {
                name: opt.target.user.clone(),
                source_playlists: opt.sources,
                target_playlist: opt.target.target_playlist(),
                sample_size: opt.sample_size,
                sample_method: opt.sample_method,
                combination_method: opt.combination_method,
                write_method: opt.write_method,
            });
            cli::run_program(&settings, program, opt.target.run_options()).await
        }
        Command::Blend(opt) => {
            let program = Program::Blend(BlendParameters {
                name: opt.target.user.clone(),
                source_users: opt.source_users,
                target_playlist: opt.target.target_playlist(),
                length: opt.length,
            });
            cli::run_program(&settings, program, opt.target.run_options()).await
        }

        Command::Clear(opt) => cli::clear_playlist(&settings, &opt.user, &opt.target).await,

        Command::Routines(opt) => match opt.command {
            RoutinesSubcommand::List => cli::list_routines(&settings).await,
            RoutinesSubcommand::Remove { name } => cli::remove_routine(&settings, &name).await,
            RoutinesSubcommand::Run { name } => cli::run_routine(&settings, &name).await,
        },

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use relsync::{cli, config, error, logging, utils};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Look up new releases for the artists of your music library
    Sync(SyncOptions),

    /// Show stored releases
    Releases(ReleasesOptions),

    /// Show the artists of your music library
    Artists(ArtistsOptions),

    /// Show or change sync preferences
    Prefs(PrefsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Ignore the last refresh and look back over the whole lookback period
    #[clap(long)]
    pub full: bool,

    /// Only sync when the next scheduled refresh has been reached
    #[clap(long)]
    pub if_due: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleasesOptions {
    /// Only releases of artists whose name contains this
    #[clap(long)]
    pub artist: Option<String>,

    /// Only releases on or after this date (YYYY-MM-DD)
    #[clap(long, value_parser = utils::parse_date_arg)]
    pub since: Option<chrono::NaiveDate>,

    /// Only releases dated after today
    #[clap(long)]
    pub upcoming: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Search for artists
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Show or change sync preferences")]
pub struct PrefsOptions {
    /// Subcommands under `prefs`; shows preferences when omitted
    #[command(subcommand)]
    pub command: Option<PrefsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PrefsSubcommand {
    /// Show preferences and sync history
    Show,

    /// Change preferences
    Set(PrefsSetOpts),

    /// Forget previous syncs so the next one is a full update
    Reset,
}

#[derive(Parser, Debug, Clone)]
pub struct PrefsSetOpts {
    /// Months to look back on a full update (0 = everything)
    #[clap(long)]
    pub lookback_months: Option<i32>,

    /// Include announced releases dated in the future
    #[clap(long, action = ArgAction::Set)]
    pub include_future: Option<bool>,

    /// Always do a full update instead of an incremental one
    #[clap(long, action = ArgAction::Set)]
    pub full_update: Option<bool>,

    /// Days between two scheduled syncs (used by `sync --if-due`)
    #[clap(long)]
    pub refresh_period_days: Option<u32>,
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
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Sync(opt) => cli::sync(opt.full, opt.if_due).await,
        Command::Releases(opt) => cli::list_releases(opt.artist, opt.since, opt.upcoming).await,
        Command::Artists(opt) => cli::list_artists(opt.search).await,
        Command::Prefs(opt) => match opt.command {
            Some(PrefsSubcommand::Set(s)) => {
                cli::set_preferences(cli::PreferenceChanges {
                    lookback_months: s.lookback_months,
                    include_future_releases: s.include_future,
                    full_update: s.full_update,
                    refresh_period_days: s.refresh_period_days,
                })
                .await
            }
            Some(PrefsSubcommand::Reset) => cli::reset_preferences().await,
            Some(PrefsSubcommand::Show) | None => cli::show_preferences().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

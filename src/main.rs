use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::Context;
use log::info;

use irrops_notify::notify::{self, MessageOptions};
use irrops_notify::policy::{self, Action};
use irrops_notify::source::{self, AirlineSource, Ana, Jal};
use irrops_notify::{Config, StateStore};

#[derive(Parser)]
#[command(
    name = "irrops-notify",
    about = "Posts ANA/JAL irregular flight operation changes to Slack"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check ANA's domestic flight status page
    Ana(SourceArgs),
    /// Check JAL's flight status page
    Jal(SourceArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Emoji shown as the bot's icon
    #[arg(long, default_value = ":airplane:")]
    icon: String,
    /// Display name the message is posted under
    #[arg(long, default_value = "irrops-notify")]
    username: String,
    /// Notify even when nothing changed since the last check
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load()?;
    match cli.command {
        Command::Ana(args) => run(&config, &Ana, &args),
        Command::Jal(args) => run(&config, &Jal, &args),
    }
}

fn run(config: &Config, source: &dyn AirlineSource, args: &SourceArgs) -> Result<()> {
    let key = source.source_key();
    let client = source::build_client(config).wrap_err("failed to build HTTP client")?;
    let store = StateStore::new(&config.state_dir);

    let raw = source::fetch(&client, source)?;
    let parsed = source.parse(&raw)?;
    let prior = store.load(key);

    let decision = policy::decide(
        parsed.has_irregularity,
        args.force,
        prior.as_ref(),
        &parsed.flight_infos,
        Utc::now(),
    );
    info!("{key}: {}", decision.action);

    if decision.action != Action::Suppress {
        let options = MessageOptions {
            username: &args.username,
            icon_emoji: &args.icon,
        };
        notify::send(
            &client,
            config,
            source,
            &decision,
            &parsed.update_time,
            &options,
        )
        .wrap_err_with(|| format!("notification for {key} failed"))?;
    }

    // Persisting only after the send keeps a failed delivery from being
    // recorded as already seen.
    if let Some(snapshot) = &decision.state_to_persist {
        store
            .save(key, snapshot)
            .wrap_err_with(|| format!("failed to persist state for {key}"))?;
    }

    Ok(())
}

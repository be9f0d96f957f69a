//! herald CLI
//!
//! Send deduplicated desktop notifications and show alert dialogs from the
//! command line.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use herald::{
    Alert, AlertPresenter, DialogPresenter, Icon, Journal, Notification, NotificationCenter,
    SuppressionFlag, TerminalPresenter,
};

#[derive(Parser)]
#[command(name = "herald")]
#[command(about = "Deduplicated desktop notifications and alert dialogs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a desktop notification
    Send {
        /// Logical notification id; repeated sends with the same id coalesce
        id: String,
        /// Title line
        title: String,
        /// Body text
        body: String,
        /// Icon name or image path
        #[arg(long)]
        icon: Option<String>,
        /// Allow several concurrently visible deliveries of this id
        #[arg(long)]
        spam: bool,
        /// Randomize the delivery identifier suffix
        #[arg(long)]
        randomize: bool,
        /// Deliver at this RFC3339 time instead of immediately
        #[arg(long)]
        at: Option<String>,
        /// Attach a key=value tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Add an action button with this title
        #[arg(long)]
        action_button: Option<String>,
        /// Add a close button with this title
        #[arg(long)]
        close_button: Option<String>,
        /// Add a reply button with this placeholder text
        #[arg(long)]
        reply_placeholder: Option<String>,
        /// Log the delivery instead of performing it
        #[arg(long)]
        dry_run: bool,
        /// Act as if the suppression flag were raised
        #[arg(long)]
        suppressed: bool,
        /// Record the delivery in the local journal
        #[arg(long)]
        journal: bool,
    },
    /// Show a modal alert and print the chosen button
    Alert {
        /// Title line
        title: String,
        /// Body text
        body: String,
        /// Alert severity
        #[arg(long, value_enum, default_value = "informational")]
        style: StyleArg,
        /// Button label (repeatable, at most three on native dialogs)
        #[arg(long = "button")]
        buttons: Vec<String>,
        /// Append Yes/No buttons
        #[arg(long)]
        yes_no: bool,
        /// Append Ok/Cancel buttons
        #[arg(long)]
        ok_cancel: bool,
        /// Prompt in the terminal instead of a native dialog
        #[arg(long)]
        terminal: bool,
    },
    /// Show recent journalled deliveries
    Recent {
        /// Number of records
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Journal directory (defaults to the user config dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Informational,
    Warning,
    Critical,
}

fn parse_tag(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("tag must be key=value, got '{raw}'"))?;
    Ok((key.to_string(), value.to_string()))
}

fn parse_icon(raw: &str) -> Icon {
    if raw.contains('/') || raw.contains('.') {
        Icon::Path(PathBuf::from(raw))
    } else {
        Icon::Named(raw.to_string())
    }
}

#[allow(clippy::too_many_arguments)]
fn build_notification(
    id: String,
    title: String,
    body: String,
    icon: Option<String>,
    spam: bool,
    randomize: bool,
    at: Option<String>,
    tags: Vec<String>,
    action_button: Option<String>,
    close_button: Option<String>,
    reply_placeholder: Option<String>,
) -> Result<Notification> {
    let mut note = Notification::new(id, title, body);
    note.allows_spam = spam;
    note.randomize_id = randomize;
    note.icon = icon.as_deref().map(parse_icon);
    note.action_button = action_button;
    note.close_button = close_button;
    note.reply_placeholder = reply_placeholder;

    if let Some(at) = at {
        let time: DateTime<Utc> = DateTime::parse_from_rfc3339(&at)
            .with_context(|| format!("invalid --at time '{at}', expected RFC3339"))?
            .with_timezone(&Utc);
        note.scheduled_time = Some(time);
    }

    if !tags.is_empty() {
        let mut map = BTreeMap::new();
        for raw in &tags {
            let (key, value) = parse_tag(raw)?;
            map.insert(key, value);
        }
        note.tags = Some(map);
    }

    Ok(note)
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=debug herald send ...
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("herald=info"));
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            id,
            title,
            body,
            icon,
            spam,
            randomize,
            at,
            tags,
            action_button,
            close_button,
            reply_placeholder,
            dry_run,
            suppressed,
            journal,
        } => {
            let note = build_notification(
                id,
                title,
                body,
                icon,
                spam,
                randomize,
                at,
                tags,
                action_button,
                close_button,
                reply_placeholder,
            )?;

            let suppression = SuppressionFlag::new();
            suppression.set(suppressed);

            let center = NotificationCenter::builder()
                .suppression(suppression)
                .dry_run(dry_run)
                .journal(journal)
                .build();

            match center.send(&note)? {
                Some(native) => {
                    println!("{}", native.identifier);
                    // Keep the process alive long enough for a deferred
                    // delivery to fire.
                    if let Some(at) = native.scheduled_time {
                        if let Ok(delay) = (at - Utc::now()).to_std() {
                            info!(delay_secs = delay.as_secs(), "Waiting for scheduled delivery");
                            tokio::time::sleep(delay + std::time::Duration::from_millis(200)).await;
                        }
                    }
                }
                None => eprintln!("suppressed, nothing sent"),
            }
            center.dispose();
        }
        Commands::Alert {
            title,
            body,
            style,
            buttons,
            yes_no,
            ok_cancel,
            terminal,
        } => {
            let mut alert = Alert::new(title, body);
            alert = match style {
                StyleArg::Informational => alert,
                StyleArg::Warning => alert.warning(),
                StyleArg::Critical => alert.critical(),
            };
            for label in buttons {
                alert = alert.adding_button(label);
            }
            if yes_no {
                alert = alert.yes_no();
            }
            if ok_cancel {
                alert = alert.ok_cancel();
            }

            let presenter: Box<dyn AlertPresenter> = if terminal {
                Box::new(TerminalPresenter::new())
            } else {
                Box::new(DialogPresenter::new())
            };

            let response = alert.present_with(presenter.as_ref())?;
            let label = alert
                .buttons
                .get(response.button_index())
                .map(|b| b.label.as_str())
                .unwrap_or("Ok");
            println!("{label}");
            if response.dismissed() {
                std::process::exit(1);
            }
        }
        Commands::Recent { count, json, dir } => {
            let journal = match dir {
                Some(dir) => Journal::at(dir),
                None => Journal::new(),
            };
            let records = journal.read_recent(count);

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("no journalled deliveries");
            } else {
                for record in records {
                    println!(
                        "{} {} -> {}{}",
                        record.ts.format("%Y-%m-%d %H:%M:%S"),
                        record.logical_id,
                        record.identifier,
                        if record.scheduled { " (scheduled)" } else { "" }
                    );
                }
            }
        }
    }

    Ok(())
}

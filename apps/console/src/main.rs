use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_config,
    review::{Reviewed, SectionContent},
    screens::{account::LoginForm, sponsors::SponsorDraft},
    AdminClient, ClientError, ClientEvent, GuardDecision, PitchSection, RecencyWindow,
    StatusFilter, View,
};
use shared::{
    domain::{AwardId, AwardStatus, EventId, MeetingId, PitchId, ReviewStatus, SponsorCategory, SponsorId, UserId},
    protocol::CreateBusinessRequest,
};
use tokio::sync::broadcast;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pitch-review", about = "Pitch competition admin console")]
struct Cli {
    /// Overrides the API base url from client.toml / PITCH_REVIEW_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Overrides the session database url.
    #[arg(long, global = true)]
    session_db: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Metrics,
    #[command(subcommand)]
    Pitches(PitchesCommand),
    #[command(subcommand)]
    Meetings(MeetingsCommand),
    #[command(subcommand)]
    Awards(AwardsCommand),
    Nominees {
        award_id: i64,
    },
    #[command(subcommand)]
    Businesses(BusinessesCommand),
    #[command(subcommand)]
    Personnel(PersonnelCommand),
    #[command(subcommand)]
    Sponsors(SponsorsCommand),
    #[command(subcommand)]
    Events(EventsCommand),
    /// Permanently deletes an account after verifying its credentials.
    DeleteAccount {
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// all, last-week, month or year.
    #[arg(long, default_value = "all")]
    window: RecencyWindow,
    /// all, pending, approved or declined.
    #[arg(long, default_value = "all")]
    status: StatusFilter,
}

#[derive(Subcommand, Debug)]
enum PitchesCommand {
    List(FilterArgs),
    Show {
        id: i64,
        #[arg(long, default_value = "personal")]
        section: PitchSection,
    },
    Review {
        id: i64,
        status: ReviewStatus,
    },
}

#[derive(Subcommand, Debug)]
enum MeetingsCommand {
    List(FilterArgs),
    Review { id: i64, status: ReviewStatus },
}

#[derive(Subcommand, Debug)]
enum AwardsCommand {
    List,
    Create {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Status {
        id: i64,
        status: AwardStatus,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum BusinessesCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        owner_name: String,
        #[arg(long, default_value = "")]
        owner_email: String,
        #[arg(long, default_value = "")]
        owner_phone: String,
        #[arg(long, default_value = "")]
        website: String,
    },
}

#[derive(Subcommand, Debug)]
enum PersonnelCommand {
    List,
    Add { email: String },
    Revoke { id: i64 },
}

#[derive(Subcommand, Debug)]
enum SponsorsCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "general")]
        category: SponsorCategory,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        website: String,
        #[arg(long)]
        event_id: Option<i64>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
    List,
    Delete { id: i64 },
}

impl Command {
    /// The dashboard view a command stands in for.
    fn view(&self) -> View {
        match self {
            Self::Login { .. } | Self::Logout => View::Login,
            Self::DeleteAccount { .. } => View::DeleteAccount,
            Self::Whoami | Self::Metrics => View::Dashboard,
            Self::Pitches(PitchesCommand::Show { id, section }) => View::PitchSection {
                pitch_id: PitchId(*id),
                section: *section,
            },
            Self::Pitches(_) => View::Pitches,
            Self::Meetings(_) => View::ScheduledMeetings,
            Self::Awards(_) => View::Awards,
            Self::Nominees { award_id } => View::Nominees {
                award_id: AwardId(*award_id),
            },
            Self::Businesses(_) => View::Businesses,
            Self::Personnel(_) => View::Personnel,
            Self::Sponsors(_) => View::Sponsors,
            Self::Events(_) => View::Events,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut config = load_config();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(db) = cli.session_db {
        config.session_db_url = client_core::config::normalize_session_db_url(&db);
    }

    let client = AdminClient::connect(&config)
        .await
        .context("failed to start client")?;
    let mut events = client.subscribe_events();

    let view = cli.command.view();
    if let GuardDecision::Redirect(target) = client.guard().check(view) {
        bail!(
            "{} requires a signed-in administrator; run `pitch-review login <email>` (redirected to {})",
            view.path(),
            target.path()
        );
    }

    let outcome = run(&client, cli.command).await;
    report_redirects(&mut events);
    outcome.map_err(|err| anyhow::anyhow!(err.user_message()))
}

fn report_redirects(events: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(ClientEvent::Redirect(view)) = events.try_recv() {
        match view {
            View::Login => eprintln!("session ended; please log in again"),
            View::AccessDenied => eprintln!("access denied; please use a desktop client"),
            other => debug!(path = %other.path(), "navigated"),
        }
    }
}

fn read_password(flag: Option<String>) -> Result<String, ClientError> {
    if let Some(password) = flag {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| ClientError::InvalidInput(format!("failed to read password: {e}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render output: {err}"),
    }
}

async fn run(client: &AdminClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Login { email, password } => {
            let password = read_password(password)?;
            let identity = client.account().login(&LoginForm::new(email, password)).await?;
            println!("signed in as {} <{}>", identity.full_name, identity.email);
        }
        Command::Logout => {
            client.account().logout().await;
            println!("signed out");
        }
        Command::Whoami => {
            let identity = client.account().refresh_identity().await?;
            println!("{} <{}> ({:?})", identity.full_name, identity.email, identity.role);
        }
        Command::Metrics => {
            let metrics = client.dashboard().load().await?;
            for (label, value) in metrics.totals().into_iter().chain(metrics.review_breakdown()) {
                println!("{label:>18}: {value}");
            }
        }
        Command::Pitches(command) => pitches(client, command).await?,
        Command::Meetings(command) => meetings(client, command).await?,
        Command::Awards(command) => awards(client, command).await?,
        Command::Nominees { award_id } => {
            for row in client.nominees(AwardId(award_id)).load().await? {
                println!("{:>4}  {:<32} {} votes", row.nominee.id, row.display_name, row.nominee.votes_count);
            }
        }
        Command::Businesses(command) => businesses(client, command).await?,
        Command::Personnel(command) => personnel(client, command).await?,
        Command::Sponsors(command) => sponsors(client, command).await?,
        Command::Events(EventsCommand::List) => print_json(&client.events().load().await?),
        Command::Events(EventsCommand::Delete { id }) => {
            client.events().delete(EventId(id)).await?;
            println!("event {id} deleted");
        }
        Command::DeleteAccount { email, password } => {
            let password = read_password(password)?;
            client.account().delete_account(&email, &password).await?;
            println!("account deleted");
        }
    }
    Ok(())
}

fn print_reviewed<T: Reviewed>(id: impl std::fmt::Display, who: Option<&str>, item: &T) {
    let review = item.review();
    println!(
        "{:>6}  {:<28} {:<10} {:<20} {}",
        id,
        who.unwrap_or("-"),
        review.map(|r| r.status_label()).unwrap_or("Unknown"),
        review.and_then(|r| r.reviewer_name.as_deref()).unwrap_or("-"),
        review.and_then(|r| r.updated_at.as_deref()).unwrap_or("-"),
    );
}

async fn pitches(client: &AdminClient, command: PitchesCommand) -> Result<(), ClientError> {
    let screen = client.pitches();
    match command {
        PitchesCommand::List(filters) => {
            screen.load().await?;
            screen.set_window(filters.window).await;
            screen.set_status_filter(filters.status).await;
            for pitch in screen.visible().await {
                let who = pitch.user.as_ref().and_then(|u| u.full_name.as_deref());
                print_reviewed(pitch.id, who, &pitch);
            }
        }
        PitchesCommand::Show { id, section } => {
            let step = client.pitch_section(PitchId(id), section);
            let view = step.load().await?;
            println!("{} (status: {})", section.title(), view.status_label());
            match &view.content {
                SectionContent::Personal(info) => print_json(info),
                SectionContent::Professional(info) => print_json(info),
                SectionContent::Competition(info) => print_json(info),
                SectionContent::Technical(info) => print_json(info),
            }
            if let Some(next) = step.next() {
                println!("next: {}", next.path());
            }
        }
        PitchesCommand::Review { id, status } => {
            screen.load().await?;
            screen.change_status(PitchId(id), status).await?;
            println!("pitch {id} marked {status}");
        }
    }
    Ok(())
}

async fn meetings(client: &AdminClient, command: MeetingsCommand) -> Result<(), ClientError> {
    let screen = client.meetings();
    screen.load().await?;
    match command {
        MeetingsCommand::List(filters) => {
            screen.set_window(filters.window).await;
            screen.set_status_filter(filters.status).await;
            for meeting in screen.visible().await {
                let who = meeting.user.as_ref().and_then(|u| u.full_name.as_deref());
                print_reviewed(meeting.id, who, &meeting);
            }
        }
        MeetingsCommand::Review { id, status } => {
            screen.change_status(MeetingId(id), status).await?;
            println!("meeting {id} marked {status}");
        }
    }
    Ok(())
}

async fn awards(client: &AdminClient, command: AwardsCommand) -> Result<(), ClientError> {
    let screen = client.awards();
    match command {
        AwardsCommand::List => {
            for award in screen.load().await? {
                let status = award.status.map(AwardStatus::as_str).unwrap_or("-");
                println!("{:>4}  {:<32} {}", award.id, award.title, status);
            }
        }
        AwardsCommand::Create { title, description } => {
            screen.create(&title, &description).await?;
            println!("award created");
        }
        AwardsCommand::Status { id, status } => {
            screen.set_status(AwardId(id), status).await?;
            println!("award {id} is now {status}");
        }
        AwardsCommand::Delete { id } => {
            screen.delete(AwardId(id)).await?;
            println!("award {id} deleted");
        }
    }
    Ok(())
}

async fn businesses(client: &AdminClient, command: BusinessesCommand) -> Result<(), ClientError> {
    let screen = client.businesses();
    match command {
        BusinessesCommand::List => print_json(&screen.load().await?),
        BusinessesCommand::Create {
            name,
            description,
            owner_name,
            owner_email,
            owner_phone,
            website,
        } => {
            screen
                .create(&CreateBusinessRequest {
                    business_name: name,
                    business_description: description,
                    business_owner_name: owner_name,
                    business_owner_email: owner_email,
                    business_owner_phone: owner_phone,
                    website,
                    logo: String::new(),
                })
                .await?;
            println!("business created");
        }
    }
    Ok(())
}

async fn personnel(client: &AdminClient, command: PersonnelCommand) -> Result<(), ClientError> {
    let screen = client.personnel();
    let admins = match command {
        PersonnelCommand::List => screen.load().await?,
        PersonnelCommand::Add { email } => screen.add(&email).await?,
        PersonnelCommand::Revoke { id } => screen.revoke(UserId(id)).await?,
    };
    for admin in admins {
        println!("{:>4}  {:<28} {}", admin.id, admin.full_name, admin.email);
    }
    Ok(())
}

async fn sponsors(client: &AdminClient, command: SponsorsCommand) -> Result<(), ClientError> {
    let screen = client.sponsors();
    match command {
        SponsorsCommand::List => print_json(&screen.load().await?),
        SponsorsCommand::Create {
            name,
            category,
            description,
            website,
            event_id,
        } => {
            screen
                .create(SponsorDraft {
                    name,
                    category,
                    description,
                    website,
                    event_id: event_id.map(EventId),
                    image: None,
                })
                .await?;
            println!("sponsor created");
        }
        SponsorsCommand::Delete { id } => {
            screen.delete(SponsorId(id)).await?;
            println!("sponsor {id} deleted");
        }
    }
    Ok(())
}

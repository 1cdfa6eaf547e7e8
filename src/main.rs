use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_portal::config::Config;
use rust_portal::http_client::{ApiTransport, HttpClient};
use rust_portal::models::{MemberRole, Notification, Organization, OrganizationMember};
use rust_portal::services::{NotificationService, OrganizationService};
use rust_portal::toast::{ToastKind, Toaster};
use rust_portal::views::{
    Confirm, LoadOutcome, NotificationDropdown, NotificationFilter, NotificationsPage,
    OrganizationDetail, OrganizationsPage,
};

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Notifications inbox and organization management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (overrides API_BASE_URL)
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Bearer token (overrides API_TOKEN)
    #[arg(short, long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Notifications(NotificationCommands),
    #[command(subcommand)]
    Orgs(OrgCommands),
}

#[derive(Subcommand)]
enum NotificationCommands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        unread: bool,
    },
    Read {
        id: String,
    },
    ReadAll,
    UnreadCount,
    Delete {
        id: String,
    },
    /// Print the unread count whenever it changes
    Watch,
}

#[derive(Subcommand)]
enum OrgCommands {
    List,
    Show {
        id: String,
    },
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    Members {
        id: String,
    },
    Invite {
        id: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, default_value = "MEMBER")]
        role: MemberRole,
    },
    SetRole {
        id: String,
        member_id: String,
        role: MemberRole,
    },
    Remove {
        id: String,
        member_id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

struct StdinConfirm {
    assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

fn flush_toasts(toaster: &Toaster) {
    for toast in toaster.visible() {
        match toast.kind {
            ToastKind::Error => eprintln!("error: {}", toast.message),
            _ => eprintln!("{}", toast.message),
        }
        toaster.dismiss(toast.id);
    }
}

fn print_notification(n: &Notification) {
    println!(
        "{} {} [{}] {} - {} ({})",
        if n.read { " " } else { "*" },
        n.id,
        n.kind,
        n.title,
        n.message,
        n.created_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_organization(org: &Organization) {
    let counts = org.counts.unwrap_or_default();
    println!(
        "{}  {}  members={} proposals={} contracts={}  created {}",
        org.id,
        org.name,
        counts.members,
        counts.proposals,
        counts.contracts,
        org.created_at.format("%Y-%m-%d")
    );
    if let Some(description) = org.description.as_deref().filter(|d| !d.is_empty()) {
        println!("    {}", description);
    }
}

fn print_member(m: &OrganizationMember) {
    println!(
        "{}  {:<7} {} <{}>  joined {}",
        m.id,
        m.role,
        m.user.display_name(),
        m.user.email,
        m.joined_at.format("%Y-%m-%d")
    );
}

async fn run_notifications(
    command: NotificationCommands,
    transport: Arc<dyn ApiTransport>,
    toaster: &Toaster,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = NotificationService::new(transport);

    match command {
        NotificationCommands::List { page, unread } => {
            let mut view =
                NotificationsPage::new(service, toaster.clone(), config.notifications_page_size);
            // Total pages are only known after the first load.
            view.load().await?;
            view.go_to_page(page).await?;
            if unread {
                view.set_filter(NotificationFilter::Unread).await?;
            }
            for n in view.visible() {
                print_notification(n);
            }
            println!(
                "page {}/{} ({} total, {} unread on this page)",
                view.page(),
                view.pager().total_pages(),
                view.total(),
                view.unread_on_page()
            );
        }
        NotificationCommands::Read { id } => {
            let mut view =
                NotificationDropdown::new(service, toaster.clone(), config.dropdown_page_size);
            view.mark_as_read(&id).await?;
            println!("unread: {}", view.unread_count());
        }
        NotificationCommands::ReadAll => {
            let mut view =
                NotificationDropdown::new(service, toaster.clone(), config.dropdown_page_size);
            view.mark_all_as_read().await?;
        }
        NotificationCommands::UnreadCount => {
            println!("{}", service.get_unread_count().await?);
        }
        NotificationCommands::Delete { id } => {
            let mut view =
                NotificationDropdown::new(service, toaster.clone(), config.dropdown_page_size);
            view.delete(&id).await?;
            println!("unread: {}", view.unread_count());
        }
        NotificationCommands::Watch => {
            let view = NotificationDropdown::mount(service, toaster.clone(), config);
            let mut counts = view.unread_stream();
            tracing::info!(
                "Watching unread count every {:?}, Ctrl-C to stop",
                config.unread_poll_interval()
            );
            loop {
                tokio::select! {
                    count = counts.next() => match count {
                        Some(count) => println!("unread: {}", count),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}

async fn run_orgs(
    command: OrgCommands,
    transport: Arc<dyn ApiTransport>,
    toaster: &Toaster,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = OrganizationService::new(transport);

    match command {
        OrgCommands::List => {
            let mut view = OrganizationsPage::new(service, toaster.clone());
            view.load().await?;
            view.organizations().iter().for_each(print_organization);
        }
        OrgCommands::Show { id } | OrgCommands::Members { id } => {
            let mut view = OrganizationDetail::new(service.clone(), toaster.clone(), id);
            match view.load().await {
                LoadOutcome::Ready => {
                    if let Some(org) = view.organization() {
                        print_organization(org);
                    }
                    view.members().iter().for_each(print_member);
                }
                LoadOutcome::Redirect(_) => {
                    flush_toasts(toaster);
                    let mut list = OrganizationsPage::new(service, toaster.clone());
                    list.load().await?;
                    list.organizations().iter().for_each(print_organization);
                }
            }
        }
        OrgCommands::Create { name, description } => {
            let mut view = OrganizationsPage::new(service, toaster.clone());
            view.open_create();
            view.form_mut().name = name;
            view.form_mut().description = description;
            let org = view.submit_create().await?;
            print_organization(&org);
        }
        OrgCommands::Update {
            id,
            name,
            description,
        } => {
            let mut view = OrganizationDetail::new(service, toaster.clone(), id);
            if let LoadOutcome::Redirect(_) = view.load().await {
                return Ok(());
            }
            view.open_edit();
            if let Some(name) = name {
                view.edit_form_mut().name = name;
            }
            if let Some(description) = description {
                view.edit_form_mut().description = description;
            }
            view.submit_edit().await?;
            if let Some(org) = view.organization() {
                print_organization(org);
            }
        }
        OrgCommands::Delete { id, yes } => {
            let mut view = OrganizationsPage::new(service, toaster.clone());
            view.load().await?;
            view.delete(&id, &StdinConfirm { assume_yes: yes }).await?;
        }
        OrgCommands::Invite { id, email, role } => {
            let mut view = OrganizationDetail::new(service, toaster.clone(), id);
            if let LoadOutcome::Redirect(_) = view.load().await {
                return Ok(());
            }
            view.open_invite();
            view.invite_form_mut().email = email;
            view.invite_form_mut().role = role;
            view.submit_invite().await?;
            view.members().iter().for_each(print_member);
        }
        OrgCommands::SetRole {
            id,
            member_id,
            role,
        } => {
            let mut view = OrganizationDetail::new(service, toaster.clone(), id);
            if let LoadOutcome::Redirect(_) = view.load().await {
                return Ok(());
            }
            view.change_role(&member_id, role).await?;
            view.members().iter().for_each(print_member);
        }
        OrgCommands::Remove { id, member_id, yes } => {
            let mut view = OrganizationDetail::new(service, toaster.clone(), id);
            if let LoadOutcome::Redirect(_) = view.load().await {
                return Ok(());
            }
            view.remove_member(&member_id, &StdinConfirm { assume_yes: yes })
                .await?;
            view.members().iter().for_each(print_member);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_portal=info,portal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration, flags win over the environment
    let mut config = Config::from_env_with_base_url(cli.url)?;
    if let Some(token) = cli.token {
        config.api_token = Some(token);
    }

    tracing::debug!("Using API at {}", config.api_base_url);

    let transport: Arc<dyn ApiTransport> = Arc::new(HttpClient::new(&config)?);
    let toaster = Toaster::new();

    let result = match cli.command {
        Commands::Notifications(command) => {
            run_notifications(command, transport, &toaster, &config).await
        }
        Commands::Orgs(command) => run_orgs(command, transport, &toaster).await,
    };

    flush_toasts(&toaster);
    result
}

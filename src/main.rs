use std::io::{BufRead, Write};
use std::path::Path;

use chrono::Utc;

use goaltrack::api::ApiClient;
use goaltrack::config::{GoalTrackConfig, default_config_path};
use goaltrack::core::item::ItemId;
use goaltrack::core::project::NewProject;
use goaltrack::core::view::SortKey;
use goaltrack::message::{Command, Effect, GoalsMessage, Message, ProjectsMessage, SignupMessage};
use goaltrack::runtime;
use goaltrack::storage::ClientStore;
use goaltrack::views::shell::{ActiveView, Shell};
use goaltrack::views::signup::SignupForm;
use goaltrack::views::{goals, projects};

const USAGE: &str = "\
usage: goaltrack [COMMAND]

  (no command)                    show the last active view
  goals [--sort KEY] [--search TEXT]
  goals delete ID
  projects [--search TEXT]
  projects delete ID
  projects create TITLE IMAGE
  signup NAME EMAIL PASSWORD
  token set TOKEN | token clear
  view [home|projects]

sort keys: newest, oldest, due_date, priority, completed";

fn init_logging(config: &GoalTrackConfig) {
    // Crate targets at info/debug (per config), everything else at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("goaltrack") {
                let max = if goaltrack::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    goaltrack::set_debug_logging(config.debug_logging);

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("goaltrack".to_string()),
        Err(e) => {
            eprintln!("journal logging unavailable: {}", e);
            return;
        }
    };
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Run commands until the view settles. Banner dismissals are skipped: the
/// process exits long before the banner window would close.
async fn settle(api: &ApiClient, shell: &mut Shell, mut next: Option<Command>) {
    while let Some(command) = next.take() {
        if matches!(command.effect, Effect::DismissStatus(..)) {
            break;
        }
        next = match runtime::perform(api, command).await {
            Some(message) => shell.update(message),
            None => None,
        };
    }
}

fn print_goals(shell: &Shell) {
    let view = shell.goals();
    if let Some(err) = view.state().error() {
        println!("Error: {}", err);
        return;
    }
    if let Some(status) = view.status_message() {
        println!("** {} **", status);
    }
    let cards = view.cards(Utc::now());
    if cards.is_empty() {
        println!("No goals.");
    }
    for card in cards {
        println!(
            "[{}] {}{}\n    {}/{} {}  {}% ({})  {}\n    created {}  due {}",
            card.id,
            card.title,
            if card.completed { " (completed)" } else { "" },
            card.current_value,
            card.target_value,
            card.unit,
            card.progress,
            card.tier.as_str(),
            card.due_label,
            card.created,
            card.due,
        );
    }
}

fn print_projects(shell: &Shell, upload_base: &str) {
    let view = shell.projects();
    if let Some(err) = view.state().error() {
        println!("Error: {}", err);
        return;
    }
    if let Some(status) = view.status_message() {
        println!("** {} **", status);
    }
    let cards = view.cards(upload_base);
    if cards.is_empty() {
        println!("No projects.");
    }
    for card in cards {
        println!("[{}] {}\n    {}", card.id, card.title, card.image_url);
    }
}

/// Make `view` active and wait for its load.
async fn open(api: &ApiClient, shell: &mut Shell, view: ActiveView) {
    // an already-active view still needs its first mount in this process
    let command = if shell.active() == view {
        shell.select_view(view);
        Some(shell.start())
    } else {
        shell.select_view(view)
    };
    settle(api, shell, command).await;
}

async fn goals_command(api: &ApiClient, shell: &mut Shell, args: &[String]) -> Result<(), String> {
    open(api, shell, ActiveView::Home).await;

    if args.first().map(String::as_str) == Some("delete") {
        let id = args.get(1).ok_or("goals delete needs an ID")?;
        shell.update(Message::Goals(GoalsMessage::DeleteClicked(ItemId::from(id.as_str()))));
        let answer = if confirm(goals::DELETE_PROMPT) {
            GoalsMessage::ConfirmDelete
        } else {
            GoalsMessage::CancelDelete
        };
        let command = shell.update(Message::Goals(answer));
        settle(api, shell, command).await;
    } else {
        if let Some(sort) = flag_value(args, "--sort") {
            let key: SortKey = sort.parse()?;
            let command = shell.update(Message::Goals(GoalsMessage::SortChanged(key)));
            settle(api, shell, command).await;
        }
        if let Some(search) = flag_value(args, "--search") {
            shell.update(Message::Goals(GoalsMessage::SearchChanged(search)));
        }
    }

    print_goals(shell);
    Ok(())
}

async fn projects_command(api: &ApiClient, shell: &mut Shell, args: &[String]) -> Result<(), String> {
    open(api, shell, ActiveView::Projects).await;

    match args.first().map(String::as_str) {
        Some("delete") => {
            let id = args.get(1).ok_or("projects delete needs an ID")?;
            shell.update(Message::Projects(ProjectsMessage::DeleteClicked(ItemId::from(id.as_str()))));
            let answer = if confirm(projects::DELETE_PROMPT) {
                ProjectsMessage::ConfirmDelete
            } else {
                ProjectsMessage::CancelDelete
            };
            let command = shell.update(Message::Projects(answer));
            settle(api, shell, command).await;
        }
        Some("create") => {
            let title = args.get(1).ok_or("projects create needs a TITLE")?;
            let image = args.get(2).ok_or("projects create needs an IMAGE path")?;
            let bytes = std::fs::read(image).map_err(|e| format!("Failed to read {}: {}", image, e))?;
            let name = Path::new(image)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_string();

            shell.update(Message::Projects(ProjectsMessage::ToggleCreateForm));
            let payload = NewProject::new(title.as_str(), name, bytes);
            let command = shell.update(Message::Projects(ProjectsMessage::CreateSubmitted(payload)));
            settle(api, shell, command).await;
            if let Some(err) = shell.projects().create_error() {
                return Err(err.to_string());
            }
        }
        _ => {
            if let Some(search) = flag_value(args, "--search") {
                shell.update(Message::Projects(ProjectsMessage::SearchChanged(search)));
            }
        }
    }

    print_projects(shell, &api.upload_base());
    Ok(())
}

async fn signup_command(api: &ApiClient, args: &[String]) -> Result<(), String> {
    let field = |i: usize| args.get(i).cloned().unwrap_or_default();
    let mut form = SignupForm::new();
    form.update(SignupMessage::NameChanged(field(0)));
    form.update(SignupMessage::EmailChanged(field(1)));
    form.update(SignupMessage::PasswordChanged(field(2)));

    let mut next = form.update(SignupMessage::Submit);
    while let Some(command) = next.take() {
        next = match runtime::perform(api, command).await {
            Some(Message::Signup(msg)) => form.update(msg),
            _ => None,
        };
    }

    if form.should_navigate_to_login() {
        println!("Account created. Log in to continue.");
        Ok(())
    } else {
        Err(form.error().unwrap_or("Account could not be created.").to_string())
    }
}

fn token_command(store: &mut ClientStore, args: &[String]) -> Result<(), String> {
    match (args.first().map(String::as_str), args.get(1)) {
        (Some("set"), Some(token)) => {
            store.set_auth_token(Some(token.as_str()));
            println!("Token saved.");
        }
        (Some("clear"), _) => {
            store.set_auth_token(None);
            println!("Token cleared.");
        }
        _ => return Err("usage: goaltrack token set TOKEN | token clear".to_string()),
    }
    Ok(())
}

async fn show_active(api: &ApiClient, shell: &mut Shell) {
    let command = shell.start();
    settle(api, shell, Some(command)).await;
    println!("== {} ==", shell.active());
    match shell.active() {
        ActiveView::Home => print_goals(shell),
        ActiveView::Projects => print_projects(shell, &api.upload_base()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GoalTrackConfig::load(&default_config_path());
    init_logging(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let api = ApiClient::from_config(&config)?;
    let mut store = ClientStore::open(&config.state_file);
    let rest = args.get(1..).unwrap_or_default();

    match args.first().map(String::as_str) {
        None => {
            let mut shell = Shell::new(store);
            show_active(&api, &mut shell).await;
        }
        Some("goals") => {
            let mut shell = Shell::new(store);
            goals_command(&api, &mut shell, rest).await?;
        }
        Some("projects") => {
            let mut shell = Shell::new(store);
            projects_command(&api, &mut shell, rest).await?;
        }
        Some("signup") => signup_command(&api, rest).await?,
        Some("token") => token_command(&mut store, rest)?,
        Some("view") => match rest.first() {
            Some(name) => {
                let view = ActiveView::from_name(name).ok_or_else(|| format!("unknown view: {}", name))?;
                store.set_active_view(view.as_str());
                println!("Active view: {}", view);
            }
            None => println!("Active view: {}", ActiveView::from_stored(store.active_view())),
        },
        Some(other) => {
            eprintln!("unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

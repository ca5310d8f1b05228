use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use trainer_auth::{
    authentication::AuthenticationServiceFactory,
    models::{AuthResult, NewWorkoutSession},
    platform::ConsoleNavigator,
    session::SessionManager,
    settings::TrainerSettings,
    workouts::WorkoutsApi,
};

#[derive(Parser)]
#[command(author, version, about = "Manage the trainer account session", long_about = None)]
struct Cli {
    /// URL the app was opened with, e.g. an email or OAuth redirect
    #[arg(long, global = true)]
    launch_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Show the current session")]
    Status,
    #[command(about = "Sign in with email and password", alias = "login")]
    SignIn {
        #[arg(long, required = true)]
        email: String,
        #[arg(long, required = true)]
        password: String,
        /// Do not keep the session after this command
        #[arg(long)]
        forget: bool,
    },
    #[command(about = "Create an account")]
    SignUp {
        #[arg(long, required = true)]
        name: String,
        #[arg(long, required = true)]
        email: String,
        #[arg(long, required = true)]
        password: String,
    },
    #[command(about = "Send a password reset email")]
    ResetPassword {
        #[arg(long, required = true)]
        email: String,
        #[arg(long)]
        redirect_to: Option<String>,
    },
    #[command(about = "Continue with Google")]
    Google {
        #[arg(long)]
        redirect_to: Option<String>,
    },
    #[command(about = "Complete sign-in from a redirect URL")]
    Redirect {
        #[arg(required = true)]
        url: String,
    },
    #[command(about = "Sign out and forget the stored session", alias = "logout")]
    SignOut,
    #[command(subcommand, about = "Workout sessions of the signed-in user")]
    Workouts(WorkoutsCommand),
}

#[derive(Subcommand)]
enum WorkoutsCommand {
    #[command(about = "List workout sessions, newest first", alias = "ls")]
    List,
    #[command(about = "Record a workout session")]
    Add {
        #[arg(long, required = true)]
        title: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        calories: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = TrainerSettings::load().map_err(|e| anyhow::anyhow!("Failed to load settings: {e}"))?;

    let navigator = Arc::new(ConsoleNavigator::new(settings.auth.platform, cli.launch_url));
    let services = AuthenticationServiceFactory::create(&settings, navigator)
        .context("Failed to initialize authentication services")?;
    let manager = services.manager;

    manager.hydrate().await;

    match cli.command {
        Command::Status => print_status(&manager),
        Command::SignIn {
            email,
            password,
            forget,
        } => report(manager.sign_in(&email, &password, !forget).await)?,
        Command::SignUp { name, email, password } => report(manager.sign_up(&name, &email, &password).await)?,
        Command::ResetPassword { email, redirect_to } => {
            report(manager.request_password_reset(&email, redirect_to.as_deref()).await)?;
        }
        Command::Google { redirect_to } => report(manager.continue_with_google(redirect_to.as_deref()).await)?,
        Command::Redirect { url } => {
            if !manager.handle_incoming_url(&url).await {
                bail!("The link did not contain a usable session");
            }
            print_status(&manager);
        }
        Command::SignOut => {
            manager.sign_out().await;
            println!("Signed out");
        }
        Command::Workouts(command) => run_workouts(&manager, &services.workouts, command).await?,
    }

    manager.flush_background_tasks().await;
    Ok(())
}

fn report(result: AuthResult) -> anyhow::Result<()> {
    if let Some(error) = result.error.filter(|_| !result.ok) {
        bail!(error);
    }
    if let Some(message) = result.message {
        println!("{message}");
    } else {
        println!("✓ Done");
    }
    Ok(())
}

fn print_status(manager: &SessionManager) {
    if !manager.is_backend_configured() {
        println!("Backend: not configured");
    }
    match manager.user() {
        Some(user) => println!("Signed in as {} <{}> ({})", user.name, user.email, user.id),
        None => println!("Not signed in"),
    }
}

async fn run_workouts(manager: &SessionManager, api: &WorkoutsApi, command: WorkoutsCommand) -> anyhow::Result<()> {
    let (Some(user), Some(token)) = (manager.user(), manager.access_token()) else {
        bail!("Sign in first");
    };

    match command {
        WorkoutsCommand::List => {
            let sessions = api.list(&token, &user.id).await.context("Failed to list workouts")?;
            if sessions.is_empty() {
                println!("No workouts recorded yet");
            }
            for session in sessions {
                let minutes = session
                    .duration_minutes
                    .map_or_else(String::new, |m| format!(" · {m} min"));
                let calories = session
                    .calories_burned
                    .map_or_else(String::new, |c| format!(" · {c} kcal"));
                println!(
                    "{}  {}{minutes}{calories}",
                    session.started_at.format("%Y-%m-%d %H:%M"),
                    session.title
                );
            }
        }
        WorkoutsCommand::Add {
            title,
            notes,
            minutes,
            calories,
        } => {
            let workout = NewWorkoutSession {
                notes,
                duration_minutes: minutes,
                calories_burned: calories,
                ..NewWorkoutSession::titled(title)
            };
            let created = api.create(&token, &workout).await.context("Failed to record workout")?;
            println!("Recorded workout {} ({})", created.title, created.id);
        }
    }
    Ok(())
}

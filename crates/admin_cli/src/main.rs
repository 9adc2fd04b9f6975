use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{CityNew, CurrencyNew, Engine, EngineError, Role, UserNew};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "tourbook_admin")]
#[command(about = "Admin utilities for Tourbook (bootstrap accounts and reference data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./tourbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Insert the default currencies, countries, cities and languages.
    Seed(SeedArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create an account, prompting for the password.
    Create(UserCreateArgs),
    /// Grant the admin role to an existing account.
    Promote(UserEmailArgs),
    /// Revoke the admin role.
    Demote(UserEmailArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    admin: bool,
}

#[derive(Args, Debug)]
struct UserEmailArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Admin account the records are created as. Promoted if needed.
    #[arg(long)]
    admin: String,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn notice(message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.chars().count() < MIN_PASSWORD_LEN {
            notice(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ))?;
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }
        notice("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Treat an already existing record as success so seeding can be rerun.
fn skip_existing<T>(
    label: &str,
    result: Result<T, EngineError>,
) -> Result<Option<T>, EngineError> {
    match result {
        Ok(value) => {
            println!("created {label}");
            Ok(Some(value))
        }
        Err(EngineError::ExistingKey(key)) => {
            println!("skipped {label}: {key} already exists");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

async fn seed(engine: &Engine, admin_email: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let admin = engine.set_user_role(admin_email, Role::Admin).await?;

    for (code, name, symbol, minor_units) in [
        ("USD", "US Dollar", "$", 2),
        ("EUR", "Euro", "€", 2),
        ("ARS", "Peso argentino", "$", 2),
    ] {
        let cmd = CurrencyNew {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            minor_units,
        };
        skip_existing(
            &format!("currency {code}"),
            engine.create_currency(cmd, admin.id).await,
        )?;
    }

    for (code, name) in [("es", "Español"), ("en", "English"), ("pt", "Português")] {
        skip_existing(
            &format!("language {code}"),
            engine.create_language(code, name, admin.id).await,
        )?;
    }

    let country = match skip_existing(
        "country AR",
        engine.create_country("AR", "Argentina", admin.id).await,
    )? {
        Some(country) => country,
        None => {
            println!("country AR exists, leaving its cities untouched");
            return Ok(());
        }
    };
    for name in ["Buenos Aires", "Bariloche", "Ushuaia", "Mendoza"] {
        let cmd = CityNew {
            country_id: country.id,
            region_id: None,
            name: name.to_string(),
        };
        skip_existing(&format!("city {name}"), engine.create_city(cmd, admin.id).await)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter("tourbook_admin=info,engine=info")
        .init();

    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;
            let role = if args.admin {
                Role::Admin
            } else {
                Role::Traveler
            };

            match engine
                .register_user(UserNew::new(&args.email, &args.name, password).role(role))
                .await
            {
                Ok(user) => println!("created user: {} ({})", user.email, user.id),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.email);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::User(User {
            command: UserCommand::Promote(args),
        }) => {
            let user = engine.set_user_role(&args.email, Role::Admin).await?;
            println!("{} is now an admin", user.email);
        }
        Command::User(User {
            command: UserCommand::Demote(args),
        }) => {
            let user = engine.set_user_role(&args.email, Role::Traveler).await?;
            println!("{} is now a traveler", user.email);
        }
        Command::Seed(args) => seed(&engine, &args.admin).await?,
    }

    Ok(())
}

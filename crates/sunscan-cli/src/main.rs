// crates/sunscan-cli/src/main.rs
// ============================================================================
// Module: Sunscan CLI Entry Point
// Description: Command dispatcher for the analysis-history client workflows.
// Purpose: Provide a safe, localized CLI over the typed API client.
// Dependencies: clap, sunscan-client, sunscan-config, sunscan-core, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The Sunscan CLI wraps the typed API client: account registration and
//! login, profile management, paged history listings, single-record detail
//! fetches, model metadata, and an end-to-end smoke flow that walks the
//! login, history, pagination, and detail paths in order. All user-facing
//! strings are routed through the i18n catalog to prepare for future
//! localization. Server responses are untrusted and validated by the client
//! crate before anything is printed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use sunscan_cli::i18n::Locale;
use sunscan_cli::i18n::set_locale;
use sunscan_cli::t;
use sunscan_client::ApiClient;
use sunscan_client::ApiClientConfig;
use sunscan_client::ApiError;
use sunscan_client::Session;
use sunscan_config::SunscanConfig;
use sunscan_core::AccountAge;
use sunscan_core::AnalysisDetail;
use sunscan_core::AnalysisId;
use sunscan_core::AnalysisRecord;
use sunscan_core::Confidence;
use sunscan_core::EmailAddress;
use sunscan_core::HistoryPage;
use sunscan_core::PageRequest;
use sunscan_core::Password;
use sunscan_core::SessionToken;
use sunscan_core::UserAccount;
use sunscan_core::UserId;
use sunscan_core::Username;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "SUNSCAN_LANG";
/// Environment variable holding the account password.
const PASSWORD_ENV: &str = "SUNSCAN_PASSWORD";
/// Environment variable holding a bearer token.
const TOKEN_ENV: &str = "SUNSCAN_TOKEN";
/// Maximum size of a token file in bytes.
const MAX_TOKEN_FILE_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "sunscan", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `SUNSCAN_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Locale values accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl LangArg {
    /// Maps the CLI value onto a catalog locale.
    const fn locale(self) -> Locale {
        match self {
            Self::En => Locale::En,
            Self::Ca => Locale::Ca,
        }
    }
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new account.
    Register(RegisterCommand),
    /// Authenticate and obtain a bearer token.
    Login(LoginCommand),
    /// Profile management utilities.
    Profile {
        /// Selected profile subcommand.
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Account listing utilities.
    Users {
        /// Selected users subcommand.
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Prediction history utilities.
    History {
        /// Selected history subcommand.
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Model metadata utilities.
    Model {
        /// Selected model subcommand.
        #[command(subcommand)]
        command: ModelCommand,
    },
    /// Run the end-to-end smoke flow against a live server.
    Smoke(SmokeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Fetch a user profile.
    Get(ProfileGetCommand),
    /// Update profile fields.
    Update(ProfileUpdateCommand),
    /// Delete a user account.
    Delete(ProfileDeleteCommand),
}

/// Users subcommands.
#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// List all known accounts.
    List(UsersListCommand),
}

/// History subcommands.
#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List one page of prediction history.
    List(HistoryListCommand),
    /// Fetch the full detail for one analysis record.
    Get(HistoryGetCommand),
}

/// Model subcommands.
#[derive(Subcommand, Debug)]
enum ModelCommand {
    /// Fetch model metadata.
    Info(ModelInfoCommand),
    /// Fetch the model health report.
    Health(ModelHealthCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Sunscan configuration file.
    Validate(ConfigValidateCommand),
}

/// Server connection inputs shared by networked commands.
#[derive(Args, Debug, Clone)]
struct ConnectionArgs {
    /// Optional config file path (defaults to sunscan.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured server base URL.
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,
}

/// Bearer token inputs shared by authenticated commands.
#[derive(Args, Debug, Clone)]
struct TokenArgs {
    /// Bearer token value.
    #[arg(long, value_name = "TOKEN", conflicts_with = "token_file")]
    token: Option<String>,
    /// Path to a file holding the bearer token.
    #[arg(long = "token-file", value_name = "PATH")]
    token_file: Option<PathBuf>,
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON output.
    Json,
}

/// Arguments for `register`.
#[derive(Args, Debug)]
struct RegisterCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Username for the new account.
    #[arg(long, value_name = "NAME")]
    username: String,
    /// Email for the new account (falls back to account.email in config).
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
    /// Age for the new account.
    #[arg(long, value_name = "YEARS")]
    age: u32,
}

/// Arguments for `login`.
#[derive(Args, Debug)]
struct LoginCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Email to authenticate as (falls back to account.email in config).
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
    /// Optional output path for the access token.
    #[arg(long = "token-out", value_name = "PATH")]
    token_out: Option<PathBuf>,
}

/// Arguments for `profile get`.
#[derive(Args, Debug)]
struct ProfileGetCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// User identifier to fetch.
    #[arg(long = "user-id", value_name = "ID")]
    user_id: u64,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `profile update`.
#[derive(Args, Debug)]
struct ProfileUpdateCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// User identifier to update.
    #[arg(long = "user-id", value_name = "ID")]
    user_id: u64,
    /// New username.
    #[arg(long, value_name = "NAME")]
    username: Option<String>,
    /// New age.
    #[arg(long, value_name = "YEARS")]
    age: Option<u32>,
    /// Change the password to the value of the password environment variable.
    #[arg(long = "set-password", action = ArgAction::SetTrue)]
    set_password: bool,
}

/// Arguments for `profile delete`.
#[derive(Args, Debug)]
struct ProfileDeleteCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// User identifier to delete.
    #[arg(long = "user-id", value_name = "ID")]
    user_id: u64,
}

/// Arguments for `users list`.
#[derive(Args, Debug)]
struct UsersListCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `history list`.
#[derive(Args, Debug)]
struct HistoryListCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Bearer token settings.
    #[command(flatten)]
    token: TokenArgs,
    /// 1-based page number.
    #[arg(long, value_name = "PAGE", default_value_t = 1)]
    page: u32,
    /// Entries per page (server cap 50).
    #[arg(long = "per-page", value_name = "COUNT", default_value_t = 10)]
    per_page: u32,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `history get`.
#[derive(Args, Debug)]
struct HistoryGetCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Bearer token settings.
    #[command(flatten)]
    token: TokenArgs,
    /// Analysis record identifier.
    #[arg(long, value_name = "ID")]
    id: u64,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `model info`.
#[derive(Args, Debug)]
struct ModelInfoCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Bearer token settings.
    #[command(flatten)]
    token: TokenArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for `model health`.
#[derive(Args, Debug)]
struct ModelHealthCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Bearer token settings.
    #[command(flatten)]
    token: TokenArgs,
}

/// Arguments for `smoke`.
#[derive(Args, Debug)]
struct SmokeCommand {
    /// Connection settings.
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Email to authenticate as (falls back to account.email in config).
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to sunscan.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Register(command) => command_register(command).await,
        Commands::Login(command) => command_login(command).await,
        Commands::Profile {
            command,
        } => command_profile(command).await,
        Commands::Users {
            command,
        } => command_users(command).await,
        Commands::History {
            command,
        } => command_history(command).await,
        Commands::Model {
            command,
        } => command_model(command).await,
        Commands::Smoke(command) => command_smoke(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Account Commands
// ============================================================================

/// Executes the `register` command.
async fn command_register(command: RegisterCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let username = Username::parse(&command.username)
        .map_err(|err| CliError::new(t!("auth.username.invalid", error = err)))?;
    let email = resolve_email(command.email.as_deref(), &config)?;
    let password = resolve_password()?;
    let age = AccountAge::new(command.age)
        .map_err(|err| CliError::new(t!("auth.age.invalid", error = err)))?;

    let account = client
        .register(&username, &email, &password, age)
        .await
        .map_err(|err| CliError::new(t!("register.failed", error = err)))?;
    write_stdout_line(&t!("register.ok", username = account.username, id = account.id))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `login` command.
async fn command_login(command: LoginCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let email = resolve_email(command.email.as_deref(), &config)?;
    let password = resolve_password()?;

    let session = client
        .login(&email, &password)
        .await
        .map_err(|err| CliError::new(t!("login.failed", error = err)))?;
    write_stdout_line(&t!("login.ok", email = email, id = session.account.id))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if let Some(path) = &command.token_out {
        write_token_file(path, &session)?;
        write_stdout_line(&t!("login.token_written", path = path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Writes the session token to a file for later commands.
fn write_token_file(path: &Path, session: &Session) -> CliResult<()> {
    fs::write(path, session.token.expose()).map_err(|err| {
        CliError::new(t!("login.token_write_failed", path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Profile Commands
// ============================================================================

/// Dispatches profile subcommands.
async fn command_profile(command: ProfileCommand) -> CliResult<ExitCode> {
    match command {
        ProfileCommand::Get(command) => command_profile_get(command).await,
        ProfileCommand::Update(command) => command_profile_update(command).await,
        ProfileCommand::Delete(command) => command_profile_delete(command).await,
    }
}

/// Executes the `profile get` command.
async fn command_profile_get(command: ProfileGetCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let user = parse_user_id(command.user_id)?;

    let account = client
        .profile(user)
        .await
        .map_err(|err| CliError::new(t!("profile.get.failed", error = err)))?;
    match command.format {
        OutputFormat::Json => print_json(&account)?,
        OutputFormat::Text => print_account(&account)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `profile update` command.
async fn command_profile_update(command: ProfileUpdateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let user = parse_user_id(command.user_id)?;
    if command.username.is_none() && command.age.is_none() && !command.set_password {
        return Err(CliError::new(t!("profile.update.nothing")));
    }
    let username = command
        .username
        .as_deref()
        .map(Username::parse)
        .transpose()
        .map_err(|err| CliError::new(t!("auth.username.invalid", error = err)))?;
    let age = command
        .age
        .map(AccountAge::new)
        .transpose()
        .map_err(|err| CliError::new(t!("auth.age.invalid", error = err)))?;
    let password = if command.set_password {
        Some(resolve_password()?)
    } else {
        None
    };

    let account = client
        .update_profile(user, username.as_ref(), age, password.as_ref())
        .await
        .map_err(|err| CliError::new(t!("profile.update.failed", error = err)))?;
    write_stdout_line(&t!("profile.update.ok", id = account.id))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    print_account(&account)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `profile delete` command.
async fn command_profile_delete(command: ProfileDeleteCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let user = parse_user_id(command.user_id)?;

    let message = client
        .delete_user(user)
        .await
        .map_err(|err| CliError::new(t!("profile.delete.failed", error = err)))?;
    write_stdout_line(&t!("profile.delete.ok", message = message))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints an account record as text lines.
fn print_account(account: &UserAccount) -> CliResult<()> {
    let mut lines = vec![
        t!("profile.line.id", id = account.id),
        t!("profile.line.username", username = account.username),
        t!("profile.line.email", email = account.email),
        t!("profile.line.age", age = account.age.get()),
    ];
    if let Some(created) = &account.created_at {
        lines.push(t!("profile.line.created", created = created));
    }
    if let Some(updated) = &account.updated_at {
        lines.push(t!("profile.line.updated", updated = updated));
    }
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Users Commands
// ============================================================================

/// Dispatches users subcommands.
async fn command_users(command: UsersCommand) -> CliResult<ExitCode> {
    match command {
        UsersCommand::List(command) => command_users_list(command).await,
    }
}

/// Executes the `users list` command.
async fn command_users_list(command: UsersListCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;

    let (users, total) = client
        .list_users()
        .await
        .map_err(|err| CliError::new(t!("users.failed", error = err)))?;
    match command.format {
        OutputFormat::Json => print_json(&users)?,
        OutputFormat::Text => {
            write_stdout_line(&t!("users.header", total = total))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            for user in &users {
                let line =
                    t!("users.line", id = user.id, username = user.username, email = user.email);
                write_stdout_line(&line)
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: History Commands
// ============================================================================

/// Dispatches history subcommands.
async fn command_history(command: HistoryCommand) -> CliResult<ExitCode> {
    match command {
        HistoryCommand::List(command) => command_history_list(command).await,
        HistoryCommand::Get(command) => command_history_get(command).await,
    }
}

/// Executes the `history list` command.
async fn command_history_list(command: HistoryListCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let token = resolve_token(&command.token)?;
    let page = PageRequest::new(command.page, command.per_page)
        .map_err(|err| CliError::new(t!("page.invalid", error = err)))?;

    let history = client
        .list_history(&token, page)
        .await
        .map_err(|err| CliError::new(t!("history.failed", error = err)))?;
    match command.format {
        OutputFormat::Json => print_json(&history)?,
        OutputFormat::Text => print_history(&history)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `history get` command.
async fn command_history_get(command: HistoryGetCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let token = resolve_token(&command.token)?;
    let id = parse_analysis_id(command.id)?;

    let detail = client
        .get_analysis(&token, id)
        .await
        .map_err(|err| CliError::new(t!("analysis.failed", error = err)))?;
    match command.format {
        OutputFormat::Json => print_json(&detail)?,
        OutputFormat::Text => print_detail(&detail)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints a history page as text lines.
fn print_history(history: &HistoryPage) -> CliResult<()> {
    let info = history.page_info;
    let header =
        t!("history.header", total = info.total, page = info.page, pages = info.pages.max(1));
    write_stdout_line(&header).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if history.is_empty() {
        write_stdout_line(&t!("history.empty"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(());
    }
    for (index, record) in history.records.iter().enumerate() {
        print_record(index + 1, record)?;
    }
    Ok(())
}

/// Prints one history record as text lines.
fn print_record(index: usize, record: &AnalysisRecord) -> CliResult<()> {
    let line = t!(
        "history.line",
        index = index,
        id = record.id,
        label = record.predicted_class,
        confidence = format_confidence(record.confidence)
    );
    write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if let Some(filename) = &record.image.filename {
        write_stdout_line(&t!("history.line.image", filename = filename))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    write_stdout_line(&t!("history.line.date", created = record.created_at))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if let Some(url) = &record.original_image_url {
        write_stdout_line(&t!("history.line.url", url = url))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Prints an analysis detail with its full breakdown.
fn print_detail(detail: &AnalysisDetail) -> CliResult<()> {
    let header = t!(
        "analysis.header",
        id = detail.id,
        label = detail.predicted_class,
        confidence = format_confidence(detail.confidence)
    );
    write_stdout_line(&header).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if let Some(filename) = &detail.image.filename {
        write_stdout_line(&t!("history.line.image", filename = filename))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    write_stdout_line(&t!("history.line.date", created = detail.created_at))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line(&t!("analysis.breakdown.header"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for (label, score) in detail.all_predictions.iter() {
        let line =
            t!("analysis.breakdown.line", label = label, score = format!("{:.4}", score.get()));
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Model Commands
// ============================================================================

/// Dispatches model subcommands.
async fn command_model(command: ModelCommand) -> CliResult<ExitCode> {
    match command {
        ModelCommand::Info(command) => command_model_info(command).await,
        ModelCommand::Health(command) => command_model_health(command).await,
    }
}

/// Executes the `model info` command.
async fn command_model_info(command: ModelInfoCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let token = resolve_token(&command.token)?;

    let info = client
        .model_info(&token)
        .await
        .map_err(|err| CliError::new(t!("model.info.failed", error = err)))?;
    match command.format {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Text => {
            let lines = [
                t!("model.info.name", name = info.model_name),
                t!("model.info.file", file = info.model_file),
                t!("model.info.classes", classes = info.classes.join(", ")),
                t!("model.info.input", input = info.input_size),
                t!("model.info.description", description = info.description),
            ];
            for line in lines {
                write_stdout_line(&line)
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `model health` command.
async fn command_model_health(command: ModelHealthCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let token = resolve_token(&command.token)?;

    let health = client
        .model_health(&token)
        .await
        .map_err(|err| CliError::new(t!("model.health.failed", error = err)))?;
    if health.is_healthy() {
        let message = health.message.unwrap_or_default();
        write_stdout_line(&t!("model.health.ok", message = message))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    } else {
        let error = health.error.unwrap_or_else(|| health.status.clone());
        write_stdout_line(&t!("model.health.bad", error = error))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// SECTION: Smoke Command
// ============================================================================

/// Executes the `smoke` command: login, list history, page forward, and
/// fetch the first record's detail, verifying consistency along the way.
async fn command_smoke(command: SmokeCommand) -> CliResult<ExitCode> {
    let config = load_config(command.connection.config.as_deref())?;
    let base_url = command
        .connection
        .base_url
        .clone()
        .unwrap_or_else(|| config.server.base_url.clone());
    let client = build_client(&config, command.connection.base_url.as_deref())?;
    let email = resolve_email(command.email.as_deref(), &config)?;
    let password = resolve_password()?;

    match run_smoke_flow(&client, &config, &email, &password).await {
        Ok(()) => {
            write_stdout_line(&t!("smoke.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if err.is_connection() {
                write_stderr_line(&t!("smoke.hint.connection", base_url = base_url))
                    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            }
            Err(CliError::new(t!("smoke.failed", error = err)))
        }
    }
}

/// Walks the login, history, pagination, and detail steps in order.
///
/// # Errors
///
/// Returns the first [`ApiError`] encountered; output failures surface as
/// [`ApiError::Config`] so the flow reports them instead of panicking.
async fn run_smoke_flow(
    client: &ApiClient,
    config: &SunscanConfig,
    email: &EmailAddress,
    password: &Password,
) -> Result<(), ApiError> {
    smoke_line(&t!("smoke.step.login", email = email))?;
    let session = client.login(email, password).await?;

    smoke_line(&t!("smoke.step.history"))?;
    let page = PageRequest::new(1, config.smoke.per_page)
        .map_err(|err| ApiError::Validation(err.to_string()))?;
    let history = client.list_history(&session.token, page).await?;
    smoke_line(&t!("smoke.history.total", total = history.page_info.total))?;

    if history.is_empty() {
        smoke_line(&t!("history.empty"))?;
        return Ok(());
    }

    smoke_line(&t!("smoke.recent.header"))?;
    let shown = usize::try_from(config.smoke.show_entries).unwrap_or(usize::MAX);
    for (index, record) in history.records.iter().take(shown).enumerate() {
        let line = t!(
            "history.line",
            index = index + 1,
            id = record.id,
            label = record.predicted_class,
            confidence = format_confidence(record.confidence)
        );
        smoke_line(&line)?;
    }

    if history.page_info.has_next {
        smoke_line(&t!("smoke.step.page2"))?;
        let next = PageRequest::new(2, config.smoke.per_page)
            .map_err(|err| ApiError::Validation(err.to_string()))?;
        let second = client.list_history(&session.token, next).await?;
        smoke_line(&t!("smoke.page2.count", count = second.records.len()))?;
    }

    let first = &history.records[0];
    smoke_line(&t!("smoke.step.detail", id = first.id))?;
    let detail = client.get_analysis(&session.token, first.id).await?;
    detail
        .extends(first)
        .map_err(|err| ApiError::Protocol(format!("detail does not extend listing: {err}")))?;
    smoke_line(&t!("smoke.detail.consistent"))?;
    smoke_line(&t!(
        "smoke.detail.breakdown",
        count = detail.all_predictions.len(),
        sum = format!("{:.4}", detail.all_predictions.score_sum())
    ))?;
    Ok(())
}

/// Writes one smoke progress line, mapping output failures into the flow.
fn smoke_line(message: &str) -> Result<(), ApiError> {
    write_stdout_line(message).map_err(|err| ApiError::Config(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the `config validate` command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    load_config(command.config.as_deref())?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Resolution Helpers
// ============================================================================

/// Resolves the CLI locale from the flag or environment.
fn resolve_locale(flag: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(flag) = flag {
        return Ok(flag.locale());
    }
    let Some(raw) = env_lang else {
        return Ok(Locale::En);
    };
    Locale::parse(raw)
        .ok_or_else(|| CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = raw)))
}

/// Loads configuration with localized error mapping.
fn load_config(path: Option<&Path>) -> CliResult<SunscanConfig> {
    SunscanConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds an API client from configuration and an optional URL override.
fn build_client(config: &SunscanConfig, base_url: Option<&str>) -> CliResult<ApiClient> {
    let client_config = ApiClientConfig {
        base_url: base_url.unwrap_or(&config.server.base_url).to_string(),
        timeout: Duration::from_millis(config.server.timeout_ms),
        max_response_bytes: config.server.max_response_bytes,
    };
    ApiClient::new(client_config)
        .map_err(|err| CliError::new(t!("client.init_failed", error = err)))
}

/// Resolves the account email from the flag or configuration.
fn resolve_email(flag: Option<&str>, config: &SunscanConfig) -> CliResult<EmailAddress> {
    let raw = flag
        .map(str::to_string)
        .or_else(|| config.account.email.clone())
        .ok_or_else(|| CliError::new(t!("auth.email.missing")))?;
    EmailAddress::parse(&raw).map_err(|err| CliError::new(t!("auth.email.invalid", error = err)))
}

/// Resolves the account password from the environment.
fn resolve_password() -> CliResult<Password> {
    let raw = std::env::var(PASSWORD_ENV)
        .map_err(|_| CliError::new(t!("auth.password.env_missing", env = PASSWORD_ENV)))?;
    Password::new(raw).map_err(|err| CliError::new(t!("auth.password.invalid", error = err)))
}

/// Resolves the bearer token from the flag, token file, or environment.
fn resolve_token(args: &TokenArgs) -> CliResult<SessionToken> {
    if let Some(token) = &args.token {
        return SessionToken::new(token.clone())
            .map_err(|err| CliError::new(t!("token.invalid", error = err)));
    }
    if let Some(path) = &args.token_file {
        return read_token_file(path);
    }
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        return SessionToken::new(token)
            .map_err(|err| CliError::new(t!("token.invalid", error = err)));
    }
    Err(CliError::new(t!("token.missing", env = TOKEN_ENV)))
}

/// Reads and validates a bearer token from a file.
fn read_token_file(path: &Path) -> CliResult<SessionToken> {
    let bytes = fs::read(path).map_err(|err| {
        CliError::new(t!("token.read_failed", path = path.display(), error = err))
    })?;
    if bytes.len() > MAX_TOKEN_FILE_BYTES {
        return Err(CliError::new(t!(
            "token.file_too_large",
            path = path.display(),
            limit = MAX_TOKEN_FILE_BYTES
        )));
    }
    let text = String::from_utf8(bytes).map_err(|err| {
        CliError::new(t!("token.read_failed", path = path.display(), error = err))
    })?;
    SessionToken::new(text.trim().to_string())
        .map_err(|err| CliError::new(t!("token.invalid", error = err)))
}

/// Parses a raw user identifier with localized error mapping.
fn parse_user_id(raw: u64) -> CliResult<UserId> {
    UserId::from_raw(raw).ok_or_else(|| CliError::new(t!("id.invalid", value = raw)))
}

/// Parses a raw analysis identifier with localized error mapping.
fn parse_analysis_id(raw: u64) -> CliResult<AnalysisId> {
    AnalysisId::from_raw(raw).ok_or_else(|| CliError::new(t!("id.invalid", value = raw)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Formats a confidence score as a percentage for display.
fn format_confidence(confidence: Confidence) -> String {
    format!("{:.2}%", confidence.get() * 100.0)
}

/// Prints a serializable value as pretty JSON.
fn print_json<T>(value: &T) -> CliResult<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.render_failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Shows top-level CLI help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Builds a localized output failure message for a stream.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        _ => t!("output.stream.stderr"),
    };
    t!("output.write_failed", stream = stream_label, error = err)
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

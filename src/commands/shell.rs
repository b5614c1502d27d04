//! Interactive shell
//!
//! A readline loop standing in for the single-page client: log in, browse
//! the article list, fill the edit form and submit it. Input is parsed into
//! a [`ShellCommand`]; commands are prefixed with `/` and are
//! case-insensitive, their arguments are taken verbatim.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

use super::{print_articles, print_form, welcome_line};
use crate::error::{ArtdeskError, Result};
use crate::form::{FormMode, SubmitOutcome};
use crate::manager::ArticleManager;
use crate::types::ArticleId;

/// Errors that can occur when parsing shell commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Argument could not be parsed
    #[error("Invalid argument for {command}: {arg}")]
    InvalidArgument { command: String, arg: String },
}

/// Commands understood by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Re-fetch and show the article list
    List,
    /// Clear the form so the next submit creates an article
    New,
    /// Load an article into the form
    Edit(ArticleId),
    /// Set the form title
    Title(String),
    /// Set the form description
    Description(String),
    /// Create or update from the form
    Submit,
    /// Discard the form
    Cancel,
    /// Delete an article
    Delete(ArticleId),
    /// Show the form
    Form,
    /// Show the logged-in user
    Whoami,
    Login {
        identifier: String,
        password: String,
    },
    Register {
        email: String,
        username: String,
        password: String,
    },
    Logout,
    Help,
    Exit,
    /// Not a command
    None,
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn parse_id(
    command: &str,
    arg: &str,
    usage: &str,
) -> std::result::Result<ArticleId, CommandError> {
    if arg.is_empty() {
        return Err(missing(command, usage));
    }
    arg.parse().map_err(|_| CommandError::InvalidArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    })
}

/// Parse a line of user input
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands and missing or malformed
/// arguments.
///
/// # Examples
///
/// ```
/// use artdesk::commands::shell::{parse_shell_command, ShellCommand};
/// use artdesk::types::ArticleId;
///
/// assert_eq!(parse_shell_command("/edit 4").unwrap(), ShellCommand::Edit(ArticleId(4)));
/// assert_eq!(parse_shell_command("/title Hello world").unwrap(),
///            ShellCommand::Title("Hello world".to_string()));
/// assert_eq!(parse_shell_command("hello").unwrap(), ShellCommand::None);
/// ```
pub fn parse_shell_command(input: &str) -> std::result::Result<ShellCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(ShellCommand::None);
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match head.as_str() {
        "/list" | "/ls" => Ok(ShellCommand::List),
        "/new" => Ok(ShellCommand::New),
        "/edit" => parse_id("/edit", rest, "/edit <id>").map(ShellCommand::Edit),
        "/delete" | "/rm" => parse_id("/delete", rest, "/delete <id>").map(ShellCommand::Delete),
        // Empty title/description are allowed.
        "/title" => Ok(ShellCommand::Title(rest.to_string())),
        "/description" | "/desc" => Ok(ShellCommand::Description(rest.to_string())),
        "/submit" | "/save" => Ok(ShellCommand::Submit),
        "/cancel" => Ok(ShellCommand::Cancel),
        "/form" => Ok(ShellCommand::Form),
        "/whoami" => Ok(ShellCommand::Whoami),
        "/login" => match args.as_slice() {
            [identifier, password] => Ok(ShellCommand::Login {
                identifier: identifier.to_string(),
                password: password.to_string(),
            }),
            _ => Err(missing("/login", "/login <email|username> <password>")),
        },
        "/register" => match args.as_slice() {
            [email, username, password] => Ok(ShellCommand::Register {
                email: email.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(missing("/register", "/register <email> <username> <password>")),
        },
        "/logout" => Ok(ShellCommand::Logout),
        "/help" | "/?" => Ok(ShellCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(ShellCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the shell help text
pub fn print_help() {
    println!(
        r#"
Shell Commands
==============

SESSION:
  /login <email|username> <password>        - Log in
  /register <email> <username> <password>   - Create an account and log in
  /logout                                   - End the session
  /whoami                                   - Show the logged-in user

ARTICLES:
  /list            - Refresh and show your articles
  /delete <id>     - Delete an article

FORM:
  /new             - Start a new article (clears the form)
  /edit <id>       - Load an article into the form
  /title <text>    - Set the form title
  /desc <text>     - Set the form description
  /form            - Show the form
  /submit          - Create or update from the form
  /cancel          - Discard the form

  /help            - Show this help
  /exit            - Leave the shell
"#
    );
}

fn prompt(manager: &ArticleManager) -> String {
    let who = match manager.user() {
        Some(user) if !user.username.is_empty() => user.username.clone(),
        _ if manager.is_logged_in() => "session".to_string(),
        _ => "guest".to_string(),
    };
    let mode = match manager.form().mode() {
        FormMode::Create => "new".green().to_string(),
        FormMode::Update(id) => format!("edit #{}", id).yellow().to_string(),
    };
    format!("[{}|{}] >> ", who.cyan(), mode)
}

/// Report a failed command. Auth rejections were already notified.
fn report(error: &anyhow::Error) {
    if let Some(ArtdeskError::Auth(_)) = error.downcast_ref::<ArtdeskError>() {
        return;
    }
    eprintln!("{}", format!("Error: {:#}", error).red());
}

/// Execute one parsed command. Returns `false` when the shell should exit.
pub async fn execute(manager: &mut ArticleManager, command: ShellCommand) -> Result<bool> {
    match command {
        ShellCommand::List => {
            let articles = manager.refresh().await?;
            print_articles(articles);
        }
        ShellCommand::New | ShellCommand::Cancel => {
            manager.form_mut().clear();
        }
        ShellCommand::Edit(id) => {
            manager.begin_edit(id)?;
            print_form(manager.form());
        }
        ShellCommand::Title(title) => manager.form_mut().set_title(title),
        ShellCommand::Description(description) => manager.form_mut().set_description(description),
        ShellCommand::Submit => {
            let outcome = manager.submit().await?;
            let verb = match outcome {
                SubmitOutcome::Created(_) => "Created",
                SubmitOutcome::Updated(_) => "Updated",
            };
            tracing::debug!("{} article {}", verb, outcome.article().id);
            print_articles(manager.articles());
        }
        ShellCommand::Delete(id) => {
            manager.delete_article(id).await?;
            print_articles(manager.articles());
        }
        ShellCommand::Form => print_form(manager.form()),
        ShellCommand::Whoami => {
            if manager.is_logged_in() {
                println!("{}", welcome_line(manager.user()));
            } else {
                println!("Not logged in.");
            }
        }
        ShellCommand::Login {
            identifier,
            password,
        } => {
            manager.login(&identifier, &password).await?;
            println!("{}", welcome_line(manager.user()));
            print_articles(manager.articles());
        }
        ShellCommand::Register {
            email,
            username,
            password,
        } => {
            manager.register(&email, &username, &password).await?;
            println!("{}", welcome_line(manager.user()));
        }
        ShellCommand::Logout => manager.logout(),
        ShellCommand::Help => print_help(),
        ShellCommand::Exit => return Ok(false),
        ShellCommand::None => {
            println!("Commands start with '/'. Type '/help' to see them.");
        }
    }
    Ok(true)
}

/// Run the interactive loop until `/exit` or end of input.
pub async fn run_shell(mut manager: ArticleManager) -> Result<()> {
    tracing::info!("Starting interactive shell");

    let mut rl = DefaultEditor::new()?;

    println!("{}", "Article Management".bold());
    if manager.init().await {
        println!("{}", welcome_line(manager.user()));
        print_articles(manager.articles());
    } else {
        println!("Not logged in. Use /login or /register, or /help for all commands.");
    }

    loop {
        match rl.readline(&prompt(&manager)) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let command = match parse_shell_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };

                match execute(&mut manager, command).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => report(&e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("Shell closed");
    Ok(())
}

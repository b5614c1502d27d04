/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `auth`: register, login, logout, whoami
- `articles`: list, create, update, delete
- `shell`: interactive session driving the edit form

Every handler works on an [`ArticleManager`] so it can be exercised with a
fake transport; [`build_manager`] wires the real one from configuration.
*/

use std::sync::Arc;

use colored::Colorize;
use prettytable::{row, Table};

use crate::config::Config;
use crate::error::{ArtdeskError, Result};
use crate::form::EditBuffer;
use crate::manager::ArticleManager;
use crate::notify::{ConsoleNotifier, Notifier, SilentNotifier};
use crate::storage::open_token_store;
use crate::transport::http::HttpTransport;
use crate::types::{Article, User};

pub mod shell;

/// Build a manager talking to the configured backend.
///
/// # Errors
///
/// Returns an error if the base URL is invalid, the HTTP client cannot be
/// built, or the token store cannot be opened.
pub fn build_manager(config: &Config) -> Result<ArticleManager> {
    let transport = HttpTransport::new(config.api.url()?, config.api.timeout())?;
    let token_store = open_token_store(&config.storage)?;
    let notifier: Box<dyn Notifier> = if config.notifications.enabled {
        Box::new(ConsoleNotifier)
    } else {
        Box::new(SilentNotifier)
    };

    Ok(
        ArticleManager::new(Arc::new(transport), token_store, notifier)
            .with_notification_duration(config.notifications.duration()),
    )
}

/// Greeting line for the logged-in user.
pub fn welcome_line(user: Option<&User>) -> String {
    match user {
        Some(user) if !user.username.is_empty() => format!("Welcome, {}!", user.username),
        _ => "Welcome!".to_string(),
    }
}

/// Render articles as a table.
pub fn articles_table(articles: &[Article]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "Title", "Description", "Updated"]);

    for article in articles {
        let updated = article
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![
            article.id,
            article.title,
            article.description,
            updated
        ]);
    }

    table
}

fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles.");
        return;
    }
    println!();
    articles_table(articles).printstd();
    println!();
}

fn print_form(form: &EditBuffer) {
    println!("{}", form.mode().label().bold());
    println!("  Title:       {}", form.title);
    println!("  Description: {}", form.description);
}

fn require_login(manager: &ArticleManager) -> Result<()> {
    if manager.is_logged_in() {
        Ok(())
    } else {
        println!("{}", "Not logged in. Run `artdesk login` first.".yellow());
        Err(ArtdeskError::NotLoggedIn.into())
    }
}

pub mod auth {
    //! Session commands.

    use super::*;

    pub async fn register(
        manager: &mut ArticleManager,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<()> {
        manager.register(email, username, password).await?;
        println!("{}", welcome_line(manager.user()));
        Ok(())
    }

    pub async fn login(
        manager: &mut ArticleManager,
        identifier: &str,
        password: &str,
    ) -> Result<()> {
        manager.login(identifier, password).await?;
        println!("{}", welcome_line(manager.user()));
        Ok(())
    }

    pub fn logout(manager: &mut ArticleManager) -> Result<()> {
        manager.logout();
        Ok(())
    }

    pub async fn whoami(manager: &mut ArticleManager) -> Result<()> {
        manager.init().await;
        require_login(manager)?;

        println!("{}", welcome_line(manager.user()));
        if let Some(user) = manager.user() {
            if let Some(email) = &user.email {
                println!("  Email: {}", email);
            }
            if let Some(id) = user.id {
                println!("  ID:    {}", id);
            }
        }
        Ok(())
    }
}

pub mod articles {
    //! Article commands.
    //!
    //! Each command restores the persisted session first, which also loads
    //! the current article list.

    use super::*;
    use crate::types::ArticleId;

    pub async fn list(manager: &mut ArticleManager, json: bool) -> Result<()> {
        manager.init().await;
        require_login(manager)?;

        if json {
            println!("{}", serde_json::to_string_pretty(manager.articles())?);
        } else {
            print_articles(manager.articles());
        }
        Ok(())
    }

    pub async fn create(
        manager: &mut ArticleManager,
        title: &str,
        description: &str,
    ) -> Result<Article> {
        manager.init().await;
        require_login(manager)?;

        let article = manager.create_article(title, description).await?;
        print_articles(std::slice::from_ref(&article));
        Ok(article)
    }

    /// Update `id`, keeping the current value of any field not given.
    ///
    /// Partial updates need the article in the loaded list; with both fields
    /// given the update is sent even if the list does not contain it.
    pub async fn update(
        manager: &mut ArticleManager,
        id: ArticleId,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Article> {
        manager.init().await;
        require_login(manager)?;

        let article = match (title, description) {
            (Some(title), Some(description)) => {
                manager.update_article(id, &title, &description).await?
            }
            (title, description) => {
                manager.begin_edit(id)?;
                let form = manager.form_mut();
                if let Some(title) = title {
                    form.set_title(title);
                }
                if let Some(description) = description {
                    form.set_description(description);
                }
                manager.submit().await?.article().clone()
            }
        };

        print_articles(std::slice::from_ref(&article));
        Ok(article)
    }

    pub async fn delete(manager: &mut ArticleManager, id: ArticleId) -> Result<()> {
        manager.init().await;
        require_login(manager)?;
        manager.delete_article(id).await
    }
}

use super::Shell;
use anyhow::{Result, anyhow};
use colored::Colorize;
use places_application::session::{LOGIN_FAILED, REGISTRATION_FAILED};
use places_core::session::{Credentials, Route};

pub async fn register(shell: &Shell, username: &str, password: &str, agree: bool) -> Result<()> {
    let message = shell
        .app
        .registration()
        .register(&Credentials::new(username, password), agree)
        .await
        .map_err(|e| anyhow!(e.user_message(REGISTRATION_FAILED)))?;

    println!("{}", message.green());
    println!("Log in with `places login {} <password>`.", username);
    Ok(())
}

pub async fn login(shell: &Shell, username: &str, password: &str) -> Result<()> {
    let session = shell
        .app
        .session()
        .login(&Credentials::new(username, password))
        .await
        .map_err(|e| anyhow!(e.user_message(LOGIN_FAILED)))?;

    println!(
        "{}",
        format!("Logged in as user {}", session.subject_id).green()
    );
    println!("Session valid until {}", session.expires_at.to_rfc3339());
    println!("Next: {}", shell.app.session().resolve_route(Route::Home).await);
    Ok(())
}

pub async fn logout(shell: &Shell) -> Result<()> {
    shell.app.session().logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(shell: &Shell) -> Result<()> {
    match shell.app.session().current().await {
        Some(session) => {
            println!("User {}", session.subject_id);
            println!("Session valid until {}", session.expires_at.to_rfc3339());
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

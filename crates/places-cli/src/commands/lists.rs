use super::Shell;
use anyhow::{Result, bail};
use colored::Colorize;
use places_application::map::rating_summary;
use places_core::map::MapContainer;

pub async fn mine(shell: &Shell) -> Result<()> {
    let view = shell.app.lists();
    view.load().await?;

    let state = view.snapshot().await;
    if state.lists.is_empty() {
        println!("No lists yet. Create one with `places create-list <name>`.");
    }
    for list in &state.lists {
        println!("  {} {}", format!("#{}", list.id).dimmed(), list.name.bold());
    }
    Ok(())
}

pub async fn create(shell: &Shell, name: &str) -> Result<()> {
    let view = shell.app.lists();
    view.create(name).await?;
    println!("You now have {} lists", view.snapshot().await.lists.len());
    Ok(())
}

pub async fn show(shell: &Shell, id: i64) -> Result<()> {
    let view = shell.app.list_detail();
    view.load(id).await?;
    let state = view.snapshot().await;
    let Some(list) = state.list.as_ref() else {
        bail!("List {} not loaded", id);
    };

    println!("{}", list.name.bold());
    println!("Places:");
    if state.places.is_empty() {
        println!("  (none)");
    }
    for place in state.places.iter() {
        println!(
            "  {} {}  {}",
            format!("#{}", place.id).dimmed(),
            place.name,
            rating_summary(place).yellow()
        );
    }

    println!("Shared with:");
    if state.users.is_empty() {
        println!("  (nobody)");
    }
    for user in &state.users {
        println!("  {} {}", format!("#{}", user.id).dimmed(), user.username);
    }

    let mut map = shell.app.list_map(shell.map.clone());
    map.render(Some(&MapContainer::new("list-map")), &state.places)?;
    if let Some(handle) = map.handle() {
        for line in shell.map.describe(handle) {
            println!("{} {}", "Map:".dimmed(), line.replace('\n', " | "));
        }
    }
    map.unmount();
    Ok(())
}

pub async fn add_place(shell: &Shell, id: i64, name: &str) -> Result<()> {
    let view = shell.app.list_detail();
    view.load(id).await?;
    view.add_place_by_name(name).await?;
    println!("{} places in the list", view.snapshot().await.places.len());
    Ok(())
}

pub async fn remove_place(shell: &Shell, id: i64, place_id: i64) -> Result<()> {
    let view = shell.app.list_detail();
    view.load(id).await?;
    view.remove_place(place_id).await?;
    println!("{} places in the list", view.snapshot().await.places.len());
    Ok(())
}

pub async fn add_user(shell: &Shell, id: i64, username: &str) -> Result<()> {
    let view = shell.app.list_detail();
    view.load(id).await?;
    view.add_user(username).await?;
    println!("Shared with {} users", view.snapshot().await.users.len());
    Ok(())
}

pub async fn remove_user(shell: &Shell, id: i64, user_id: i64) -> Result<()> {
    let view = shell.app.list_detail();
    view.load(id).await?;
    view.remove_user(user_id).await?;
    println!("Shared with {} users", view.snapshot().await.users.len());
    Ok(())
}

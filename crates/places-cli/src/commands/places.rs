use super::Shell;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use places_application::map::{SearchSelection, rating_summary};
use places_core::map::MapContainer;
use places_core::place::Place;
use places_core::session::Route;
use std::path::Path;

/// Field overrides for `edit-place`.
pub struct PlaceChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub work_hours: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl PlaceChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.work_hours.is_none()
            && self.website.is_none()
            && self.phone.is_none()
    }
}

fn print_summary(place: &Place) {
    println!(
        "  {} {}  {}",
        format!("#{}", place.id).dimmed(),
        place.name.bold(),
        place.address
    );
}

pub async fn catalog(shell: &Shell, page: usize, name: Option<&str>) -> Result<()> {
    shell.enter(Route::Home).await?;

    let catalog = shell.app.catalog();
    match name {
        Some(name) => catalog.search(name).await?,
        None => catalog.load().await?,
    }
    catalog.go_to_page(page).await;

    let state = catalog.snapshot().await;
    if state.places.is_empty() {
        println!("No places found");
        return Ok(());
    }
    for place in state.page_items() {
        print_summary(place);
    }
    println!(
        "Page {} of {}{}{}",
        state.page(),
        state.page_count(),
        if state.has_previous() { "  [--page prev]" } else { "" },
        if state.has_next() { "  [--page next]" } else { "" }
    );
    Ok(())
}

pub async fn show(shell: &Shell, id: i64) -> Result<()> {
    let view = shell.app.place_detail();
    view.load(id).await?;
    let state = view.snapshot().await;
    let Some(place) = state.place.as_ref() else {
        bail!("Place {} not loaded", id);
    };

    println!("{}", place.name.bold());
    println!("Address:     {}", place.address);
    println!("Category:    {}", place.category_label());
    println!("Description: {}", place.description);
    println!("Hours:       {}", place.work_hours);
    println!("Website:     {}", place.website);
    println!("Phone:       {}", place.phone);
    println!("{}", rating_summary(place));

    let mut map = shell.app.place_map(shell.map.clone());
    map.render(Some(&MapContainer::new("place-map")), &state.place_markers)?;
    if let Some(handle) = map.handle() {
        for line in shell.map.describe(handle) {
            println!("{} {}", "Map:".dimmed(), line);
        }
    }
    map.unmount();

    println!();
    if state.reviews.is_empty() {
        println!("No reviews yet");
    }
    for review in &state.reviews {
        println!(
            "  {} {}: {}",
            format!("[{}/10]", review.review_score).yellow(),
            if review.username.is_empty() {
                format!("user {}", review.id_user)
            } else {
                review.username.clone()
            },
            review.review_text
        );
    }
    Ok(())
}

pub async fn edit(shell: &Shell, id: i64, changes: PlaceChanges) -> Result<()> {
    if changes.is_empty() {
        bail!("Nothing to change");
    }

    let view = shell.app.place_detail();
    view.load(id).await?;
    view.begin_edit().await?;
    view.edit(move |form| {
        if let Some(v) = changes.name {
            form.name = v;
        }
        if let Some(v) = changes.address {
            form.address = v;
        }
        if let Some(v) = changes.category {
            form.category = v;
        }
        if let Some(v) = changes.description {
            form.description = v;
        }
        if let Some(v) = changes.work_hours {
            form.work_hours = v;
        }
        if let Some(v) = changes.website {
            form.website = v;
        }
        if let Some(v) = changes.phone {
            form.phone = v;
        }
    })
    .await;
    view.submit_edit().await?;

    if let Some(place) = view.snapshot().await.place {
        print_summary(&place);
        println!("  {}", place.category_label());
    }
    Ok(())
}

pub async fn review(shell: &Shell, place_id: i64, score: u8, text: &str) -> Result<()> {
    let view = shell.app.place_detail();
    view.load(place_id).await?;
    view.open_review_form().await;
    view.submit_review(text, score).await?;

    if let Some(place) = view.snapshot().await.place {
        println!("{}: {}", place.name, rating_summary(&place));
    }
    Ok(())
}

pub async fn save_from_file(shell: &Shell, file: &Path) -> Result<()> {
    shell.enter(Route::Map).await?;

    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let result: serde_json::Value =
        serde_json::from_str(&content).context("Search result is not valid JSON")?;

    let selection = SearchSelection::new();
    let candidate = selection.select(&result);
    println!(
        "Selected {} ({:.6}, {:.6})",
        candidate.display_name.bold(),
        candidate.lat,
        candidate.lon
    );

    shell.app.capture().save_selection(&selection).await?;
    Ok(())
}

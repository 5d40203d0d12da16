use anyhow::{anyhow, Result};
use tracing::info;

use herohub_core::messages::Action;
use herohub_core::models::{SuperheroQuery, SuperheroUpdate};
use herohub_core::state::HeroBrowser;

use crate::app::App;
use crate::output;

pub async fn list(app: &App, query: &SuperheroQuery, toggle: Option<i64>) -> Result<()> {
    app.enter("/heroes");

    let browser = HeroBrowser::new();
    let page = browser
        .load(&app.client, query)
        .await
        .map_err(|e| app.explain(Action::LoadHeroes, e))?;

    if let Some(hero_id) = toggle {
        if !app.session.is_authenticated() {
            return Err(anyhow!("Log in to manage favorites."));
        }
        let now = browser
            .toggle_favorite(&app.client, hero_id)
            .await
            .map_err(|e| app.explain(Action::ToggleFavorite, e))?;
        println!(
            "{} {} favorites.",
            if now { "Added to" } else { "Removed from" },
            browser.hero(hero_id).map(|h| h.name).unwrap_or_default()
        );
        // Show the page with the flag flipped locally
        if let Some(page) = browser.page() {
            output::hero_page(&page);
        }
        return Ok(());
    }

    output::hero_page(&page);
    Ok(())
}

pub async fn show(app: &App, id: i64) -> Result<()> {
    app.enter(&format!("/heroes/{}", id));

    let hero = app
        .client
        .get_superhero(id)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::LoadHero, e))?;
    output::hero_detail(&hero);
    Ok(())
}

/// Apply `field=value` edits to a hero. Admins only.
pub async fn edit(app: &App, id: i64, assignments: &[String]) -> Result<()> {
    let user = app.enter_protected(&format!("/heroes/{}/edit", id))?;
    if !user.is_admin() {
        app.enter(&format!("/heroes/{}", id));
        return Err(anyhow!("Only admins can edit superheroes"));
    }

    let update = parse_assignments(assignments)?;
    if update.is_empty() {
        return Err(anyhow!("Nothing to update"));
    }

    let hero = app
        .client
        .update_superhero(id, &update)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::UpdateHero, e))?;

    info!(hero_id = id, "Superhero updated");
    println!("Superhero updated successfully.\n");
    app.enter(&format!("/heroes/{}", id));
    output::hero_detail(&hero);
    Ok(())
}

fn parse_assignments(assignments: &[String]) -> Result<SuperheroUpdate> {
    let mut update = SuperheroUpdate::default();
    for assignment in assignments {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected FIELD=VALUE, got '{}'", assignment))?;
        update
            .set_field(field.trim(), value.trim())
            .map_err(|e| anyhow!(e))?;
    }
    Ok(update)
}

use anyhow::Result;

use herohub_core::messages::Action;
use herohub_core::state::{FavoriteDetail, FavoritesList};

use crate::app::App;
use crate::output;

pub async fn list(app: &App) -> Result<()> {
    app.enter_protected("/favorites")?;

    let favorites = FavoritesList::new();
    let heroes = favorites
        .load(&app.client)
        .await
        .map_err(|e| app.explain(Action::LoadFavorites, e))?;
    output::hero_list(&heroes, "You have no favorites yet.");
    Ok(())
}

/// Bring a hero's favorite flag to `wanted`, toggling only if needed.
pub async fn set(app: &App, id: i64, wanted: bool) -> Result<()> {
    app.enter_protected(&format!("/heroes/{}", id))?;

    let detail = FavoriteDetail::new(id);
    let current = detail
        .load(&app.client)
        .await
        .map_err(|e| app.explain(Action::ToggleFavorite, e))?;
    if current == wanted {
        println!(
            "Hero {} is already {}.",
            id,
            if wanted { "a favorite" } else { "not a favorite" }
        );
        return Ok(());
    }

    let now = detail
        .toggle(&app.client)
        .await
        .map_err(|e| app.explain(Action::ToggleFavorite, e))?;
    report(id, now);
    Ok(())
}

pub async fn toggle(app: &App, id: i64) -> Result<()> {
    app.enter_protected(&format!("/heroes/{}", id))?;

    let now = FavoriteDetail::new(id)
        .toggle(&app.client)
        .await
        .map_err(|e| app.explain(Action::ToggleFavorite, e))?;
    report(id, now);
    Ok(())
}

/// Remove from the favorites screen, the way the list view does it.
pub async fn remove(app: &App, id: i64) -> Result<()> {
    app.enter_protected("/favorites")?;

    let favorites = FavoritesList::new();
    favorites
        .load(&app.client)
        .await
        .map_err(|e| app.explain(Action::LoadFavorites, e))?;
    favorites
        .remove(&app.client, id)
        .await
        .map_err(|e| app.explain(Action::RemoveFavorite, e))?;

    println!("Removed from favorites.");
    output::hero_list(&favorites.heroes(), "You have no favorites left.");
    Ok(())
}

fn report(id: i64, is_favorite: bool) {
    if is_favorite {
        println!("Hero {} added to favorites.", id);
    } else {
        println!("Hero {} removed from favorites.", id);
    }
}

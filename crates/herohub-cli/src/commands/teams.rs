use anyhow::{anyhow, Result};

use herohub_core::messages::Action;
use herohub_core::models::TeamUpdate;
use herohub_core::state::{RecommendationKind, TeamBuilder, TeamComparer, TeamList};

use crate::app::{confirm, App};
use crate::output;

const TEAMS_ROUTE: &str = "/teams";

pub async fn list(app: &App) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;

    let teams = TeamList::new()
        .load(&app.client)
        .await
        .map_err(|e| app.explain(Action::LoadTeams, e))?;
    if teams.is_empty() {
        println!("You have no teams yet. Create one with `herohub teams create`.");
    }
    for team in &teams {
        output::team_row(team);
    }
    Ok(())
}

pub async fn show(app: &App, id: i64) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;

    let team = app
        .client
        .get_team(id)
        .await
        .and_then(|envelope| envelope.into_data())
        .map_err(|e| app.explain(Action::LoadTeams, e))?;
    output::team_detail(&team);
    Ok(())
}

/// Draft a team from explicit IDs, optionally topped up from a
/// recommendation, then create it.
pub async fn create(
    app: &App,
    name: &str,
    description: Option<&str>,
    hero_ids: &[i64],
    recommend: Option<RecommendationKind>,
) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;

    let builder = TeamBuilder::new();
    builder.set_name(name);
    if let Some(description) = description {
        builder.set_description(description);
    }
    for id in hero_ids {
        if builder.selected().contains(id) {
            continue;
        }
        builder
            .toggle_hero(*id)
            .map_err(|e| app.explain(Action::CreateTeam, e))?;
    }

    if let Some(kind) = recommend {
        let rec = builder
            .recommend(&app.client, kind)
            .await
            .map_err(|e| app.explain(Action::Recommend, e))?;
        output::recommendation(&rec);
        match builder.select_all(&rec.ids()) {
            Ok(added) => println!("Added {} recommended heroes.\n", added),
            Err(e) => println!("{}\n", e),
        }
    }

    let team = builder
        .create(&app.client)
        .await
        .map_err(|e| app.explain(Action::CreateTeam, e))?;
    println!("Team created successfully!\n");
    output::team_detail(&team);
    Ok(())
}

pub async fn update(app: &App, id: i64, update: TeamUpdate) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;
    if update == TeamUpdate::default() {
        return Err(anyhow!("Nothing to update"));
    }

    let teams = TeamList::new();
    teams
        .load(&app.client)
        .await
        .map_err(|e| app.explain(Action::LoadTeams, e))?;
    let team = teams
        .update(&app.client, id, &update)
        .await
        .map_err(|e| app.explain(Action::UpdateTeam, e))?;

    println!("Team updated successfully!\n");
    output::team_detail(&team);
    Ok(())
}

pub async fn delete(app: &App, id: i64, skip_confirm: bool) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;

    let teams = TeamList::new();
    teams
        .load(&app.client)
        .await
        .map_err(|e| app.explain(Action::LoadTeams, e))?;
    let team = teams
        .require(id)
        .map_err(|e| app.explain(Action::DeleteTeam, e))?;

    if !skip_confirm && !confirm(&format!("Delete team \"{}\"?", team.name))? {
        println!("Cancelled.");
        return Ok(());
    }

    teams
        .delete(&app.client, id)
        .await
        .map_err(|e| app.explain(Action::DeleteTeam, e))?;
    println!("Team deleted successfully.");
    Ok(())
}

pub async fn compare(app: &App, first: i64, second: i64) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;

    let comparer = TeamComparer::new();
    comparer
        .select_pair(first, second)
        .map_err(|e| app.explain(Action::CompareTeams, e))?;
    let result = comparer
        .compare(&app.client)
        .await
        .map_err(|e| app.explain(Action::CompareTeams, e))?;
    output::comparison(&result);
    Ok(())
}

pub async fn recommend(app: &App, kind: RecommendationKind) -> Result<()> {
    app.enter_protected(TEAMS_ROUTE)?;

    let rec = TeamBuilder::new()
        .recommend(&app.client, kind)
        .await
        .map_err(|e| app.explain(Action::Recommend, e))?;
    output::recommendation(&rec);
    Ok(())
}

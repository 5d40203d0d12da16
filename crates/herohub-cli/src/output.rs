//! Plain-text rendering of core types.

use herohub_core::models::{Superhero, SuperheroPage, Team, TeamComparison, TeamScore, User};
use herohub_core::state::Recommendation;
use herohub_core::utils::{format_date, format_optional, stat_line, truncate_string};

/// Width of the name column in hero listings
const NAME_WIDTH: usize = 28;

pub fn user(user: &User) {
    println!("{} <{}>", user.full_name(), user.email);
    println!("  id:      {}", user.id);
    println!("  role:    {}", user.role);
    println!("  active:  {}", if user.is_active { "yes" } else { "no" });
    println!("  joined:  {}", format_date(user.created_at));
}

pub fn hero_row(hero: &Superhero) {
    let star = if hero.is_favorite() { "*" } else { " " };
    println!(
        "{}{:>5}  {:<width$}  {:<8}  {}",
        star,
        hero.id,
        truncate_string(&hero.name, NAME_WIDTH),
        hero.alignment_display(),
        format_optional(&hero.publisher, "-"),
        width = NAME_WIDTH,
    );
}

pub fn hero_page(page: &SuperheroPage) {
    if page.items.is_empty() {
        println!("No superheroes found.");
        return;
    }
    for hero in &page.items {
        hero_row(hero);
    }
    println!("\nPage {} of {} ({} heroes)", page.page, page.pages.max(1), page.total);
}

pub fn hero_list(heroes: &[Superhero], empty: &str) {
    if heroes.is_empty() {
        println!("{}", empty);
        return;
    }
    for hero in heroes {
        hero_row(hero);
    }
}

pub fn hero_detail(hero: &Superhero) {
    println!("{} (#{})", hero.name, hero.id);
    if hero.is_favorite() {
        println!("  * favorite");
    }
    println!("  {}", stat_line(hero));

    let fields = [
        ("Full name", &hero.full_name),
        ("Publisher", &hero.publisher),
        ("Alignment", &hero.alignment),
        ("Aliases", &hero.aliases),
        ("Gender", &hero.gender),
        ("Race", &hero.race),
        ("Height", &hero.height_cm),
        ("Weight", &hero.weight_kg),
        ("Place of birth", &hero.place_of_birth),
        ("First appearance", &hero.first_appearance),
        ("Occupation", &hero.occupation),
        ("Base", &hero.base),
        ("Group affiliation", &hero.group_affiliation),
        ("Relatives", &hero.relatives),
    ];
    for (label, value) in fields {
        if value.is_some() {
            println!("  {:<18} {}", label, format_optional(value, "-"));
        }
    }
}

pub fn team_row(team: &Team) {
    println!(
        "{:>5}  {:<24}  {} heroes  power {}",
        team.id,
        truncate_string(&team.name, 24),
        team.superheroes.len(),
        team.total_power()
    );
}

pub fn team_detail(team: &Team) {
    println!("{} (#{})", team.name, team.id);
    if let Some(ref description) = team.description {
        println!("  {}", description);
    }
    println!("  created {}", format_date(team.created_at));
    println!("  total power {}", team.total_power());
    for hero in &team.superheroes {
        hero_row(hero);
    }
}

pub fn recommendation(rec: &Recommendation) {
    match rec.stat {
        Some(ref stat) => println!("Recommended for {}:", stat),
        None => println!("Recommended:"),
    }
    hero_list(&rec.heroes, "  (no heroes matched)");
}

fn score_line(score: &TeamScore) {
    println!(
        "  {:<24} score {:>7.1}  total power {:>6.0}  members {}",
        truncate_string(&score.name, 24),
        score.score,
        score.stats.total_power,
        score.stats.member_count
    );
    let align = &score.stats.alignment_distribution;
    println!(
        "  {:<24} good {} / bad {} / neutral {}",
        "", align.good, align.bad, align.neutral
    );
}

pub fn comparison(cmp: &TeamComparison) {
    score_line(&cmp.team1);
    score_line(&cmp.team2);
    match cmp.winner_name() {
        Some(name) => println!("\nWinner: {} ({:.1})", name, cmp.winner.score),
        None => println!("\nIt's a tie ({:.1})", cmp.winner.score),
    }
    if !cmp.explanation.is_empty() {
        println!("{}", cmp.explanation);
    }
    for reason in &cmp.reasons {
        println!("  - {}", reason);
    }
}

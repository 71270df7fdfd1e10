//! Roster CLI commands
//!
//! Each mutating command loads the snapshot, applies one roster operation,
//! and saves before printing the result.

use anyhow::Result;

use super::output::Output;
use crate::domain::{Category, Character, CharacterId, RosterFilter, RosterStats, SortKey};
use crate::storage::Project;

pub fn add(output: &Output, name: &str, category: Option<Category>) -> Result<()> {
    let project = Project::open_current()?;
    let category = category.unwrap_or(project.config().default_category);
    output.verbose_ctx("add", &format!("Adding '{}' as {}", name.trim(), category));

    let mut session = project.session()?;
    let character = session.apply(|s| s.add(name, category))?.into_result()?;

    if output.is_json() {
        output.data(&character);
    } else {
        output.success(&format!(
            "Added #{} {} ({}, level {})",
            character.id, character.name, character.category, character.level
        ));
    }

    Ok(())
}

pub fn list(output: &Output, filter: Option<RosterFilter>, sort: Option<SortKey>) -> Result<()> {
    let project = Project::open_current()?;
    let filter = filter.unwrap_or(project.config().default_filter);
    let sort = sort.unwrap_or(project.config().default_sort);
    output.verbose_ctx("list", &format!("filter={}, sort={}", filter, sort));

    let session = project.session()?;
    let view = session.store().query(filter, sort);
    output.verbose_ctx(
        "list",
        &format!("{} of {} characters match", view.len(), session.store().len()),
    );

    if output.is_json() {
        output.data(&view);
    } else if view.is_empty() {
        println!("{}", filter.empty_message());
    } else {
        print_table(&view);
    }

    Ok(())
}

pub fn show(output: &Output, id: CharacterId) -> Result<()> {
    let project = Project::open_current()?;
    let session = project.session()?;

    let character = session
        .store()
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;

    if output.is_json() {
        output.data(character);
    } else {
        println!(
            "#{} {} {}",
            character.id,
            character.category.icon(),
            character.name
        );
        println!("Class:    {}", character.category);
        println!("Level:    {}", character.level);
        println!("Status:   {}", character.status_label());
        println!("Favorite: {}", if character.favorite { "yes" } else { "no" });
    }

    Ok(())
}

pub fn toggle_recruited(output: &Output, id: CharacterId) -> Result<()> {
    let project = Project::open_current()?;
    let mut session = project.session()?;
    let character = session.apply(|s| s.toggle_recruited(id))?.into_result()?;

    if output.is_json() {
        output.data(&character);
    } else if character.recruited {
        output.success(&format!("{} joined the party", character.name));
    } else {
        output.success(&format!("{} left the party", character.name));
    }

    Ok(())
}

pub fn toggle_favorite(output: &Output, id: CharacterId) -> Result<()> {
    let project = Project::open_current()?;
    let mut session = project.session()?;
    let character = session.apply(|s| s.toggle_favorite(id))?.into_result()?;

    if output.is_json() {
        output.data(&character);
    } else if character.favorite {
        output.success(&format!("{} marked as favorite", character.name));
    } else {
        output.success(&format!("{} is no longer a favorite", character.name));
    }

    Ok(())
}

pub fn level_up(output: &Output, id: CharacterId, times: u32) -> Result<()> {
    let project = Project::open_current()?;
    let mut session = project.session()?;
    output.verbose_ctx("level-up", &format!("Raising #{} by {} level(s)", id, times));

    let character = session
        .apply(|s| {
            let mut character = s.level_up(id)?;
            for _ in 1..times {
                character = s.level_up(id)?;
            }
            Ok(character)
        })?
        .into_result()?;

    if output.is_json() {
        output.data(&character);
    } else {
        output.success(&format!("{} is now level {}", character.name, character.level));
    }

    Ok(())
}

pub fn remove(output: &Output, id: CharacterId, yes: bool) -> Result<()> {
    let project = Project::open_current()?;
    let mut session = project.session()?;

    let name = session
        .store()
        .get(id)
        .map(|c| c.name.clone())
        .ok_or_else(|| anyhow::anyhow!("Character not found: {}", id))?;

    if !yes && !output.confirm(&format!("Remove {} from your party?", name))? {
        output.success("Cancelled");
        return Ok(());
    }

    let removed = session.apply(|s| s.remove(id))?.into_result()?;

    if output.is_json() {
        output.data(&serde_json::json!({ "removed": removed }));
    } else {
        output.success(&format!("Removed {}", removed.name));
    }

    Ok(())
}

pub fn recruit_all(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let mut session = project.session()?;
    let changed = session.apply_infallible(|s| s.recruit_all()).into_result()?;
    let in_party = session.store().stats().recruited;

    if output.is_json() {
        output.data(&serde_json::json!({ "recruited": changed, "in_party": in_party }));
    } else {
        output.success(&format!(
            "Recruited {} hero(es), {} in the party",
            changed, in_party
        ));
    }

    Ok(())
}

pub fn reset(output: &Output, yes: bool) -> Result<()> {
    let project = Project::open_current()?;
    let mut session = project.session()?;

    if !yes && !output.confirm("Remove every character from the roster?")? {
        output.success("Cancelled");
        return Ok(());
    }

    let removed = session.apply_infallible(|s| s.reset()).into_result()?;

    if output.is_json() {
        output.data(&serde_json::json!({ "removed": removed }));
    } else {
        output.success(&format!("Roster reset ({} removed)", removed));
    }

    Ok(())
}

pub fn stats(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let session = project.session()?;
    let stats = session.store().stats();

    if output.is_json() {
        output.data(&stats);
    } else {
        print_stats(&stats);
    }

    Ok(())
}

fn print_table(characters: &[Character]) {
    println!(
        "{:<5} {:<24} {:<8} {:>5}  {:<10} FAV",
        "ID", "NAME", "CLASS", "LEVEL", "STATUS"
    );
    println!("{}", "-".repeat(62));

    for c in characters {
        println!(
            "{:<5} {:<24} {:<8} {:>5}  {:<10} {}",
            c.id,
            c.name,
            c.category.name(),
            c.level,
            c.status_label(),
            if c.favorite { "*" } else { "" }
        );
    }
}

fn print_stats(stats: &RosterStats) {
    println!("Heroes in party: {}", stats.recruited);
    println!("Total:           {}", stats.total);
    println!("Available:       {}", stats.available);
    println!("Favorites:       {}", stats.favorites);
    println!("Average level:   {}", stats.average_level);

    if !stats.by_category.is_empty() {
        println!();
        println!("By class:");
        for (category, count) in &stats.by_category {
            println!("  {:<8} {}", category, count);
        }
    }
}

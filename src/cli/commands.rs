//! CLI command runners
//!
//! Every command talks to a running subtrack server through the API
//! client; nothing here touches the database directly.

use std::collections::HashSet;
use std::io::Write;

use chrono::{Local, TimeZone, Utc};
use colored::Colorize;

use crate::client::{ApiClient, SortKey, StreamerCache, StreamerFilter, sort_streamers};
use crate::stats;
use crate::storage::{HistoryEntry, Platform};

use super::{CliError, Commands};

/// Dispatch a parsed command. `Serve` is handled before dispatch in main.
pub fn run_command(command: Commands, api_url: Option<String>) -> Result<(), CliError> {
    let client = match api_url {
        Some(url) => ApiClient::new(&url),
        None => ApiClient::from_config(),
    };

    match command {
        Commands::Serve => unreachable!("serve is dispatched before run_command"),
        Commands::List {
            search,
            platform,
            min_subs,
            max_subs,
            sort,
            desc,
        } => list_streamers(&client, search, platform, min_subs, max_subs, sort, desc),
        Commands::Show { id } => show_streamer(&client, &id),
        Commands::Add {
            name,
            platform,
            subs,
        } => add_streamer(&client, &name, &platform, subs),
        Commands::Update { id, name, platform } => update_streamer(&client, &id, name, platform),
        Commands::Remove { id, yes } => remove_streamer(&client, &id, yes),
        Commands::Log { id, count, force } => log_count(&client, &id, count, force),
        Commands::Dashboard => dashboard(&client),
        Commands::Health => health(&client),
    }
}

/// Thousands-separated rendering, the CLI's `toLocaleString`
fn group_digits(n: i64) -> String {
    let raw = n.abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn signed(n: i64) -> String {
    if n >= 0 {
        format!("+{}", group_digits(n))
    } else {
        group_digits(n)
    }
}

fn parse_platform_flags(raw: &[String]) -> Result<Option<HashSet<Platform>>, CliError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut platforms = HashSet::new();
    for value in raw {
        platforms.insert(Platform::parse(value)?);
    }
    Ok(Some(platforms))
}

#[allow(clippy::too_many_arguments)]
fn list_streamers(
    client: &ApiClient,
    search: Option<String>,
    platform: Vec<String>,
    min_subs: Option<i64>,
    max_subs: Option<i64>,
    sort: SortKey,
    desc: bool,
) -> Result<(), CliError> {
    let cache = StreamerCache::new();
    cache.replace_all(client.list_streamers()?);

    let filter = StreamerFilter {
        search,
        platforms: parse_platform_flags(&platform)?,
        min_subs,
        max_subs,
    };

    let mut streamers = filter.apply(&cache.snapshot());
    sort_streamers(&mut streamers, sort, desc);

    if streamers.is_empty() {
        println!("{} No streamers found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Tracked streamers:".bold().green());
    println!();
    for s in &streamers {
        let current = stats::latest_count(&s.history);
        let growth = stats::tracked_growth(&s.history);
        println!(
            "  {:>4}  {} {} {} subs {} {}",
            s.id.cyan(),
            s.name.bold(),
            format!("[{}]", s.platform).yellow(),
            group_digits(current).green(),
            format!("({} updates)", s.history.len()).dimmed(),
            signed(growth).dimmed(),
        );
    }
    println!();
    println!(
        "{} Total {} streamers",
        "ℹ".bold().blue(),
        streamers.len().to_string().green()
    );
    Ok(())
}

fn show_streamer(client: &ApiClient, id: &str) -> Result<(), CliError> {
    let streamer = client.get_streamer(id)?;
    let stats = client.streamer_stats(id)?;

    println!(
        "{} {}",
        streamer.name.bold().green(),
        format!("[{}]", streamer.platform).yellow()
    );
    println!();
    println!(
        "  Current subscribers: {}",
        group_digits(stats.latest_count).green().bold()
    );
    if let Some(ts) = stats.last_update {
        if let Some(dt) = Utc.timestamp_millis_opt(ts).single() {
            println!(
                "  Last update:         {}",
                dt.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            );
        }
    }
    println!("  Updates recorded:    {}", stats.update_count);
    println!("  Weekly growth:       {}", signed(stats.weekly_growth));
    println!(
        "  Weekly earnings:     {} {}",
        group_digits(stats.weekly_earnings),
        format!("({}% of next block)", stats.target_progress_percent).dimmed()
    );
    println!(
        "  Monthly estimate:    {}",
        group_digits(stats.monthly_earnings_estimate)
    );
    println!(
        "  Tracked growth:      {} {}",
        signed(stats.tracked_growth),
        format!("(earned {})", group_digits(stats.tracked_earnings)).dimmed()
    );
    println!();
    println!("{}", "Weekly growth:".bold());
    for bucket in &stats.weekly_buckets {
        println!("  {}  {}", bucket.label.dimmed(), signed(bucket.growth));
    }
    Ok(())
}

fn add_streamer(client: &ApiClient, name: &str, platform: &str, subs: i64) -> Result<(), CliError> {
    let created = client.create_streamer(name, platform, subs)?;
    println!(
        "{} Added {} {} with {} subscribers (id {})",
        "✔".bold().green(),
        created.name.bold(),
        format!("[{}]", created.platform).yellow(),
        group_digits(subs).green(),
        created.id.cyan()
    );
    Ok(())
}

fn update_streamer(
    client: &ApiClient,
    id: &str,
    name: Option<String>,
    platform: Option<String>,
) -> Result<(), CliError> {
    if name.is_none() && platform.is_none() {
        return Err(CliError::CommandError(
            "Nothing to update: pass --name and/or --platform".to_string(),
        ));
    }

    // Merge with the current values so a partial edit works
    let existing = client.get_streamer(id)?;
    let name = name.unwrap_or(existing.name);
    let platform = platform.unwrap_or(existing.platform);

    let updated = client.update_streamer(id, &name, &platform)?;
    println!(
        "{} Updated {}: {} {}",
        "✔".bold().green(),
        updated.id.cyan(),
        updated.name.bold(),
        format!("[{}]", updated.platform).yellow()
    );
    Ok(())
}

fn remove_streamer(client: &ApiClient, id: &str, yes: bool) -> Result<(), CliError> {
    let streamer = client.get_streamer(id)?;

    if !yes {
        print!(
            "Are you sure you want to delete {}? [y/N] ",
            streamer.name.bold()
        );
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .map_err(|e| CliError::CommandError(format!("Failed to read input: {}", e)))?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            return Err(CliError::Aborted);
        }
    }

    client.delete_streamer(id)?;
    println!(
        "{} Deleted {} and its history",
        "✔".bold().green(),
        streamer.name.bold()
    );
    Ok(())
}

fn log_count(client: &ApiClient, id: &str, count: i64, force: bool) -> Result<(), CliError> {
    let cache = StreamerCache::new();
    cache.replace_all(client.list_streamers()?);

    let streamer = cache
        .find(id)
        .ok_or_else(|| CliError::CommandError(format!("Streamer not found: {}", id)))?;

    let config = crate::config::get_config();
    let now_ms = Utc::now().timestamp_millis();
    let cooldown_ms = config.tracker.update_cooldown_ms();

    if !force && !stats::can_record_update(&streamer.history, now_ms, cooldown_ms) {
        return Err(CliError::CommandError(format!(
            "You can only update subscribers once every {} hours for this streamer (use --force to override)",
            config.tracker.update_cooldown_hours
        )));
    }

    let row = client.append_history(id, count, now_ms)?;
    cache.append_entry(
        id,
        HistoryEntry {
            count: row.count,
            timestamp: row.timestamp,
        },
    );

    let latest = cache
        .find(id)
        .map(|s| stats::latest_count(&s.history))
        .unwrap_or(count);
    let previous = stats::count_at_or_before(&streamer.history, now_ms);
    println!(
        "{} Recorded {} for {} {}",
        "✔".bold().green(),
        group_digits(latest).green().bold(),
        streamer.name.bold(),
        signed(latest - previous).dimmed()
    );
    Ok(())
}

fn dashboard(client: &ApiClient) -> Result<(), CliError> {
    let cache = StreamerCache::new();
    cache.replace_all(client.list_streamers()?);

    let roster = cache.snapshot();
    let summary = stats::summarize(&roster);

    println!("{}", "Dashboard".bold().green());
    println!();
    println!(
        "  Total subscribers: {}",
        group_digits(summary.total_subs).green().bold()
    );
    println!("  Tracked streamers: {}", summary.total_streamers);
    println!("  Average subs:      {}", group_digits(summary.avg_subs));
    println!(
        "  Top streamer:      {}",
        summary.top_streamer.as_deref().unwrap_or("-").bold()
    );
    Ok(())
}

fn health(client: &ApiClient) -> Result<(), CliError> {
    match client.health() {
        Ok(body) => {
            let status = body["status"].as_str().unwrap_or("unknown");
            let database = body["database"].as_str().unwrap_or("unknown");
            println!(
                "{} Server is {} (database: {})",
                "✔".bold().green(),
                status.green(),
                database
            );
            Ok(())
        }
        Err(e) => Err(CliError::CommandError(format!("Server unreachable: {}", e))),
    }
}

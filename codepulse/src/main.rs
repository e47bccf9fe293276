//! codepulse - AI coding activity dashboard
//!
//! Load a usage export (or demo data) and report on any date window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use codepulse_core::analytics::DerivedView;
use codepulse_core::format::{compact_count, hour_label, hours, signed_percent, thousands};
use codepulse_core::{
    aggregate, AnalyticsModel, Config, DataSource, DateRange, LoadOptions, Loaded, Loader,
    RangePreset, HEATMAP_DAYS,
};

#[derive(Parser, Debug)]
#[command(name = "codepulse")]
#[command(about = "AI coding activity dashboard")]
#[command(version)]
struct Args {
    /// Usage export to load (default: import.default_path from config, else demo data)
    #[arg(long, conflicts_with = "demo")]
    file: Option<PathBuf>,

    /// Show generated demo data
    #[arg(long)]
    demo: bool,

    /// Seed for reproducible demo data
    #[arg(long)]
    seed: Option<u64>,

    /// Date window: today, 7d, 14d, 30d, 90d or all (default from config)
    #[arg(long, conflicts_with = "from")]
    range: Option<RangePreset>,

    /// Start of a custom window (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of a custom window (YYYY-MM-DD, default: today)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Print the canonical model as JSON instead of a range view
    #[arg(long)]
    model: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = codepulse_core::logging::init(&config.logging).ok();

    let now = match args.today {
        Some(day) => pinned_now(day)?,
        None => Utc::now(),
    };
    let today = now.date_naive();

    let mut synthetic = config.synthetic.clone();
    if args.seed.is_some() {
        synthetic.seed = args.seed;
    }
    let loader = Loader::new(LoadOptions {
        require_activity: config.import.require_activity,
        synthetic,
    })
    .with_now(now);

    let loaded = load(&loader, &args, &config)?;

    if args.model {
        println!("{}", serde_json::to_string_pretty(&loaded.model)?);
        return Ok(());
    }

    let range = match args.from {
        Some(from) => DateRange::custom(from, args.to.unwrap_or(today))
            .context("invalid date window")?,
        None => {
            let preset = match args.range {
                Some(preset) => preset,
                None => config
                    .dashboard
                    .range_preset()
                    .context("invalid dashboard.default_range")?,
            };
            DateRange::preset(preset, today)
        }
    };

    let view = aggregate(&loaded.model, &range);

    match args.export.as_deref() {
        Some("json") => print_json(&view, loaded.source)?,
        Some("md") => print_markdown(&loaded, &view),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&loaded, &view),
    }

    Ok(())
}

fn pinned_now(day: NaiveDate) -> Result<DateTime<Utc>> {
    day.and_hms_opt(12, 0, 0)
        .map(|naive| naive.and_utc())
        .context("invalid --today date")
}

/// An explicit `--file` must be readable; a configured default path that
/// cannot be read falls back to demo data.
fn load(loader: &Loader, args: &Args, config: &Config) -> Result<Loaded> {
    if args.demo {
        return Ok(loader.demo());
    }
    if let Some(path) = &args.file {
        return loader
            .load_file(path)
            .with_context(|| format!("failed to read export {}", path.display()));
    }
    match &config.import.default_path {
        Some(path) => match loader.load_file(path) {
            Ok(loaded) => Ok(loaded),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Configured export unreadable");
                Ok(loader.load(None))
            }
        },
        None => Ok(loader.load(None)),
    }
}

fn source_note(source: DataSource) -> &'static str {
    match source {
        DataSource::Imported => "imported usage export",
        DataSource::Demo => "demo data (no usable export found)",
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn print_terminal(loaded: &Loaded, view: &DerivedView) {
    let model = &loaded.model;
    let s = &view.summary;
    let title = format!("CODEPULSE: {}", view.range.label);

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!("   Source: {}", source_note(loaded.source));
    println!();

    if s.active_days == 0 {
        println!("  No activity found for this period.");
        println!();
        return;
    }

    println!("SUMMARY");
    println!(
        "   Conversations: {:<10} Messages:   ~{}",
        thousands(s.total_conversations),
        compact_count(s.estimated_messages)
    );
    println!(
        "   Lines:         {:<10} Time saved: {}h",
        compact_count(s.total_lines_generated),
        hours(s.total_time_saved)
    );
    println!(
        "   Acceptance:    {:<10} Projects:   {}",
        format!("{}%", s.avg_acceptance),
        s.projects_assisted
    );
    println!(
        "   Active days:   {:<10} Per day:    {}",
        s.active_days, s.avg_per_day
    );
    println!();

    println!("MODE & TOKENS");
    println!(
        "   Agent: {} ({}%)  │  Chat: {} ({}%)",
        view.mode_breakdown.agent,
        view.mode_breakdown.agent_percent,
        view.mode_breakdown.chat,
        view.mode_breakdown.chat_percent
    );
    println!(
        "   Tokens: {} in  │  {} out  │  {} total",
        compact_count(view.token_usage.input),
        compact_count(view.token_usage.output),
        compact_count(view.token_usage.total)
    );
    println!();

    println!("PATTERNS");
    println!("   Peak hour:    {}", hour_label(view.trends.peak_hour));
    println!("   Best day:     {}", view.trends.best_day_label());
    println!(
        "   Busiest date: {} ({} conversations)",
        s.busiest_day.date_label(),
        s.busiest_day.conversations
    );
    println!(
        "   Streak:       {} day{}",
        s.max_streak,
        plural(s.max_streak)
    );
    println!(
        "   Trend:        {} ({} → {})",
        signed_percent(view.trends.growth_percent),
        view.trends.last_week,
        view.trends.this_week
    );
    println!();

    print_activity(view);
    print_heatmap(model);

    if !model.language_breakdown.is_empty() {
        println!("LANGUAGES");
        for lang in model.language_breakdown.iter().take(6) {
            let bar = "█".repeat((lang.value / 4) as usize);
            println!("   {:<12} {:>3}% {}", lang.name, lang.value, bar);
        }
        println!();
    }

    if !model.conversations.is_empty() {
        println!("RECENT SESSIONS");
        for session in &model.conversations {
            println!(
                "   {:<13} {:<42} {:>6} lines",
                format!("[{}]", session.kind.as_str()),
                session.title,
                thousands(session.lines_generated)
            );
        }
        println!();
    }

    if !model.insights.is_empty() {
        println!("INSIGHTS");
        for insight in &model.insights {
            println!("   • {}", insight.message);
        }
        println!();
    }
}

/// Daily conversations as horizontal bars, most recent last.
fn print_activity(view: &DerivedView) {
    const MAX_ROWS: usize = 14;
    const BAR_WIDTH: f64 = 40.0;

    let days = &view.daily_activity;
    let Some(max) = days.iter().map(|d| d.conversations).max().filter(|m| *m > 0) else {
        return;
    };

    println!("DAILY ACTIVITY");
    for day in &days[days.len().saturating_sub(MAX_ROWS)..] {
        let width = (day.conversations as f64 / max as f64 * BAR_WIDTH).round() as usize;
        println!(
            "   {} {:>4} {}",
            day.date.format("%a %b %d"),
            day.conversations,
            "▇".repeat(width)
        );
    }
    println!();
}

fn print_heatmap(model: &AnalyticsModel) {
    const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

    println!("WEEKLY RHYTHM (hour 0-23)");
    for (row, day) in model.hourly_heatmap.chunks(24).zip(HEATMAP_DAYS) {
        let line: String = row
            .iter()
            .map(|cell| {
                let level = (cell.intensity * (SHADES.len() - 1) as f64).round() as usize;
                SHADES[level.min(SHADES.len() - 1)]
            })
            .collect();
        println!("   {} │{}│", codepulse_core::weekday_short_name(day), line);
    }
    println!();
}

fn print_markdown(loaded: &Loaded, view: &DerivedView) {
    let model = &loaded.model;
    let s = &view.summary;

    println!("# Codepulse: {}", view.range.label);
    println!();
    println!("*Source: {}*", source_note(loaded.source));
    println!();

    if s.active_days == 0 {
        println!("*No activity found for this period.*");
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Conversations | {} |", thousands(s.total_conversations));
    println!("| Estimated messages | {} |", thousands(s.estimated_messages));
    println!("| Lines generated | {} |", thousands(s.total_lines_generated));
    println!("| Time saved | {}h |", hours(s.total_time_saved));
    println!("| Acceptance | {}% |", s.avg_acceptance);
    println!("| Active days | {} |", s.active_days);
    println!("| Avg per day | {} |", s.avg_per_day);
    println!("| Projects | {} |", s.projects_assisted);
    println!("| Files modified | {} |", thousands(s.files_modified));
    println!();

    println!("## Patterns");
    println!();
    println!("- **Peak hour:** {}", hour_label(view.trends.peak_hour));
    println!("- **Best day:** {}", view.trends.best_day_label());
    println!(
        "- **Busiest date:** {} ({} conversations)",
        s.busiest_day.date_label(),
        s.busiest_day.conversations
    );
    println!("- **Longest streak:** {} days", s.max_streak);
    println!(
        "- **Trend:** {} ({} → {})",
        signed_percent(view.trends.growth_percent),
        view.trends.last_week,
        view.trends.this_week
    );
    println!();

    println!("## Mode and Tokens");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!(
        "| Agent | {} ({}%) |",
        view.mode_breakdown.agent, view.mode_breakdown.agent_percent
    );
    println!(
        "| Chat | {} ({}%) |",
        view.mode_breakdown.chat, view.mode_breakdown.chat_percent
    );
    println!("| Input tokens | {} |", thousands(view.token_usage.input));
    println!("| Output tokens | {} |", thousands(view.token_usage.output));
    println!();

    if !model.language_breakdown.is_empty() {
        println!("## Languages");
        println!();
        for lang in &model.language_breakdown {
            println!("- **{}** {}%", lang.name, lang.value);
        }
        println!();
    }

    if !model.insights.is_empty() {
        println!("## Insights");
        println!();
        for insight in &model.insights {
            println!("- {}", insight.message);
        }
        println!();
    }

    println!("---");
    println!("*Generated by codepulse*");
}

fn print_json(view: &DerivedView, source: DataSource) -> Result<()> {
    let json = serde_json::json!({
        "source": source.as_str(),
        "view": view,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

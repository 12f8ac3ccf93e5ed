use std::io::IsTerminal;

use chrono::Duration;
use owo_colors::OwoColorize;

use crate::analytics::correlation::CorrelationStrength;
use crate::analytics::forecast::ForecastTrend;
use crate::analytics::risk::LoadLevel;
use crate::analytics::trends::TrendDirection;
use crate::analytics::{AnalysisError, VelocityReport};

/// Longest stale-PR title shown before truncation
const TITLE_WIDTH: usize = 40;

const SEPARATOR_WIDTH: usize = 60;

const BAR_GLYPH: &str = "■";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Render a duration with its two most significant units.
///
/// Months are 30 days and years 365 days. Negative durations render as `0s`.
pub fn humanize_duration(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        return format!("{}s", secs);
    }
    if hours < 1 {
        return format!("{}m {}s", minutes, secs % 60);
    }
    if days < 1 {
        return format!("{}h {}m", hours, minutes % 60);
    }
    if days < 30 {
        return format!("{}d {}h", days, hours % 24);
    }

    let months = days / 30;
    if months < 12 {
        return format!("{}mo {}d", months, days % 30);
    }

    format!("{}y {}mo", days / 365, (days % 365) / 30)
}

/// Truncate title to `max_width` characters, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    if title.chars().count() <= max_width {
        title.to_string()
    } else {
        format!("{}...", title.chars().take(max_width).collect::<String>())
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Warn,
    Bad,
    Muted,
}

fn paint(text: &str, tone: Tone, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match tone {
        Tone::Good => text.green().to_string(),
        Tone::Warn => text.yellow().to_string(),
        Tone::Bad => text.red().to_string(),
        Tone::Muted => text.dimmed().to_string(),
    }
}

fn heading(title: &str, subtitle: &str, use_colors: bool) -> Vec<String> {
    let title = if use_colors {
        title.bold().to_string()
    } else {
        title.to_string()
    };
    vec![
        title,
        format!("   {}", paint(subtitle, Tone::Muted, use_colors)),
        String::new(),
    ]
}

fn no_data(err: &AnalysisError, use_colors: bool) -> String {
    let text = match err {
        AnalysisError::EmptySample => "(no data)".to_string(),
        other => format!("({})", other),
    };
    format!("   {}", paint(&text, Tone::Muted, use_colors))
}

/// Format the full text report, one section per analysis.
pub fn format_report(report: &VelocityReport, use_colors: bool) -> String {
    let mut summary = vec![format!(
        "Analyzed {} merged and {} open pull requests",
        report.merged_count, report.open_count
    )];
    if let Some(trim) = report.outliers {
        summary.push(format!(
            "✂️  Outlier filtering active. Reduced from {} to {} PRs.",
            trim.before, trim.after
        ));
    }

    let sections = [
        summary,
        general_section(report, use_colors),
        review_section(report, use_colors),
        correlation_section(report, use_colors),
        hotspot_section(report, use_colors),
        long_tail_section(report, use_colors),
        trend_section(report, use_colors),
        forecast_section(report, use_colors),
        histogram_section(report, use_colors),
        hero_section(report, use_colors),
        stale_section(report, use_colors),
        ghost_section(report, use_colors),
    ];

    let separator = format!("\n{}\n", "-".repeat(SEPARATOR_WIDTH));
    sections
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Format the report as pretty-printed JSON
pub fn format_json(report: &VelocityReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn general_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "📊 GENERAL STATISTICS",
        "Creation-to-merge time across merged PRs. A mean far above the median means outliers.",
        use_colors,
    );
    match &report.general {
        Ok(stats) => {
            lines.push(format!("   Count:   {}", stats.count));
            lines.push(format!("   Average: {}", humanize_duration(stats.mean)));
            lines.push(format!("   Median:  {}", humanize_duration(stats.median)));
            lines.push(format!("   Min:     {}", humanize_duration(stats.min)));
            lines.push(format!("   Max:     {}", humanize_duration(stats.max)));
        }
        Err(e) => lines.push(no_data(e, use_colors)),
    }
    lines
}

fn review_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "🚦 REVIEW EFFICIENCY",
        "Waiting for a first review vs. first review to merge.",
        use_colors,
    );
    match &report.review {
        Ok(phases) => match &phases.averages {
            Some(avg) => {
                lines.push(format!(
                    "   Avg time to first review: {} (triage speed)",
                    humanize_duration(avg.wait)
                ));
                lines.push(format!(
                    "   Avg review to merge:      {} (fixing speed)",
                    humanize_duration(avg.review)
                ));
                lines.push(format!(
                    "   Based on {} of {} merged PRs with a review",
                    phases.reviewed, phases.total
                ));
            }
            None => lines.push("   No reviews detected (direct merges?).".to_string()),
        },
        Err(e) => lines.push(no_data(e, use_colors)),
    }
    lines
}

fn correlation_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "📐 SIZE vs SPEED",
        "Correlation between lines changed and merge time.",
        use_colors,
    );
    match &report.correlation {
        Ok(c) => {
            lines.push(format!(
                "   Correlation coefficient: {:.2} (range -1.0 to +1.0, {} PRs)",
                c.coefficient, c.sample_size
            ));
            let (text, tone) = match c.strength {
                CorrelationStrength::Strong => (
                    "🚨 Strong correlation: larger PRs take much longer. Split work into smaller PRs.",
                    Tone::Bad,
                ),
                CorrelationStrength::Moderate => (
                    "⚠️  Moderate correlation: size matters, but look for process bottlenecks too.",
                    Tone::Warn,
                ),
                CorrelationStrength::Weak => (
                    "✅ Weak correlation: small PRs stall as often as big ones. Suspect the process.",
                    Tone::Good,
                ),
            };
            lines.push(format!("   {}", paint(text, tone, use_colors)));
        }
        Err(e) => lines.push(no_data(e, use_colors)),
    }
    lines
}

fn hotspot_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "🔥 DIRECTORY HOTSPOTS",
        "Mean merge time by top-level directory, slowest first.",
        use_colors,
    );
    if report.hotspots.is_empty() {
        lines.push(no_data(&AnalysisError::EmptySample, use_colors));
    }
    for h in &report.hotspots {
        lines.push(format!(
            "   {:<20}: {} (avg over {} PRs)",
            h.directory,
            humanize_duration(h.mean),
            h.pr_count
        ));
    }
    lines
}

fn long_tail_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "🐌 LONG TAIL CONTRIBUTORS",
        "Authors most often found in the slowest 10% of merges.",
        use_colors,
    );
    if report.long_tail.is_empty() {
        lines.push(no_data(&AnalysisError::EmptySample, use_colors));
        return lines;
    }
    for a in &report.long_tail {
        lines.push(format!("   {:<15}: {} slow PRs", a.author, a.slow_prs));
    }
    lines.push(format!(
        "   {}",
        paint(
            "(These authors may be handling the hardest work, not working slowly.)",
            Tone::Muted,
            use_colors
        )
    ));
    lines
}

fn trend_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "📈 MONTHLY TRENDS",
        "Mean merge time per month: 🚀 faster, 🐢 slower than the month before.",
        use_colors,
    );
    if report.trends.is_empty() {
        lines.push(no_data(&AnalysisError::EmptySample, use_colors));
    }
    for t in &report.trends {
        let glyph = match t.direction {
            Some(TrendDirection::Improving) => "🚀",
            Some(TrendDirection::Degrading) => "🐢",
            Some(TrendDirection::Flat) => "➖",
            None => "",
        };
        lines.push(
            format!(
                "   {}: {:<15} ({:>2} PRs) {}",
                t.month,
                humanize_duration(t.mean),
                t.count,
                glyph
            )
            .trim_end()
            .to_string(),
        );
    }
    lines
}

fn forecast_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "🔮 FORECAST",
        "Moving average of the last three months of merges.",
        use_colors,
    );
    match &report.forecast {
        Ok(f) => {
            lines.push(format!("   Based on last {} months:", f.basis.len()));
            for b in &f.basis {
                lines.push(format!("   - {}: {}", b.month, humanize_duration(b.mean)));
            }
            let (glyph, text, tone) = match f.trend {
                ForecastTrend::SlowingDown => ("📉", "Slowing Down", Tone::Bad),
                ForecastTrend::SpeedingUp => ("📈", "Speeding Up", Tone::Good),
                ForecastTrend::Stable => ("➡️", "Stable", Tone::Muted),
            };
            lines.push(String::new());
            lines.push(format!(
                "   🎯 Projection: ~{} / PR",
                humanize_duration(f.projected)
            ));
            lines.push(format!(
                "   🏁 Trend:      {} {}",
                glyph,
                paint(text, tone, use_colors)
            ));
        }
        Err(AnalysisError::InsufficientHistory { months, required }) => {
            lines.push(format!(
                "   {}",
                paint(
                    &format!(
                        "(Not enough history for a forecast: {} month(s), need {}.)",
                        months, required
                    ),
                    Tone::Muted,
                    use_colors
                )
            ));
        }
        Err(e) => lines.push(no_data(e, use_colors)),
    }
    lines
}

fn histogram_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "📊 MERGE TIME DISTRIBUTION",
        "Merged PRs per duration bucket.",
        use_colors,
    );
    match &report.histogram {
        Ok(h) => {
            for b in &h.buckets {
                let bar = BAR_GLYPH.repeat(h.bar_length(b.count));
                lines.push(format!(
                    "   {:<10} : {:<20} ({})",
                    b.bucket.label(),
                    bar,
                    b.count
                ));
            }
        }
        Err(e) => lines.push(no_data(e, use_colors)),
    }
    lines
}

fn hero_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "🦸 HERO DETECTOR",
        "Reviewers carrying a disproportionate share of reviews on open PRs.",
        use_colors,
    );
    match &report.heroes {
        Ok(heroes) => {
            for r in &heroes.reviewers {
                let (label, tone) = match r.level {
                    LoadLevel::Critical => ("🚨 CRITICAL RISK", Tone::Bad),
                    LoadLevel::HighLoad => ("⚠️  High Load", Tone::Warn),
                    LoadLevel::Notable => ("✅ Healthy", Tone::Good),
                };
                lines.push(format!(
                    "   {}: {} reviews ({:.1}%) - {}",
                    r.reviewer,
                    r.reviews,
                    r.share,
                    paint(label, tone, use_colors)
                ));
            }
            let verdict = if heroes.is_well_distributed() {
                Some("✅ Load is well distributed. No single reviewer is a bottleneck.")
            } else if !heroes.reviewers.iter().any(|r| r.level.is_risk()) {
                Some("✅ No reviewer carries more than 30% of reviews.")
            } else {
                None
            };
            if let Some(text) = verdict {
                lines.push(format!("   {}", paint(text, Tone::Good, use_colors)));
            }
        }
        Err(AnalysisError::EmptySample) => {
            lines.push("   No reviews found on open PRs.".to_string());
        }
        Err(e) => lines.push(no_data(e, use_colors)),
    }
    lines
}

fn stale_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "📉 STALE PULL REQUESTS",
        "Open PRs untouched for more than 7 days.",
        use_colors,
    );
    if report.stale.is_empty() {
        lines.push(format!(
            "   {}",
            paint("✅ Clean board! No stale PRs found.", Tone::Good, use_colors)
        ));
        return lines;
    }
    for pr in &report.stale {
        lines.push(format!(
            "   💀 #{} ({}) by {} - {} days inactive",
            pr.number,
            truncate_title(&pr.title, TITLE_WIDTH),
            pr.author,
            paint(&pr.inactive_days.to_string(), Tone::Bad, use_colors)
        ));
    }
    lines
}

fn ghost_section(report: &VelocityReport, use_colors: bool) -> Vec<String> {
    let mut lines = heading(
        "👻 GHOST REVIEWERS",
        "Requested reviewers who have not responded within 48 hours.",
        use_colors,
    );
    if report.ghosts.is_empty() {
        lines.push(format!(
            "   {}",
            paint("✅ No ghosts found.", Tone::Good, use_colors)
        ));
        return lines;
    }
    for g in &report.ghosts {
        lines.push(format!(
            "   👻 {}: blocking {} PRs (>48h)",
            g.reviewer, g.blocked_prs
        ));
    }
    lines
}

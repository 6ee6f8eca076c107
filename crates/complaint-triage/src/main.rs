mod bootstrap;
mod report;

use anyhow::{bail, Context, Result};
use triage_core::rules::RuleSet;
use triage_core::settings::Settings;
use triage_data::loader::{LoadPolicy, LoaderOptions, Source};
use triage_runtime::backend::ComplaintBackend;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Complaint Triage v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.clear && settings.sources.is_empty() {
        tracing::info!("Saved configuration cleared");
        return Ok(());
    }

    let rules = load_rules(&settings)?;
    tracing::info!(
        "Rules: {} ({} categories), View: {}, Format: {}",
        rules.version(),
        rules.len(),
        settings.view,
        settings.format
    );

    let sources = settings.sources.iter().cloned().map(Source::Path);
    let backend = ComplaintBackend::from_sources(rules, loader_options(&settings), sources)
        .context("loading complaint sources")?;

    let outcome = backend.last_outcome()?;
    if outcome.is_partial() && !settings.wants_json() {
        eprint!("{}", report::render_failures(&outcome.failures));
    }

    print!("{}", render_view(&settings, &backend)?);
    Ok(())
}

fn load_rules(settings: &Settings) -> Result<RuleSet> {
    match &settings.rules {
        Some(path) => RuleSet::from_file(path)
            .with_context(|| format!("reading rules from {}", path.display())),
        None => Ok(RuleSet::builtin()),
    }
}

fn loader_options(settings: &Settings) -> LoaderOptions {
    LoaderOptions {
        policy: if settings.fail_fast {
            LoadPolicy::FailFast
        } else {
            LoadPolicy::Partial
        },
        drop_blank_text: !settings.keep_blank,
    }
}

/// Render the selected view of a loaded backend as table text or JSON.
fn render_view(settings: &Settings, backend: &ComplaintBackend) -> Result<String> {
    let json = settings.wants_json();

    let text = match settings.view.as_str() {
        "summary" if json => serde_json::to_string_pretty(&backend.report()?)?,
        "summary" => report::render_summary(&backend.get_summary_stats()?),

        "chart" if json => serde_json::to_string_pretty(&backend.get_chart_data()?)?,
        "chart" => report::render_chart(&backend.get_chart_data()?),

        "ranking" if json => serde_json::to_string_pretty(&backend.get_priority_ranking()?)?,
        "ranking" => report::render_ranking(&backend.get_priority_ranking()?),

        "goals" => {
            let mapping = backend.get_business_goal_mapping()?;
            let counts = backend.get_business_goal_counts()?;
            if json {
                serde_json::to_string_pretty(&serde_json::json!({
                    "goal_mapping": mapping,
                    "goal_counts": counts,
                }))?
            } else {
                report::render_goals(&mapping, &counts)
            }
        }

        "category" => {
            let Some(name) = settings.category.as_deref() else {
                bail!("--view category requires --category <NAME>");
            };
            let records = backend.filter_by_category(name)?;
            if json {
                serde_json::to_string_pretty(&records)?
            } else {
                report::render_records(name, &records)
            }
        }

        "goal" => {
            let Some(goal) = settings.goal.as_deref() else {
                bail!("--view goal requires --goal <GOAL>");
            };
            let records = backend.filter_by_business_goal(goal)?;
            if json {
                serde_json::to_string_pretty(&records)?
            } else {
                report::render_records(triage_core::formatting::display_goal(goal), &records)
            }
        }

        other => bail!("Unknown view: {other}"),
    };

    Ok(if text.ends_with('\n') {
        text
    } else {
        format!("{text}\n")
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

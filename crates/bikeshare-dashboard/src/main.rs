mod bootstrap;

use anyhow::{bail, Context, Result};
use bikeshare_core::settings::Settings;
use bikeshare_runtime::data_manager::DatasetHandle;
use bikeshare_runtime::orchestrator::DashboardOrchestrator;
use bikeshare_ui::app::App;
use bikeshare_ui::summary::render_summary;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = bootstrap::resolve_log_file(
        settings.log_file.as_deref(),
        settings.is_interactive(),
        &app_dir,
    );
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Bike sharing dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, View: {}, Theme: {}",
        settings.data.display(),
        settings.view,
        settings.theme
    );

    // Loader failures are fatal: nothing to show without the table.
    let dataset = DatasetHandle::load(&settings.data)
        .with_context(|| format!("could not load {}", settings.data.display()))?;

    let Some(bounds) = dataset.bounds() else {
        bail!("{} contains no records", settings.data.display());
    };
    let initial = settings.initial_range(&bounds);
    if initial.is_inverted() {
        tracing::warn!(range = %initial, "initial range starts after it ends");
    }

    if settings.is_interactive() {
        tracing::info!("Starting interactive dashboard...");

        let orchestrator = DashboardOrchestrator::new(
            dataset,
            settings.top_n(),
            Some(initial.clamp_to(&bounds)),
        );
        let (tx, rx, handle) = orchestrator.start();

        let app = App::new(&settings.theme, bounds, initial);

        // 'q' / Ctrl+C inside the TUI end the loop; the OS-level handler
        // covers signals that arrive outside raw mode.
        tokio::select! {
            result = app.run_dashboard(tx, rx) => {
                handle.abort();
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received; shutting down");
                handle.abort();
            }
        }
    } else {
        tracing::info!("Rendering summary for {}", initial);
        let snapshot = dataset.analyze(initial, settings.top_n());
        print!("{}", render_summary(&snapshot));
    }

    Ok(())
}

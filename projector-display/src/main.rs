//! Projector Display - headless render check
//!
//! Loads the display configuration, starts logging and drives one render
//! pass through every configured target with recording scenes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use projector_display::scene::RecordingScene;
use projector_display::{
    init_logging, BlankRasterizer, DisplayConfig, OutputManager, PassiveText, Size, StyleSet, StyleSettings, TargetId,
    Verse,
};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DisplayConfig::load(&path),
        None => DisplayConfig::load_default(),
    }
    .context("Failed to load display configuration")?;

    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    tracing::info!("Starting Projector Display v{}", env!("CARGO_PKG_VERSION"));

    let screens = vec![Size::new(1920, 1080); config.displays.len().max(1)];
    let mut manager = OutputManager::with_config(Arc::new(BlankRasterizer), screens, &config);

    let mut targets = manager.assignment().active_targets();
    targets.push(TargetId::Virtual);
    for id in targets {
        manager
            .attach_scene(id, Box::new(RecordingScene::new()))
            .with_context(|| format!("Failed to attach scene to {}", id))?;
    }

    let styles = StyleSet::uniform(StyleSettings::default());
    let passes = [
        manager.render_passive_text(
            &PassiveText {
                caption: "Welcome".to_string(),
            },
            &styles,
        ),
        manager.render_bible_text(&Verse::default(), &styles),
        manager.render_not_text(),
    ];
    for outcomes in &passes {
        for (id, outcome) in outcomes {
            tracing::info!(target_id = %id, ?outcome, "Render outcome");
        }
    }

    for event in manager.drain_events() {
        tracing::info!(target_id = %event.target, event = ?event.event, "Display event");
    }
    Ok(())
}

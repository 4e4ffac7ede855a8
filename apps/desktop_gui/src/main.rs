mod audio;
mod backend_bridge;
mod config;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::{
    audio::SoundEngine,
    backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread},
    config::{AppPaths, CliArgs, StartupConfig},
    controller::events::UiEvent,
    ui::{
        app::{PersistedWindowState, WINDOW_STATE_STORAGE_KEY},
        CalculatorApp,
    },
};

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    let startup = StartupConfig::load(&cli)?;

    // RUST_LOG wins unless --log-filter was given.
    let filter = match (&cli.log_filter, EnvFilter::try_from_default_env()) {
        (None, Ok(env_filter)) => env_filter,
        _ => EnvFilter::try_new(&startup.log_filter)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let paths = AppPaths::from_startup(&startup)?;
    tracing::info!(
        data_root = %paths.data_root.display(),
        db_path = %paths.db_path.display(),
        database_url = %paths.database_url,
        "starting nebula calc"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    spawn_backend_thread(paths.database_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nebula Calc")
            .with_inner_size([380.0, 640.0])
            .with_min_inner_size([320.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Nebula Calc",
        options,
        Box::new(move |cc| {
            let window_state = cc.storage.and_then(|storage| {
                storage
                    .get_string(WINDOW_STATE_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedWindowState>(&text).ok())
            });
            Ok(Box::new(CalculatorApp::new(
                cmd_tx,
                ui_rx,
                &startup,
                SoundEngine::with_tracing_sink(false),
                window_state,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}

use citygen::{Phase, Simulation, SimulationParams};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

/// Генератор рельефа с эрозией и городом в устье реки
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию: эталонные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределяет сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Сколько тиков симулировать
    #[arg(short, long, default_value_t = 2000)]
    ticks: u64,

    /// После скольких тиков эрозия ставится на паузу и начинается поиск места
    #[arg(long, default_value_t = 1000)]
    erosion_ticks: u64,

    /// Путь для сохранения карты высот
    #[arg(long, default_value = "height.png")]
    height_png: PathBuf,

    /// Путь для сохранения превью с городом
    #[arg(long, default_value = "preview.png")]
    preview_png: PathBuf,

    /// Путь для сохранения места и событий города в JSON
    #[arg(long)]
    events_json: Option<PathBuf>,
}

#[derive(Serialize)]
struct CityReport<'a> {
    site: Option<citygen::CitySite>,
    ticks: u64,
    events: &'a [citygen::PlacementEvent],
}

fn path_str(path: &std::path::Path) -> Result<&str, Box<dyn std::error::Error>> {
    path.to_str()
        .ok_or_else(|| format!("Path is not valid UTF-8: {}", path.display()).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            SimulationParams::from_toml_file(path_str(path)?)?
        }
        None => SimulationParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }

    log::info!(
        "Generating terrain {0}×{0} with seed {1}",
        params.grid_size,
        params.seed
    );
    let mut sim = Simulation::new(params)?;

    for tick in 0..cli.ticks {
        if tick == cli.erosion_ticks && !sim.erosion_paused() {
            sim.toggle_erosion();
        }
        sim.step();
    }

    match sim.phase() {
        Phase::Building => log::info!(
            "City grown: {} placement events after {} ticks",
            sim.events().len(),
            sim.ticks()
        ),
        Phase::Searching => log::warn!("No city site found in {} ticks", sim.ticks()),
        Phase::Eroding => log::info!("Still eroding after {} ticks", sim.ticks()),
    }

    log::info!("Saving heightmap to {}", cli.height_png.display());
    sim.world().terrain.save_as_png(path_str(&cli.height_png)?)?;

    log::info!("Saving preview to {}", cli.preview_png.display());
    citygen::preview::save_preview(sim.world(), sim.events(), 4, path_str(&cli.preview_png)?)?;

    if let Some(path) = &cli.events_json {
        let report = CityReport {
            site: sim.site(),
            ticks: sim.ticks(),
            events: sim.events(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        log::info!("City report written to {}", path.display());
    }

    Ok(())
}

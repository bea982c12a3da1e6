//! Relic - headless inspection host for 3D scans of artifacts
//!
//! Loads a scan from a local file or from the backend by model id, runs
//! the full viewer pipeline (parse, normalize, decompose, camera fit,
//! explode ticks) without a GPU surface, and reports a summary.

mod settings;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use relic_asset::load_mesh_or_placeholder;
use relic_client::ApiClient;
use relic_viewer::{DisplayMode, Viewer};
use settings::Settings;

const TICK: f32 = 1.0 / 60.0;

struct Args {
    source: String,
    explode: f32,
    triangles: bool,
    ticks: u32,
}

fn parse_args() -> Result<Args> {
    let mut source = None;
    let mut explode = 0.0f32;
    let mut triangles = false;
    let mut ticks = 120u32;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--explode" => {
                explode = args
                    .next()
                    .context("--explode requires a value")?
                    .parse()
                    .context("--explode value must be a number")?;
            }
            "--triangles" => triangles = true,
            "--ticks" => {
                ticks = args
                    .next()
                    .context("--ticks requires a value")?
                    .parse()
                    .context("--ticks value must be an integer")?;
            }
            _ if source.is_none() => source = Some(arg),
            other => bail!("Unexpected argument: {}", other),
        }
    }

    let Some(source) = source else {
        bail!("Usage: relic <file-path | model-id> [--explode <amount>] [--triangles] [--ticks <n>]");
    };

    Ok(Args {
        source,
        explode,
        triangles,
        ticks,
    })
}

/// Fetch a scan's bytes plus its declared format tag.
///
/// A numeric source is a backend model id; anything else is a local path
/// whose extension is used as the tag.
fn fetch_scan(source: &str, settings: &Settings) -> Result<(Vec<u8>, String)> {
    if let Ok(model_id) = source.parse::<u64>() {
        let client = ApiClient::new(settings.backend.base_url.clone())
            .context("Failed to create backend client")?;

        let record = client
            .fetch_model(model_id)
            .wait()
            .context("Failed to fetch model metadata")?;
        info!("Downloading {} ({})", record.name, record.file_type);

        let download = client.download_model(model_id);
        let bytes = loop {
            if let Some(progress) = download.try_progress() {
                match progress.fraction() {
                    Some(fraction) => {
                        info!("Downloaded {:.0}%", fraction * 100.0)
                    }
                    None => info!("Downloaded {} bytes", progress.bytes_loaded),
                }
            }
            if let Some(result) = download.try_recv() {
                break result.context("Download failed")?;
            }
            std::thread::sleep(Duration::from_millis(50));
        };

        return Ok((bytes, record.file_type));
    }

    let path = Path::new(source);
    let tag = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", source))?;
    Ok((bytes, tag))
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let args = parse_args()?;
    let settings = Settings::load_or_init();

    let (bytes, tag) = fetch_scan(&args.source, &settings)?;
    info!("Read {} bytes (format tag {:?})", bytes.len(), tag);

    let mut viewer = Viewer::new(settings.viewer_config());
    let generation = viewer.begin_load();
    let asset = load_mesh_or_placeholder(&bytes, &tag);
    viewer.commit_load(generation, Ok(asset));

    if args.triangles {
        viewer.set_display_mode(DisplayMode::Triangles);
    }
    viewer.set_explode_amount(args.explode);
    for _ in 0..args.ticks {
        viewer.tick(TICK);
    }

    let asset = viewer
        .asset()
        .context("No asset installed after load")?;
    let size = asset.bounds.size();
    info!("Model: {}", asset.name);
    info!(
        "  sub-meshes: {}, triangles: {}",
        asset.sub_meshes.len(),
        asset.triangle_count()
    );
    info!(
        "  pickable faces: {}{}",
        viewer.faces().len(),
        if viewer.faces().truncated {
            " (truncated)"
        } else {
            ""
        }
    );
    info!(
        "  bounds: {:.2} x {:.2} x {:.2}",
        size.x, size.y, size.z
    );
    let camera = viewer.camera();
    info!(
        "  camera at ({:.2}, {:.2}, {:.2}) looking at ({:.2}, {:.2}, {:.2})",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.target.x,
        camera.target.y,
        camera.target.z
    );
    info!("  base mesh visible: {}", viewer.base_mesh_visible());

    Ok(())
}

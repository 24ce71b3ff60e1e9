//! Binary entry point: logging + the app builder.
//!
//! Controls:
//! - `W`/`A`/`S`/`D` — walk and strafe (forward blocked near picked walls)
//! - left-drag — look around
//! - right-click — pick the triangle under the cursor
//! - hold `1` — wireframe
//! - `Esc` — quit

mod builder;
mod graphics;
mod runner;
mod scene;

use builder::App;

fn setup_logging() -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    setup_logging()?;
    App::new().with_title("Tidewater").with_size(1280, 720).run()
}

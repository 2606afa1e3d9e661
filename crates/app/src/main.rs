//! Entry point for texlab: pick a recipe from the command line and run it.

mod cli;
mod config;

use std::process::ExitCode;

use asset::AssetPaths;
use platform::PlatformConfig;
use renderer::Scene;

use crate::{cli::CliError, config::AppConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args();
    let exe = args.next().unwrap_or_else(|| "texlab".to_owned());
    let recipe = match cli::parse_args(args) {
        Ok(recipe) => recipe,
        Err(err) => {
            if let CliError::UnknownRecipe(_) = err {
                println!("{err}");
            }
            print!("{}", cli::usage(&exe));
            return ExitCode::FAILURE;
        }
    };

    let config = AppConfig::from_env();
    log::info!(
        "Starting texlab. recipe={recipe}, backends={:?}, show_fps={}, shaders={}, media={}",
        config.backends,
        config.show_fps,
        config.shader_dir.display(),
        config.media_dir.display()
    );

    let scene = Scene::new(recipe, AssetPaths::new(config.shader_dir, config.media_dir));
    let platform = PlatformConfig {
        title: format!("texlab -- {recipe}"),
        backends: config.backends,
        show_fps: config.show_fps,
        ..PlatformConfig::default()
    };

    match platform::run_with_renderer(scene, platform) {
        Ok(()) => {
            log::info!("Graceful shutdown. Bye!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

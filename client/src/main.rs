mod camera;
mod constants;
mod game;
mod input;
mod player;
mod world;

use bevy::{prelude::*, window::PresentMode};
use clap::Parser;
use constants::DEFAULT_ASSETS_FOLDER;
use input::{data::GameAction, keyboard::get_bindings};
use serde::{Deserialize, Serialize};
use shared::{
    load_session_config, water::WaterPreset, Session, SessionConfig, CONFIG_LOAD_ERROR,
};
use std::{collections::BTreeMap, path::PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "Session config file (RON)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Use the 32x32 mobile water grid")]
    mobile: bool,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(
        short,
        long,
        help = "Allows overriding of the asset folder path, defaults to ./data"
    )]
    assets_folder_path: Option<String>,
}

#[derive(Resource, Debug, Clone)]
pub struct ClientPaths {
    pub assets_folder_path: PathBuf,
}

#[derive(Resource, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default = "input::keyboard::default_key_map")]
    pub map: BTreeMap<GameAction, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            map: input::keyboard::default_key_map(),
        }
    }
}

fn session_config(args: &Args) -> SessionConfig {
    let mut config = match &args.config {
        Some(path) => load_session_config(path).unwrap_or_else(|err| {
            eprintln!("{} {:?}: {err}. Using defaults.", CONFIG_LOAD_ERROR, path);
            SessionConfig::default()
        }),
        None => SessionConfig::default(),
    };
    if args.mobile {
        config = config.with_preset(WaterPreset::Mobile);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config
}

fn main() {
    let args = Args::parse();

    let paths = ClientPaths {
        assets_folder_path: PathBuf::from(
            args.assets_folder_path
                .clone()
                .unwrap_or_else(|| DEFAULT_ASSETS_FOLDER.to_string()),
        ),
    };

    println!(
        "Starting lagoon with assets folder: {}",
        paths.assets_folder_path.display()
    );

    let config = session_config(&args);

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(AssetPlugin {
                file_path: paths.assets_folder_path.to_string_lossy().into_owned(),
                ..Default::default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Lagoon".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
    );

    app.insert_resource(get_bindings(&paths))
        .insert_resource(Session::new(config))
        .insert_resource(paths)
        .insert_resource(ClearColor(Color::srgb(0.55, 0.75, 0.95)))
        .add_plugins(game::game_plugin)
        .run();
}

use crate::{constants::BINDS_PATH, input::data::GameAction, ClientPaths, KeyMap};
use bevy::prelude::*;
use ron::{from_str, ser::PrettyConfig};
use shared::players::IntentBuffer;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::Path,
};

fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> Result<(), std::io::Error> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "serialization failed"))?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(binds_path)?;
    file.write_all(serialized.as_bytes())
}

pub fn is_action_pressed(
    action: GameAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|key_codes| keyboard_input.any_pressed(key_codes.iter().copied()))
}

pub fn is_action_just_pressed(
    action: GameAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|key_codes| keyboard_input.any_just_pressed(key_codes.iter().copied()))
}

pub(crate) fn default_key_map() -> BTreeMap<GameAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(GameAction::MoveForward, vec![KeyCode::KeyW, KeyCode::ArrowUp]);
    map.insert(
        GameAction::MoveBackward,
        vec![KeyCode::KeyS, KeyCode::ArrowDown],
    );
    map.insert(GameAction::MoveLeft, vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
    map.insert(
        GameAction::MoveRight,
        vec![KeyCode::KeyD, KeyCode::ArrowRight],
    );
    map.insert(GameAction::Jump, vec![KeyCode::Space]);
    map
}

fn read_keybindings(binds_path: &Path) -> Option<KeyMap> {
    let content = fs::read_to_string(binds_path).ok()?;
    match from_str::<KeyMap>(&content) {
        Ok(key_map) => Some(key_map),
        Err(e) => {
            warn!("Ignoring invalid keybindings at {:?}: {}", binds_path, e);
            None
        }
    }
}

pub fn get_bindings(paths: &ClientPaths) -> KeyMap {
    let binds_path = paths.assets_folder_path.join(BINDS_PATH);

    if let Some(key_map) = read_keybindings(&binds_path) {
        return key_map;
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, &binds_path) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

/// Mirror the held movement keys and the jump edge into the intent buffer.
pub fn keyboard_intent_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut buffer: ResMut<IntentBuffer>,
) {
    let held = GameAction::ALL.into_iter().filter_map(|action| {
        action
            .move_action()
            .filter(|_| is_action_pressed(action, &keyboard_input, &key_map))
    });
    buffer.set_held(held);

    if is_action_just_pressed(GameAction::Jump, &keyboard_input, &key_map) {
        buffer.press_jump();
    }
}

pub mod animation;
pub mod controller;

use bevy::prelude::*;

/// Root entity of the avatar's glTF scene.
#[derive(Component)]
pub struct AvatarRoot;

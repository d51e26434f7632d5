pub const BINDS_PATH: &str = "keybindings.ron";
pub const DEFAULT_ASSETS_FOLDER: &str = "data";

pub const AVATAR_MODEL_PATH: &str = "models/avatar.glb";
pub const IDLE_CLIP_INDEX: usize = 0;
pub const RUN_CLIP_INDEX: usize = 1;

/// Radians of camera rotation per pixel of mouse motion
pub const MOUSE_SENSITIVITY: f32 = 0.003;

pub const FLOATER_SIZE: f32 = 1.2;

use bevy::prelude::*;

/// Per-frame ordering of the app systems around the session tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameUpdateSet {
    /// Event handlers writing the intent buffer
    Input,
    /// The session tick
    Simulation,
    /// Copy session state onto scene entities
    Sync,
    Rendering,
}

impl GameUpdateSet {
    pub const ORDER: [GameUpdateSet; 4] = [
        GameUpdateSet::Input,
        GameUpdateSet::Simulation,
        GameUpdateSet::Sync,
        GameUpdateSet::Rendering,
    ];
}

/// Configure the sets to run in [`GameUpdateSet::ORDER`].
pub fn configure_game_sets(app: &mut App) {
    let [input, simulation, sync, rendering] = GameUpdateSet::ORDER;
    app.configure_sets(Update, (input, simulation, sync, rendering).chain());
}

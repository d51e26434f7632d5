//! Avatar model loading and skeletal animation.
//!
//! The session's [`AnimationBlend`](shared::players::AnimationBlend) is the
//! source of truth; this module only mirrors its weights, speeds and clip
//! times onto the glTF `AnimationPlayer`.

use bevy::{asset::LoadState, prelude::*};
use shared::{players::AnimationState, Session};

use super::AvatarRoot;
use crate::constants::{AVATAR_MODEL_PATH, IDLE_CLIP_INDEX, RUN_CLIP_INDEX};

#[derive(Resource)]
pub struct AvatarAnimations {
    pub graph: Handle<AnimationGraph>,
    /// Graph nodes in [`AnimationState::ALL`] order
    pub nodes: Vec<AnimationNodeIndex>,
    pub clips: Vec<Handle<AnimationClip>>,
}

impl AvatarAnimations {
    fn node(&self, state: AnimationState) -> Option<AnimationNodeIndex> {
        let position = AnimationState::ALL.iter().position(|s| *s == state)?;
        self.nodes.get(position).copied()
    }
}

pub fn spawn_avatar(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    session: Res<Session>,
) {
    let clips: Vec<Handle<AnimationClip>> = [IDLE_CLIP_INDEX, RUN_CLIP_INDEX]
        .into_iter()
        .map(|index| asset_server.load(GltfAssetLabel::Animation(index).from_asset(AVATAR_MODEL_PATH)))
        .collect();
    let (graph, nodes) = AnimationGraph::from_clips(clips.clone());

    commands.insert_resource(AvatarAnimations {
        graph: graphs.add(graph),
        nodes,
        clips,
    });

    let avatar = session.avatar();
    commands.spawn((
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(AVATAR_MODEL_PATH))),
        Transform::from_translation(avatar.position).with_rotation(avatar.orientation),
        AvatarRoot,
        Name::new("Avatar"),
    ));
}

/// Attach the graph to the model's animation player once the scene spawns.
pub fn setup_animation_player_system(
    mut commands: Commands,
    animations: Res<AvatarAnimations>,
    mut players: Query<(Entity, &mut AnimationPlayer), Added<AnimationPlayer>>,
    mut session: ResMut<Session>,
) {
    for (entity, mut player) in players.iter_mut() {
        for node in &animations.nodes {
            player.play(*node).repeat();
        }
        commands
            .entity(entity)
            .insert(AnimationGraphHandle(animations.graph.clone()));

        session.ready_gate_mut().avatar = true;
        info!("Avatar model ready");
    }
}

/// Open the clips part of the ready gate once every clip has loaded.
pub fn clips_ready_system(
    asset_server: Res<AssetServer>,
    animations: Res<AvatarAnimations>,
    mut session: ResMut<Session>,
    mut reported_failure: Local<bool>,
) {
    if session.ready_gate().clips {
        return;
    }

    for clip in &animations.clips {
        if let LoadState::Failed(err) = asset_server.load_state(clip) {
            if !*reported_failure {
                error!("Failed to load avatar animation {:?}: {}", clip.path(), err);
                *reported_failure = true;
            }
            return;
        }
    }

    if animations
        .clips
        .iter()
        .all(|clip| asset_server.is_loaded_with_dependencies(clip))
    {
        session.ready_gate_mut().clips = true;
        info!("Avatar animations ready");
    }
}

/// Mirror the blend onto the animation player.
pub fn animation_sync_system(
    session: Res<Session>,
    animations: Res<AvatarAnimations>,
    mut players: Query<&mut AnimationPlayer>,
) {
    let blend = &session.avatar().animation;
    for mut player in players.iter_mut() {
        for state in AnimationState::ALL {
            let Some(node) = animations.node(state) else {
                continue;
            };
            if let Some(active) = player.animation_mut(node) {
                active
                    .set_weight(blend.weight(state))
                    .set_speed(blend.time_scale(state))
                    .seek_to(blend.clip_time(state));
            }
        }
    }
}

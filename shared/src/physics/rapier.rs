//! Rapier integration for the level.
//!
//! The avatar is not a Rapier body. Rapier only owns the static level
//! colliders and answers the locomotion controller's ray probes through
//! [`RapierGeometry`].

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::{
    constants::RAY_MAX_DISTANCE,
    physics::{sort_hits, CollisionGeometry, RayHit},
};

/// Collision groups used by the level.
pub mod collision_groups {
    use bevy_rapier3d::prelude::Group;

    /// Static level geometry the avatar walks on
    pub const LEVEL: Group = Group::GROUP_2;
}

/// Marker for level collider entities.
#[derive(Component, Default, Clone, Copy, Debug)]
pub struct LevelCollider;

/// Bundle for one piece of static level collision.
#[derive(Bundle)]
pub struct LevelColliderBundle {
    pub body: RigidBody,
    pub collider: Collider,
    pub transform: Transform,
    pub collision_groups: CollisionGroups,
    pub marker: LevelCollider,
}

impl LevelColliderBundle {
    pub fn new(collider: Collider, transform: Transform) -> Self {
        Self {
            body: RigidBody::Fixed,
            collider,
            transform,
            collision_groups: CollisionGroups::new(collision_groups::LEVEL, Group::ALL),
            marker: LevelCollider,
        }
    }

    /// Box collider with the given half extents.
    pub fn cuboid(half_extents: Vec3, transform: Transform) -> Self {
        Self::new(
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            transform,
        )
    }
}

/// Plugin that sets up Rapier for the level.
pub struct LevelPhysicsPlugin;

impl Plugin for LevelPhysicsPlugin {
    fn build(&self, app: &mut App) {
        // Rapier only serves scene queries here; nothing is simulated.
        app.add_plugins(
            RapierPhysicsPlugin::<NoUserData>::default().with_default_system_setup(true),
        );
        app.add_systems(Startup, configure_rapier_context);
    }
}

/// System to configure the Rapier context after it's spawned.
fn configure_rapier_context(mut query: Query<&mut RapierConfiguration>) {
    for mut config in query.iter_mut() {
        config.gravity = Vec3::ZERO;
        config.physics_pipeline_active = false;
        config.query_pipeline_active = true;
    }
}

/// [`CollisionGeometry`] over a Rapier context, borrowed for one tick.
pub struct RapierGeometry<'a> {
    pub colliders: &'a RapierContextColliders,
    pub rigidbody_set: &'a RapierRigidBodySet,
    pub query_pipeline: &'a RapierQueryPipeline,
}

impl<'a> RapierGeometry<'a> {
    pub fn new(
        colliders: &'a RapierContextColliders,
        rigidbody_set: &'a RapierRigidBodySet,
        query_pipeline: &'a RapierQueryPipeline,
    ) -> Self {
        Self {
            colliders,
            rigidbody_set,
            query_pipeline,
        }
    }

    fn filter() -> QueryFilter<'static> {
        QueryFilter::default()
            .groups(CollisionGroups::new(Group::ALL, collision_groups::LEVEL))
    }
}

impl CollisionGeometry for RapierGeometry<'_> {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_ray(
            self.colliders,
            self.rigidbody_set,
            origin,
            direction,
            RAY_MAX_DISTANCE,
            true,
            Self::filter(),
            |_entity, intersection| {
                hits.push(RayHit {
                    distance: intersection.time_of_impact,
                    point: intersection.point,
                });
                true
            },
        );

        sort_hits(&mut hits);
        hits
    }

    fn nearest_hit(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        self.query_pipeline
            .cast_ray(
                self.colliders,
                self.rigidbody_set,
                origin,
                direction,
                RAY_MAX_DISTANCE,
                true,
                Self::filter(),
            )
            .map(|(_, distance)| RayHit {
                distance,
                point: origin + direction * distance,
            })
    }
}

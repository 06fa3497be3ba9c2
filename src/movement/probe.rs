//! Movement domain: ground and wall probes backed by avian2d spatial queries.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GameLayer, LocomotionTuning, PhysicsProbe};

/// Spatial queries around one character for the current step.
pub struct SpatialProbe<'a, 'w, 's> {
    pub spatial_query: &'a SpatialQuery<'w, 's>,
    pub sensors: &'a Query<'w, 's, (), With<Sensor>>,
    pub entity: Entity,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub tuning: &'a LocomotionTuning,
}

/// Half extents of a box collider, or a 24x48 default for other shapes.
pub fn collider_half_extents(collider: &Collider) -> Vec2 {
    match collider.shape_scaled().as_cuboid() {
        Some(c) => Vec2::new(c.half_extents.x, c.half_extents.y),
        None => Vec2::new(12.0, 24.0),
    }
}

impl PhysicsProbe for SpatialProbe<'_, '_, '_> {
    fn ground_contacts(&self) -> usize {
        let probe_height = self.tuning.ground_probe_height;
        let width = self.half_extents.x * 2.0 * self.tuning.ground_probe_width_ratio;
        let center = self.position - Vec2::new(0.0, self.half_extents.y + probe_height * 0.5);

        let shape = Collider::rectangle(width, probe_height);
        let filter = SpatialQueryFilter::default().with_excluded_entities([self.entity]);

        self.spatial_query
            .shape_intersections(&shape, center, 0.0, &filter)
            .into_iter()
            .filter(|hit| !self.sensors.contains(*hit))
            .count()
    }

    fn wall_hit(&self, direction: Dir2, distance: f32) -> bool {
        let shape = Collider::rectangle(self.half_extents.x * 2.0, self.half_extents.y * 2.0);
        let filter = SpatialQueryFilter::from_mask(GameLayer::Wall)
            .with_excluded_entities([self.entity]);
        let config = ShapeCastConfig::from_max_distance(distance);

        self.spatial_query
            .cast_shape(&shape, self.position, 0.0, direction, &config, &filter)
            .is_some()
    }
}

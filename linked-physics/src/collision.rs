use crate::aabb::AABB;
use glam::Vec3;

/// Result of a swept test: fraction of the move at first contact and the
/// obstacle face normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SweepHit {
    pub time: f32,
    /// `Vec3::ZERO` if the boxes already overlapped.
    pub normal: Vec3,
}

/// Entry and exit times along one axis. A stationary axis either overlaps for
/// the whole step or never.
#[inline]
fn axis_window(
    moving_min: f32,
    moving_max: f32,
    obstacle_min: f32,
    obstacle_max: f32,
    v: f32,
) -> Option<(f32, f32)> {
    if v == 0.0 {
        if moving_max <= obstacle_min || moving_min >= obstacle_max {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let a = (obstacle_min - moving_max) / v;
    let b = (obstacle_max - moving_min) / v;
    Some((a.min(b), a.max(b)))
}

/// Swept moving `AABB` vs static `AABB` test over one step of `velocity`.
pub fn sweep_aabb(moving: &AABB, velocity: Vec3, obstacle: &AABB) -> Option<SweepHit> {
    if moving.intersects(obstacle) {
        return Some(SweepHit {
            time: 0.0,
            normal: Vec3::ZERO,
        });
    }

    let mut entry = Vec3::ZERO;
    let mut exit = Vec3::ZERO;
    for axis in 0..3 {
        let (t0, t1) = axis_window(
            moving.min[axis],
            moving.max[axis],
            obstacle.min[axis],
            obstacle.max[axis],
            velocity[axis],
        )?;
        entry[axis] = t0;
        exit[axis] = t1;
    }

    let latest_entry = entry.max_element();
    let earliest_exit = exit.min_element();

    if latest_entry > earliest_exit || latest_entry >= 1.0 || latest_entry < 0.0 {
        return None;
    }

    let axis = if entry.x == latest_entry {
        0
    } else if entry.y == latest_entry {
        1
    } else {
        2
    };
    let mut normal = Vec3::ZERO;
    normal[axis] = if velocity[axis] < 0.0 { 1.0 } else { -1.0 };

    Some(SweepHit {
        time: latest_entry,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_hits_face_head_on() {
        let moving = AABB::new(Vec3::ZERO, Vec3::ONE);
        let obstacle = AABB::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 1.0, 1.0));
        let hit = sweep_aabb(&moving, Vec3::new(2.0, 0.0, 0.0), &obstacle).unwrap();
        assert!((hit.time - 0.5).abs() < 1e-6);
        assert_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_sweep_misses_when_too_short() {
        let moving = AABB::new(Vec3::ZERO, Vec3::ONE);
        let obstacle = AABB::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 1.0, 1.0));
        assert!(sweep_aabb(&moving, Vec3::new(1.0, 0.0, 0.0), &obstacle).is_none());
    }

    #[test]
    fn test_sweep_ignores_obstacle_off_the_path() {
        let moving = AABB::new(Vec3::ZERO, Vec3::ONE);
        let obstacle = AABB::new(Vec3::new(2.0, 3.0, 0.0), Vec3::new(3.0, 4.0, 1.0));
        assert!(sweep_aabb(&moving, Vec3::new(2.0, 0.0, 0.0), &obstacle).is_none());
    }

    #[test]
    fn test_sweep_overlap_reports_zero_normal() {
        let moving = AABB::new(Vec3::ZERO, Vec3::ONE);
        let obstacle = AABB::new(Vec3::splat(0.5), Vec3::splat(1.5));
        let hit = sweep_aabb(&moving, Vec3::X, &obstacle).unwrap();
        assert_eq!(hit.time, 0.0);
        assert_eq!(hit.normal, Vec3::ZERO);
    }
}

/// Camera and projection utilities
use nalgebra::Vector3;

use crate::error::{CubeError, Result, ViewDegeneracy};
use crate::quaternion::Quaternion;

/// Squared sine of the up/view angle at or below which the two count as parallel
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Perspective divisors smaller than this (relative to `|camera|²`) are rejected
const EYE_PLANE_TOLERANCE: f64 = 1e-12;

/// A point on the view plane, plus its distance along the view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    /// Larger is farther from the camera
    pub depth: f64,
}

/// Orthonormal screen basis derived from the camera vector and the world up vector.
struct ScreenBasis {
    right: Vector3<f64>,
    up: Vector3<f64>,
    forward: Vector3<f64>,
}

impl ScreenBasis {
    fn new(camera: &Vector3<f64>, world_up: &Vector3<f64>) -> Result<Self> {
        let right = world_up.cross(camera);
        let sine2 = right.norm_squared();
        let scale = world_up.norm_squared() * camera.norm_squared();
        if sine2.is_nan() || sine2 <= PARALLEL_TOLERANCE * scale {
            return Err(CubeError::DegenerateView(ViewDegeneracy::UpParallelToView));
        }
        let right = right.normalize();
        let up = camera.cross(&right).normalize();
        let forward = camera.normalize();
        Ok(Self { right, up, forward })
    }
}

/// Projects points seen from `camera` after turning them by `rotation`.
///
/// This is a linear perspective camera without a field-of-view parameter: the
/// focal length is the distance from the origin to `camera`. Points on the
/// plane through the origin perpendicular to the view keep their scale.
///
/// Fails without producing any output if `world_up` is parallel to `camera`,
/// or if any point lies in the plane through `camera` perpendicular to the
/// view direction (the point at the camera itself included).
pub fn project_points(
    points: &[Vector3<f64>],
    rotation: &Quaternion,
    camera: &Vector3<f64>,
    world_up: &Vector3<f64>,
) -> Result<Vec<Projected>> {
    let basis = ScreenBasis::new(camera, world_up)?;
    let m = rotation.to_rotation_matrix();
    let v2 = camera.norm_squared();

    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let d = m * point - camera;
            let d_view = d.dot(camera);
            if !d_view.is_finite() || d_view.abs() < EYE_PLANE_TOLERANCE * v2 {
                return Err(CubeError::DegenerateView(ViewDegeneracy::PointInEyePlane { index }));
            }
            let proj = -d * (v2 / d_view);
            Ok(Projected {
                x: proj.dot(&basis.right),
                y: proj.dot(&basis.up),
                depth: -d.dot(&basis.forward),
            })
        })
        .collect()
}

/// Projects closed outlines (stickers or face plates), keeping their shape.
pub fn project_polygons<const K: usize>(
    polygons: &[[Vector3<f64>; K]],
    rotation: &Quaternion,
    camera: &Vector3<f64>,
    world_up: &Vector3<f64>,
) -> Result<Vec<[Projected; K]>> {
    let flat: Vec<Vector3<f64>> = polygons.iter().flatten().copied().collect();
    let projected = project_points(&flat, rotation, camera, world_up).map_err(|err| match err {
        CubeError::DegenerateView(ViewDegeneracy::PointInEyePlane { index }) => {
            CubeError::DegenerateView(ViewDegeneracy::PointInEyePlane { index: index / K.max(1) })
        }
        other => other,
    })?;

    Ok(projected
        .chunks_exact(K.max(1))
        .take(polygons.len())
        .map(|chunk| std::array::from_fn(|i| chunk[i]))
        .collect())
}

/// Indices ordered back to front: farthest first, so nearer pieces are drawn last.
pub fn draw_order(depths: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..depths.len()).collect();
    order.sort_by(|&a, &b| depths[b].total_cmp(&depths[a]));
    order
}

/// Camera configuration for viewing the cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Accumulated view rotation applied to the cube before projecting
    pub rotation: Quaternion,
    /// Camera location; also fixes the focal length
    pub position: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl Camera {
    pub fn new(rotation: Quaternion, position: Vector3<f64>) -> Self {
        Self {
            rotation,
            position,
            up: Vector3::y(),
        }
    }

    /// Turns the view by `delta`, applied before the current rotation.
    pub fn rotate(&mut self, delta: Quaternion) {
        self.rotation = self.rotation * delta;
    }

    pub fn project(&self, points: &[Vector3<f64>]) -> Result<Vec<Projected>> {
        project_points(points, &self.rotation, &self.position, &self.up)
    }

    pub fn project_polygons<const K: usize>(
        &self,
        polygons: &[[Vector3<f64>; K]],
    ) -> Result<Vec<[Projected; K]>> {
        project_polygons(polygons, &self.rotation, &self.position, &self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        // Tilted so three faces are visible
        let rotation = Quaternion::from_axis_angle(
            &Vector3::new(1.0, -1.0, 0.0),
            -std::f64::consts::PI / 6.0,
        )
        .unwrap_or_default();
        Self::new(rotation, Vector3::new(0.0, 0.0, 10.0))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn front_camera() -> Vector3<f64> {
        Vector3::new(0.0, 0.0, 10.0)
    }

    #[test]
    fn test_origin_projects_to_center() {
        let out = project_points(&[Vector3::zeros()], &Quaternion::IDENTITY, &front_camera(), &Vector3::y()).unwrap();
        assert_abs_diff_eq!(out[0].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].depth, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_points_in_origin_plane_keep_scale() {
        let out = project_points(
            &[Vector3::new(1.0, 2.0, 0.0)],
            &Quaternion::IDENTITY,
            &front_camera(),
            &Vector3::y(),
        )
        .unwrap();
        assert_abs_diff_eq!(out[0].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nearer_points_appear_larger_and_shallower() {
        let points = [Vector3::new(1.0, 0.0, 1.0), Vector3::new(1.0, 0.0, -1.0)];
        let out = project_points(&points, &Quaternion::IDENTITY, &front_camera(), &Vector3::y()).unwrap();
        assert!(out[0].x > out[1].x);
        assert!(out[0].depth < out[1].depth);
        assert_eq!(draw_order(&[out[0].depth, out[1].depth]), vec![1, 0]);
    }

    #[test]
    fn test_rotation_applied_before_projection() {
        let quarter = Quaternion::from_axis_angle(&Vector3::y(), std::f64::consts::FRAC_PI_2).unwrap();
        // +x turns to -z, straight behind the origin
        let out = project_points(&[Vector3::x()], &quarter, &front_camera(), &Vector3::y()).unwrap();
        assert_abs_diff_eq!(out[0].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].depth, 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_up_parallel_to_view_is_rejected() {
        let result = project_points(
            &[Vector3::zeros()],
            &Quaternion::IDENTITY,
            &Vector3::new(0.0, 5.0, 0.0),
            &Vector3::y(),
        );
        assert_eq!(result, Err(CubeError::DegenerateView(ViewDegeneracy::UpParallelToView)));

        let at_origin = project_points(&[], &Quaternion::IDENTITY, &Vector3::zeros(), &Vector3::y());
        assert_eq!(at_origin, Err(CubeError::DegenerateView(ViewDegeneracy::UpParallelToView)));
    }

    #[test]
    fn test_parallel_check_ignores_scale() {
        let tiny = project_points(
            &[Vector3::new(0.0, 0.0, -1.0)],
            &Quaternion::IDENTITY,
            &Vector3::new(0.0, 0.0, 1e-7),
            &Vector3::y(),
        );
        assert!(tiny.is_ok());

        let huge_up = project_points(
            &[Vector3::zeros()],
            &Quaternion::IDENTITY,
            &Vector3::new(0.0, 1e8, 1e-3),
            &Vector3::new(0.0, 1e6, 0.0),
        );
        assert_eq!(huge_up, Err(CubeError::DegenerateView(ViewDegeneracy::UpParallelToView)));

        let zero_up = project_points(&[], &Quaternion::IDENTITY, &front_camera(), &Vector3::zeros());
        assert_eq!(zero_up, Err(CubeError::DegenerateView(ViewDegeneracy::UpParallelToView)));
    }

    #[test]
    fn test_non_finite_point_is_rejected() {
        let points = [Vector3::zeros(), Vector3::new(f64::NAN, 0.0, 0.0)];
        let result = project_points(&points, &Quaternion::IDENTITY, &front_camera(), &Vector3::y());
        assert_eq!(
            result,
            Err(CubeError::DegenerateView(ViewDegeneracy::PointInEyePlane { index: 1 }))
        );

        let far = [Vector3::new(0.0, 0.0, f64::INFINITY)];
        assert!(project_points(&far, &Quaternion::IDENTITY, &front_camera(), &Vector3::y()).is_err());
    }

    #[test]
    fn test_point_at_camera_is_rejected() {
        let camera = front_camera();
        let points = [Vector3::zeros(), camera, Vector3::new(3.0, 0.0, 10.0)];
        let result = project_points(&points, &Quaternion::IDENTITY, &camera, &Vector3::y());
        assert_eq!(
            result,
            Err(CubeError::DegenerateView(ViewDegeneracy::PointInEyePlane { index: 1 }))
        );
    }

    #[test]
    fn test_project_polygons_keeps_shape() {
        let square = [
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(-1.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        ];
        let camera = Camera::new(Quaternion::IDENTITY, front_camera());
        let out = camera.project_polygons(&[square, square]).unwrap();
        assert_eq!(out.len(), 2);
        assert_abs_diff_eq!(out[1][2].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1][2].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_project_polygons_reports_polygon_index() {
        let camera = front_camera();
        let bad = [Vector3::zeros(), Vector3::new(0.0, 1.0, 10.0)];
        let good = [Vector3::zeros(), Vector3::x()];
        let result = project_polygons(&[good, bad], &Quaternion::IDENTITY, &camera, &Vector3::y());
        assert_eq!(
            result,
            Err(CubeError::DegenerateView(ViewDegeneracy::PointInEyePlane { index: 1 }))
        );
    }

    #[test]
    fn test_camera_rotate_accumulates() {
        let step = Quaternion::from_axis_angle(&Vector3::y(), 0.1).unwrap();
        let mut camera = Camera::new(Quaternion::IDENTITY, front_camera());
        for _ in 0..5 {
            camera.rotate(step);
        }
        let expected = Quaternion::from_axis_angle(&Vector3::y(), 0.5).unwrap();
        assert_abs_diff_eq!(
            camera.rotation.to_rotation_matrix(),
            expected.to_rotation_matrix(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_default_camera_sees_three_faces() {
        let camera = Camera::default();
        let centers = [Vector3::y(), Vector3::x(), Vector3::z(), -Vector3::y(), -Vector3::x(), -Vector3::z()];
        let depths: Vec<f64> = camera.project(&centers).unwrap().iter().map(|p| p.depth).collect();
        let visible = depths.iter().filter(|&&d| d < 10.0).count();
        assert_eq!(visible, 3);
    }
}

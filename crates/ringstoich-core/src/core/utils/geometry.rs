use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Least-squares rigid-body fit (Kabsch).
///
/// Returns the proper rotation plus translation that maps `mobile` onto `target`
/// with minimal RMSD over the paired points. Reflections are excluded.
/// `None` when the sets differ in size or hold fewer than three points.
pub fn fit_rigid(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Option<Isometry3<f64>> {
    if mobile.len() != target.len() || mobile.len() < 3 {
        return None;
    }
    let mobile_center = centroid(mobile)?;
    let target_center = centroid(target)?;

    let mut covariance = Matrix3::zeros();
    for (m, t) in mobile.iter().zip(target) {
        covariance += (m - mobile_center) * (t - target_center).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u?;
    let v = svd.v_t?.transpose();

    let mut correction = Matrix3::identity();
    if (v * u.transpose()).determinant() < 0.0 {
        let weakest = svd.singular_values.imin();
        correction[(weakest, weakest)] = -1.0;
    }
    let rotation_matrix = v * correction * u.transpose();
    let rotation =
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_matrix));

    let translation = target_center.coords - rotation * mobile_center.coords;
    Some(Isometry3::from_parts(
        Translation3::from(translation),
        rotation,
    ))
}

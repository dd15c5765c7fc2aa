use crate::{Error, PathContainer, PathEvaluator, PolylinePath};
use glam::{Affine3A, Quat, Vec3};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn assert_vec_approx(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, 1.0e-4),
        "expected {expected}, got {actual}"
    );
}

/// 10 units along +X, then 10 units along +Z.
fn l_shape() -> PolylinePath {
    PolylinePath::new(vec![
        Vec3::ZERO,
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 10.0),
    ])
    .expect("l shape")
}

#[test]
fn polyline_is_parameterised_by_arc_length() {
    let path = l_shape();
    assert_approx(path.length(), 20.0);
    assert_vec_approx(path.position(0.0), Vec3::ZERO);
    assert_vec_approx(path.position(0.25), Vec3::new(5.0, 0.0, 0.0));
    assert_vec_approx(path.position(0.5), Vec3::new(10.0, 0.0, 0.0));
    assert_vec_approx(path.position(0.75), Vec3::new(10.0, 0.0, 5.0));
    assert_vec_approx(path.position(1.0), Vec3::new(10.0, 0.0, 10.0));
}

#[test]
fn polyline_tangent_follows_segment() {
    let path = l_shape();
    assert_vec_approx(path.tangent(0.25), Vec3::X);
    assert_vec_approx(path.tangent(0.75), Vec3::Z);
    assert_vec_approx(path.tangent(1.0), Vec3::Z);
}

#[test]
fn polyline_clamps_parameter() {
    let path = l_shape();
    assert_vec_approx(path.position(-1.0), Vec3::ZERO);
    assert_vec_approx(path.position(2.0), Vec3::new(10.0, 0.0, 10.0));
}

#[test]
fn duplicate_points_borrow_a_neighbouring_direction() {
    let path = PolylinePath::new(vec![Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)])
        .expect("path");
    assert_approx(path.length(), 4.0);
    assert_vec_approx(path.tangent(0.0), Vec3::Z);
    assert_vec_approx(path.position(0.5), Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn single_point_path_has_no_direction() {
    let path = PolylinePath::new(vec![Vec3::ONE]).expect("point");
    assert_eq!(path.length(), 0.0);
    assert_eq!(path.position(0.7), Vec3::ONE);
    assert_eq!(path.tangent(0.7), Vec3::ZERO);
}

#[test]
fn polyline_rejects_bad_points() {
    assert!(matches!(
        PolylinePath::new(Vec::new()),
        Err(Error::InvalidValue { .. })
    ));
    assert!(matches!(
        PolylinePath::new(vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)]),
        Err(Error::InvalidValue { .. })
    ));
}

#[test]
fn container_applies_transform_to_geometry_and_length() {
    let transform = Affine3A::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::IDENTITY,
        Vec3::new(5.0, 0.0, 0.0),
    );
    let paths = PathContainer::new(transform, vec![l_shape()]);

    assert_eq!(paths.path_count(), 1);
    assert_approx(paths.length(0), 40.0);
    assert_vec_approx(paths.position(0, 0.5), Vec3::new(25.0, 0.0, 0.0));
    assert_vec_approx(paths.tangent(0, 0.75).normalize(), Vec3::Z);
    assert_eq!(paths.up_vector(0, 0.5), Vec3::Y);
}

#[test]
fn container_remeasures_after_changes() {
    let mut paths = PathContainer::default();
    assert_eq!(paths.path_count(), 0);

    let id = paths.push(l_shape());
    assert_eq!(id, 0);
    assert_approx(paths.length(id), 20.0);

    paths.set_transform(Affine3A::from_scale(Vec3::splat(0.5)));
    assert_approx(paths.length(id), 10.0);
    assert!(paths.path(id).is_some());
}

#[test]
fn container_answers_zero_for_unknown_paths() {
    let paths = PathContainer::new(Affine3A::IDENTITY, vec![l_shape()]);
    assert_eq!(paths.length(3), 0.0);
    assert_eq!(paths.position(3, 0.5), Vec3::ZERO);
    assert_eq!(paths.tangent(3, 0.5), Vec3::ZERO);
    assert!(paths.path(3).is_none());
}

#[test]
fn trailing_duplicate_point_keeps_last_direction() {
    let path = PolylinePath::new(vec![
        Vec3::ZERO,
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
    ])
    .expect("path");
    assert_approx(path.length(), 20.0);
    assert_vec_approx(path.tangent(1.0), Vec3::Z);
    assert_vec_approx(path.tangent(0.25), Vec3::X);
}

#[test]
fn fully_collapsed_polyline_has_no_direction() {
    let path = PolylinePath::new(vec![Vec3::ONE, Vec3::ONE, Vec3::ONE]).expect("path");
    assert_eq!(path.tangent(0.0), Vec3::ZERO);
    assert_eq!(path.tangent(1.0), Vec3::ZERO);
}

use balloon_equilibrium::config::GridRegime;
use balloon_equilibrium::solver::equilibrium::grid::{self, GridBounds, GridResolution};

#[test]
fn low_regime_grid_has_full_resolution() {
    let regime = GridRegime::low_altitude();
    let bounds = GridBounds::from(&regime);
    let (theta_step, a_step) = GridResolution::from(&regime).steps_for(&bounds);
    assert!((theta_step - 0.1).abs() < 1e-12);
    assert!((a_step - 0.22).abs() < 1e-12);

    let points = grid::generate(&bounds, theta_step, a_step);
    assert_eq!(points.len(), 250 * 50);
}

#[test]
fn grid_is_descending_and_excludes_lower_bounds() {
    let bounds = GridBounds {
        theta_min_deg: 0.0,
        theta_max_deg: 25.0,
        a_min: 5.0,
        a_max: 16.0,
    };
    let points = grid::generate(&bounds, 0.1, 0.22);

    let first = points.first().expect("non-empty grid");
    assert_eq!(first.theta0, 25.0_f64.to_radians());
    assert_eq!(first.shape_constant, 16.0);

    for point in &points {
        assert!(point.theta0 > 0.0, "θ0 = 0 must be excluded");
        assert!(point.theta0 <= 25.0_f64.to_radians());
        assert!(point.shape_constant > 5.0 + 1e-9, "a = 5 must be excluded");
        assert!(point.shape_constant <= 16.0);
    }

    // θ0 is the outer axis: the first 50 points share the same angle.
    assert!(points[..50].iter().all(|p| p.theta0 == first.theta0));
    assert!(points[50].theta0 < first.theta0);
}

#[test]
fn zoom_window_straddles_winner_by_one_step() {
    let bounds = GridBounds {
        theta_min_deg: 0.0,
        theta_max_deg: 25.0,
        a_min: 5.0,
        a_max: 16.0,
    };
    let points = grid::generate(&bounds, 0.1, 0.22);
    let winner = points[1234];

    let zoomed = GridBounds::around(&winner, 0.1, 0.22);
    assert!(zoomed.theta_min_deg < winner.theta0_deg());
    assert!(zoomed.theta_max_deg > winner.theta0_deg());
    assert!((zoomed.theta_width_deg() - 0.2).abs() < 1e-9);
    assert!((zoomed.a_width() - 0.44).abs() < 1e-9);

    let resolution = GridResolution {
        theta_steps: 250,
        a_steps: 50,
    };
    let (theta_step, a_step) = resolution.steps_for(&zoomed);
    let refined = grid::generate(&zoomed, theta_step, a_step);
    assert_eq!(refined.len(), 250 * 50);
}

#[test]
fn degenerate_window_yields_empty_grid() {
    let bounds = GridBounds {
        theta_min_deg: 10.0,
        theta_max_deg: 10.0,
        a_min: 5.0,
        a_max: 16.0,
    };
    assert!(grid::generate(&bounds, 0.1, 0.22).is_empty());
}

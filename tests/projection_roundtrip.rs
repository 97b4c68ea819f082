use approx::assert_abs_diff_eq;
use floetrack::PolarStereographic;

/// Round-tripping any Arctic coordinate through the projection must
/// reproduce it within 1e-6 degrees.
#[test]
fn round_trip_over_arctic_domain() {
    let proj = PolarStereographic::osi_saf_north();

    let mut checked = 0;
    let mut lat = 45.0;
    while lat <= 89.5 {
        let mut lon = -165.0;
        while lon <= 180.0 {
            let (x, y) = proj.to_projected(lon, lat).unwrap();
            let (lon2, lat2) = proj.to_geographic(x, y).unwrap();
            assert_abs_diff_eq!(lon2, lon, epsilon = 1e-6);
            assert_abs_diff_eq!(lat2, lat, epsilon = 1e-6);
            checked += 1;
            lon += 15.0;
        }
        lat += 2.5;
    }
    assert!(checked > 300);
}

#[test]
fn round_trip_near_the_pole() {
    let proj = PolarStereographic::osi_saf_north();
    for &(lon, lat) in &[(0.0, 89.99), (-45.0, 89.9), (135.0, 89.95)] {
        let (x, y) = proj.to_projected(lon, lat).unwrap();
        let (lon2, lat2) = proj.to_geographic(x, y).unwrap();
        assert_abs_diff_eq!(lon2, lon, epsilon = 1e-6);
        assert_abs_diff_eq!(lat2, lat, epsilon = 1e-6);
    }
}

/// Distances come out in kilometers: two points a degree of latitude apart
/// near 85N project roughly 111 km from each other.
#[test]
fn projected_units_are_kilometers() {
    let proj = PolarStereographic::osi_saf_north();
    let (x1, y1) = proj.to_projected(-10.0, 84.5).unwrap();
    let (x2, y2) = proj.to_projected(-10.0, 85.5).unwrap();
    let dist = (x2 - x1).hypot(y2 - y1);
    assert!((dist - 111.0).abs() < 2.0, "distance = {} km", dist);
}

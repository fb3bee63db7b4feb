// geo.rs
// Geographic primitives shared by the animator and the solver result types.

use serde::{Deserialize, Serialize};

/// A point in latitude-first order, ready for interpolation or rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Solver geometry arrives longitude-first (`[lng, lat]`, GeoJSON order).
    /// Everything downstream works latitude-first, so the swap happens here
    /// and nowhere else.
    pub fn from_lng_lat(point: [f64; 2]) -> Self {
        Self {
            lat: point[1],
            lng: point[0],
        }
    }
}

/// Linear interpolation between two points. The endpoints are returned
/// exactly: `t <= 0` yields `a` and `t >= 1` yields `b` with no float error.
pub fn lerp(a: LatLng, b: LatLng, t: f64) -> LatLng {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    LatLng {
        lat: a.lat + (b.lat - a.lat) * t,
        lng: a.lng + (b.lng - a.lng) * t,
    }
}

/// One vehicle's polyline geometry, converted to lat-first on construction
/// and immutable for the life of a visualization session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VehiclePath {
    points: Vec<LatLng>,
}

impl VehiclePath {
    pub fn from_lng_lat(points: &[[f64; 2]]) -> Self {
        Self {
            points: points.iter().copied().map(LatLng::from_lng_lat).collect(),
        }
    }

    pub fn from_points(points: Vec<LatLng>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, i: usize) -> Option<LatLng> {
        self.points.get(i).copied()
    }

    /// Index of the final point, `None` for an empty path.
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    /// Straight-line length of segment `i` in degrees. Planar approximation;
    /// only ratios of segment lengths are ever consumed, so no projection is
    /// needed. Returns 0.0 when `i` is out of range.
    pub fn segment_len(&self, i: usize) -> f64 {
        match (self.point(i), self.point(i + 1)) {
            (Some(a), Some(b)) => {
                let dlat = b.lat - a.lat;
                let dlng = b.lng - a.lng;
                (dlat * dlat + dlng * dlng).sqrt()
            }
            _ => 0.0,
        }
    }

    pub fn mean_segment_len(&self) -> f64 {
        let segments = self.points.len().saturating_sub(1);
        if segments == 0 {
            return 0.0;
        }
        let total: f64 = (0..segments).map(|i| self.segment_len(i)).sum();
        total / segments as f64
    }
}

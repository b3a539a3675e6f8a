//! Route path reconstruction and aggregation.
//!
//! The routing backend returns one coordinate list per segment in GeoJSON
//! `[lon, lat]` order. [`GeoPath`] flattens those lists into one display path,
//! keeping backend order and the duplicated point at each segment boundary.

use crate::{haversine_distance, GeoPoint};
use serde::{Deserialize, Serialize};

/// An ordered sequence of points in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoPath(Vec<GeoPoint>);

impl GeoPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens per-segment `[lon, lat]` lists into a single path.
    ///
    /// Segments are concatenated in iteration order. No de-duplication is
    /// done at segment boundaries; an empty segment contributes nothing.
    pub fn from_lon_lat_segments<S, P>(segments: S) -> Self
    where
        S: IntoIterator<Item = P>,
        P: IntoIterator<Item = [f64; 2]>,
    {
        Self(
            segments
                .into_iter()
                .flat_map(|segment| segment.into_iter().map(GeoPoint::from_lon_lat))
                .collect(),
        )
    }

    /// Points in order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Number of points, boundary duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Great-circle length of the drawn polyline in kilometers.
    ///
    /// This is a geometric measurement of the rendered line and is not the
    /// route distance, which is the sum of backend segment costs.
    pub fn length_km(&self) -> f64 {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.0
                .par_windows(2)
                .map(|pair| haversine_distance(&pair[0], &pair[1]))
                .sum()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.0
                .windows(2)
                .map(|pair| haversine_distance(&pair[0], &pair[1]))
                .sum()
        }
    }

    /// Smallest box containing every point, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.0.iter().copied())
    }
}

impl From<Vec<GeoPoint>> for GeoPath {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }
}

impl FromIterator<GeoPoint> for GeoPath {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GeoPath {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Plain left-to-right sum of segment costs.
///
/// Costs are trusted as reported; nothing is recomputed geodesically.
pub fn sum_costs<I>(costs: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    costs.into_iter().fold(0.0, |acc, cost| acc + cost)
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum latitude and longitude
    pub south_west: GeoPoint,
    /// Maximum latitude and longitude
    pub north_east: GeoPoint,
}

impl Bounds {
    /// Box around a set of points, `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grows the box to include `point`.
    pub fn extend(&mut self, point: GeoPoint) {
        self.south_west.latitude = self.south_west.latitude.min(point.latitude);
        self.south_west.longitude = self.south_west.longitude.min(point.longitude);
        self.north_east.latitude = self.north_east.latitude.max(point.latitude);
        self.north_east.longitude = self.north_east.longitude.max(point.longitude);
    }

    /// Midpoint of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }

    /// True if `point` lies inside or on the edge of the box.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_segments() -> Vec<Vec<[f64; 2]>> {
        vec![
            vec![[106.81, -6.26], [106.82, -6.27]],
            vec![[106.82, -6.27], [106.83, -6.28]],
        ]
    }

    #[test]
    fn test_flatten_keeps_boundary_duplicates() {
        let path = GeoPath::from_lon_lat_segments(two_segments());

        assert_eq!(
            path.points(),
            &[
                GeoPoint::new(-6.26, 106.81),
                GeoPoint::new(-6.27, 106.82),
                GeoPoint::new(-6.27, 106.82),
                GeoPoint::new(-6.28, 106.83),
            ]
        );
    }

    #[test]
    fn test_empty_segment_is_skipped() {
        let segments = vec![
            vec![[106.81, -6.26]],
            Vec::new(),
            vec![[106.83, -6.28]],
        ];
        let path = GeoPath::from_lon_lat_segments(segments);
        assert_eq!(path.len(), 2);
        assert_eq!(path.points()[1], GeoPoint::new(-6.28, 106.83));
    }

    #[test]
    fn test_no_segments_is_empty() {
        let path = GeoPath::from_lon_lat_segments(Vec::<Vec<[f64; 2]>>::new());
        assert!(path.is_empty());
        assert!(path.bounds().is_none());
        assert_eq!(path.length_km(), 0.0);
    }

    #[test]
    fn test_sum_costs() {
        assert!((sum_costs([1.2, 0.8]) - 2.0).abs() < 1e-12);
        assert_eq!(sum_costs(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_length_ignores_duplicate_points() {
        let path = GeoPath::from_lon_lat_segments(two_segments());
        let direct = haversine_distance(&GeoPoint::new(-6.26, 106.81), &GeoPoint::new(-6.27, 106.82))
            + haversine_distance(&GeoPoint::new(-6.27, 106.82), &GeoPoint::new(-6.28, 106.83));
        assert!((path.length_km() - direct).abs() < 1e-9);
    }

    #[test]
    fn test_bounds() {
        let path = GeoPath::from_lon_lat_segments(two_segments());
        let bounds = path.bounds().unwrap();

        assert_eq!(bounds.south_west, GeoPoint::new(-6.28, 106.81));
        assert_eq!(bounds.north_east, GeoPoint::new(-6.26, 106.83));
        assert!(bounds.contains(&GeoPoint::new(-6.27, 106.82)));
        assert!(!bounds.contains(&GeoPoint::new(-6.25, 106.82)));

        let center = bounds.center();
        assert!((center.latitude - -6.27).abs() < 1e-9);
        assert!((center.longitude - 106.82).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let path: GeoPath = vec![GeoPoint::new(-6.26, 106.81)].into();
        let json = serde_json::to_value(&path).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["latitude"], -6.26);
    }
}

//! Region catalog: the published texture class polygons of every standard.
//!
//! The tables are compile-time constants. Their order is significant: when
//! a sample lies on an edge shared by two classes, the class listed first
//! wins (see [`crate::classifier`]). Vertices are `(sand, silt, clay)` in
//! percent and every polygon is closed implicitly.

use geo::{Area as _, Centroid as _, Coord, Polygon};
use soil_texture_models::{Coordinate, InvalidStandardError, Standard};

use crate::geometry;

/// A named texture class polygon belonging to one [`Standard`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Standard the class belongs to.
    pub standard: Standard,
    /// Class name, unique within the standard (e.g. "Silt Loam").
    pub name: &'static str,
    /// Polygon vertices in composition space.
    pub vertices: &'static [Coordinate],
}

impl Region {
    /// Boundary-inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        geometry::polygon_contains(self.vertices, point)
    }

    /// The region projected onto the ternary plane.
    #[must_use]
    pub fn polygon(&self) -> Polygon<f64> {
        geometry::to_polygon(self.vertices)
    }

    /// Projected area in squared percent units. The whole triangle measures
    /// `100² · √3 / 4`.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygon().unsigned_area()
    }

    /// Projected centroid, where renderers place the class label.
    #[must_use]
    pub fn label_anchor(&self) -> Option<Coord<f64>> {
        self.polygon().centroid().map(|point| point.0)
    }
}

const fn pt(sand: f64, silt: f64, clay: f64) -> Coordinate {
    Coordinate::new(sand, silt, clay)
}

const fn usda(name: &'static str, vertices: &'static [Coordinate]) -> Region {
    Region {
        standard: Standard::Usda,
        name,
        vertices,
    }
}

const fn hypres(name: &'static str, vertices: &'static [Coordinate]) -> Region {
    Region {
        standard: Standard::Hypres,
        name,
        vertices,
    }
}

/// USDA soil texture triangle, 12 classes.
///
/// Edges are inclusive on both sides, so a sample on a shared edge goes to
/// the class listed first: (30, 30, 40) is Clay Loam rather than Clay and
/// (48, 45, 7) is Sandy Loam rather than Loam.
pub const USDA_REGIONS: &[Region] = &[
    usda(
        "Sand",
        &[pt(100.0, 0.0, 0.0), pt(85.0, 15.0, 0.0), pt(90.0, 0.0, 10.0)],
    ),
    usda(
        "Loamy Sand",
        &[
            pt(85.0, 15.0, 0.0),
            pt(70.0, 30.0, 0.0),
            pt(85.0, 0.0, 15.0),
            pt(90.0, 0.0, 10.0),
        ],
    ),
    usda(
        "Sandy Loam",
        &[
            pt(70.0, 30.0, 0.0),
            pt(50.0, 50.0, 0.0),
            pt(43.0, 50.0, 7.0),
            pt(52.0, 41.0, 7.0),
            pt(52.0, 28.0, 20.0),
            pt(80.0, 0.0, 20.0),
            pt(85.0, 0.0, 15.0),
        ],
    ),
    usda(
        "Loam",
        &[
            pt(43.0, 50.0, 7.0),
            pt(23.0, 50.0, 27.0),
            pt(45.0, 28.0, 27.0),
            pt(52.0, 28.0, 20.0),
            pt(52.0, 41.0, 7.0),
        ],
    ),
    usda(
        "Silt Loam",
        &[
            pt(50.0, 50.0, 0.0),
            pt(20.0, 80.0, 0.0),
            pt(8.0, 80.0, 12.0),
            pt(0.0, 88.0, 12.0),
            pt(0.0, 73.0, 27.0),
            pt(23.0, 50.0, 27.0),
            pt(43.0, 50.0, 7.0),
        ],
    ),
    usda(
        "Silt",
        &[
            pt(20.0, 80.0, 0.0),
            pt(0.0, 100.0, 0.0),
            pt(0.0, 88.0, 12.0),
            pt(8.0, 80.0, 12.0),
        ],
    ),
    usda(
        "Sandy Clay Loam",
        &[
            pt(80.0, 0.0, 20.0),
            pt(52.0, 28.0, 20.0),
            pt(45.0, 28.0, 27.0),
            pt(45.0, 20.0, 35.0),
            pt(65.0, 0.0, 35.0),
        ],
    ),
    usda(
        "Clay Loam",
        &[
            pt(45.0, 28.0, 27.0),
            pt(20.0, 53.0, 27.0),
            pt(20.0, 40.0, 40.0),
            pt(45.0, 15.0, 40.0),
        ],
    ),
    usda(
        "Silty Clay Loam",
        &[
            pt(20.0, 53.0, 27.0),
            pt(0.0, 73.0, 27.0),
            pt(0.0, 60.0, 40.0),
            pt(20.0, 40.0, 40.0),
        ],
    ),
    usda(
        "Sandy Clay",
        &[pt(65.0, 0.0, 35.0), pt(45.0, 20.0, 35.0), pt(45.0, 0.0, 55.0)],
    ),
    usda(
        "Silty Clay",
        &[pt(20.0, 40.0, 40.0), pt(0.0, 60.0, 40.0), pt(0.0, 40.0, 60.0)],
    ),
    usda(
        "Clay",
        &[
            pt(45.0, 15.0, 40.0),
            pt(20.0, 40.0, 40.0),
            pt(0.0, 40.0, 60.0),
            pt(0.0, 0.0, 100.0),
            pt(45.0, 0.0, 55.0),
        ],
    ),
];

/// HYPRES (FAO / European Soil Database) texture classes, 5 classes.
///
/// With shared edges going to the class listed first:
///
/// * Coarse: clay ≤ 18 and sand ≥ 65.
/// * Medium: clay ≤ 35 and sand ≥ 15, outside Coarse.
/// * Medium fine: clay ≤ 35 and sand < 15.
/// * Fine: 35 < clay ≤ 60.
/// * Very fine: clay > 60.
pub const HYPRES_REGIONS: &[Region] = &[
    hypres(
        "Coarse",
        &[
            pt(100.0, 0.0, 0.0),
            pt(65.0, 35.0, 0.0),
            pt(65.0, 17.0, 18.0),
            pt(82.0, 0.0, 18.0),
        ],
    ),
    hypres(
        "Medium",
        &[
            pt(65.0, 35.0, 0.0),
            pt(15.0, 85.0, 0.0),
            pt(15.0, 50.0, 35.0),
            pt(65.0, 0.0, 35.0),
            pt(82.0, 0.0, 18.0),
            pt(65.0, 17.0, 18.0),
        ],
    ),
    hypres(
        "Medium Fine",
        &[
            pt(15.0, 85.0, 0.0),
            pt(0.0, 100.0, 0.0),
            pt(0.0, 65.0, 35.0),
            pt(15.0, 50.0, 35.0),
        ],
    ),
    hypres(
        "Fine",
        &[
            pt(65.0, 0.0, 35.0),
            pt(0.0, 65.0, 35.0),
            pt(0.0, 40.0, 60.0),
            pt(40.0, 0.0, 60.0),
        ],
    ),
    hypres(
        "Very Fine",
        &[pt(40.0, 0.0, 60.0), pt(0.0, 40.0, 60.0), pt(0.0, 0.0, 100.0)],
    ),
];

/// Returns the regions of `standard` in catalog order.
#[must_use]
pub const fn regions_for(standard: Standard) -> &'static [Region] {
    match standard {
        Standard::Usda => USDA_REGIONS,
        Standard::Hypres => HYPRES_REGIONS,
    }
}

/// Looks up the regions of a standard given by name (case-insensitive).
///
/// # Errors
///
/// Returns [`InvalidStandardError`] if `name` is not a known standard.
pub fn regions_for_name(name: &str) -> Result<&'static [Region], InvalidStandardError> {
    let standard: Standard = name.parse()?;
    Ok(regions_for(standard))
}

/// Finds a region of `standard` by exact class name.
#[must_use]
pub fn find_region(standard: Standard, name: &str) -> Option<&'static Region> {
    regions_for(standard).iter().find(|region| region.name == name)
}

/// Class names of `standard` in catalog order.
pub fn region_names(standard: Standard) -> impl Iterator<Item = &'static str> {
    regions_for(standard).iter().map(|region| region.name)
}

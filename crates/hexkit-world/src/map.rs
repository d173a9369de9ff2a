//! Map sites and hex-grid geometry.
//!
//! The map is a rectangular grid of hexagons addressed by integer column/row
//! [`Point`]s in odd-column offset layout: odd columns sit half a hex lower
//! than even ones. [`INVALID_LOCATION`] is the sentinel for "no site".

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, FactionId};

/// Integer map coordinate (column, row).
pub type Point = IVec2;

/// Sentinel location meaning "not on any site".
pub const INVALID_LOCATION: Point = IVec2::new(-1, -1);

/// Returns `true` if `location` is not the invalid sentinel and has no negative
/// component. Whether it lies on a particular map is checked by the world.
#[must_use]
pub fn is_valid_location(location: Point) -> bool {
    location.x >= 0 && location.y >= 0
}

/// Converts an odd-column offset coordinate to cube coordinates.
fn to_cube(p: Point) -> (i32, i32, i32) {
    let x = p.x;
    let z = p.y - (p.x - (p.x & 1)) / 2;
    (x, -x - z, z)
}

/// Number of hex steps between two map coordinates.
///
/// # Example
///
/// ```
/// use hexkit_world::{hex_distance, Point};
///
/// assert_eq!(hex_distance(Point::new(0, 0), Point::new(0, 0)), 0);
/// assert_eq!(hex_distance(Point::new(0, 0), Point::new(1, 0)), 1);
/// assert_eq!(hex_distance(Point::new(0, 0), Point::new(3, 0)), 3);
/// ```
#[must_use]
pub fn hex_distance(a: Point, b: Point) -> i32 {
    let (ax, ay, az) = to_cube(a);
    let (bx, by, bz) = to_cube(b);
    (ax - bx).abs().max((ay - by).abs()).max((az - bz).abs())
}

/// One hexagon of the map.
///
/// The `stack` lists the entities placed on the site in drawing order; the last
/// element is the top of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    location: Point,
    owner: Option<FactionId>,
    stack: Vec<EntityId>,
}

impl Site {
    /// Creates an empty, unowned site.
    #[must_use]
    pub fn new(location: Point) -> Self {
        Self {
            location,
            owner: None,
            stack: Vec::new(),
        }
    }

    /// Returns the site's map coordinate.
    #[must_use]
    pub const fn location(&self) -> Point {
        self.location
    }

    /// Returns the owning faction, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&FactionId> {
        self.owner.as_ref()
    }

    /// Returns the entities on this site, bottom first.
    #[must_use]
    pub fn stack(&self) -> &[EntityId] {
        &self.stack
    }

    /// Returns the entity on top of the stack.
    #[must_use]
    pub fn top(&self) -> Option<&EntityId> {
        self.stack.last()
    }

    /// Returns `true` if the entity is on this site.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.stack.contains(id)
    }

    pub(crate) fn set_owner(&mut self, owner: Option<FactionId>) {
        self.owner = owner;
    }

    pub(crate) fn push(&mut self, id: EntityId) {
        self.stack.push(id);
    }

    pub(crate) fn remove(&mut self, id: &EntityId) -> bool {
        match self.stack.iter().position(|e| e == id) {
            Some(index) => {
                self.stack.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod geometry_tests {
        use super::*;

        #[test]
        fn invalid_location_is_invalid() {
            assert!(!is_valid_location(INVALID_LOCATION));
            assert!(!is_valid_location(Point::new(3, -1)));
            assert!(is_valid_location(Point::new(0, 0)));
        }

        #[test]
        fn neighbours_of_even_column() {
            let center = Point::new(2, 2);
            for n in [
                Point::new(2, 1),
                Point::new(2, 3),
                Point::new(1, 1),
                Point::new(1, 2),
                Point::new(3, 1),
                Point::new(3, 2),
            ] {
                assert_eq!(hex_distance(center, n), 1, "{n:?}");
            }
            assert_eq!(hex_distance(center, Point::new(1, 3)), 2);
        }

        #[test]
        fn neighbours_of_odd_column() {
            let center = Point::new(1, 1);
            for n in [
                Point::new(1, 0),
                Point::new(1, 2),
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(2, 1),
                Point::new(2, 2),
            ] {
                assert_eq!(hex_distance(center, n), 1, "{n:?}");
            }
        }

    }

    mod distance_properties {
        use super::*;
        use proptest::prelude::*;

        fn point() -> impl Strategy<Value = Point> {
            (0..64i32, 0..64i32).prop_map(|(x, y)| Point::new(x, y))
        }

        proptest! {
            #[test]
            fn distance_is_a_metric(a in point(), b in point(), c in point()) {
                prop_assert_eq!(hex_distance(a, b), hex_distance(b, a));
                prop_assert_eq!(hex_distance(a, a), 0);
                prop_assert!(hex_distance(a, c) <= hex_distance(a, b) + hex_distance(b, c));
            }

            #[test]
            fn column_and_row_bound_distance(a in point(), b in point()) {
                let d = hex_distance(a, b);
                prop_assert!(d >= (a.x - b.x).abs());
                prop_assert!(d <= (a.x - b.x).abs() + (a.y - b.y).abs());
            }
        }
    }

    mod site_tests {
        use super::*;

        #[test]
        fn push_and_remove_keep_order() {
            let mut site = Site::new(Point::new(0, 0));
            site.push(EntityId::new("a"));
            site.push(EntityId::new("b"));
            site.push(EntityId::new("c"));
            assert_eq!(site.top(), Some(&EntityId::new("c")));

            assert!(site.remove(&EntityId::new("b")));
            assert_eq!(site.stack(), &[EntityId::new("a"), EntityId::new("c")]);
            assert!(!site.remove(&EntityId::new("b")));
        }
    }
}

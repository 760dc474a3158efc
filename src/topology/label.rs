//! Topological labels: which location (interior, boundary, exterior) each
//! side of a graph component has relative to up to two geometries.

use std::fmt;

/// Location of a point or side relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
    /// Not yet known.
    #[default]
    None,
}

/// Side of a directed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On = 0,
    Left = 1,
    Right = 2,
}

impl Position {
    /// Swaps left and right; `On` is its own opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::On => Self::On,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Locations of the on/left/right positions of a component relative to a
/// single geometry.
///
/// A line-type location only records the `On` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyLocation {
    locations: [Location; 3],
    area: bool,
}

impl TopologyLocation {
    /// Line-type location.
    #[must_use]
    pub fn line(on: Location) -> Self {
        Self {
            locations: [on, Location::None, Location::None],
            area: false,
        }
    }

    /// Area-type location.
    #[must_use]
    pub fn area(on: Location, left: Location, right: Location) -> Self {
        Self {
            locations: [on, left, right],
            area: true,
        }
    }

    #[must_use]
    pub fn is_area(&self) -> bool {
        self.area
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        !self.area
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Location {
        if !self.area && pos != Position::On {
            return Location::None;
        }
        self.locations[pos.index()]
    }

    pub fn set(&mut self, pos: Position, loc: Location) {
        if self.area || pos == Position::On {
            self.locations[pos.index()] = loc;
        }
    }

    fn slots(&self) -> &[Location] {
        if self.area {
            &self.locations
        } else {
            &self.locations[..1]
        }
    }

    /// Returns `true` if every position is unknown.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.slots().iter().all(|l| *l == Location::None)
    }

    /// Returns `true` if any position is unknown.
    #[must_use]
    pub fn is_any_null(&self) -> bool {
        self.slots().iter().any(|l| *l == Location::None)
    }

    pub fn set_all_locations_if_null(&mut self, loc: Location) {
        let n = if self.area { 3 } else { 1 };
        for slot in &mut self.locations[..n] {
            if *slot == Location::None {
                *slot = loc;
            }
        }
    }

    pub fn flip(&mut self) {
        if self.area {
            self.locations.swap(1, 2);
        }
    }

    /// Fills unknown positions from `other`, promoting to area type if
    /// `other` is an area location.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.area && !self.area {
            self.area = true;
            self.locations[1] = Location::None;
            self.locations[2] = Location::None;
        }
        let n = if self.area { 3 } else { 1 };
        for i in 0..n {
            if self.locations[i] == Location::None && (i == 0 || other.area) {
                self.locations[i] = other.locations[i];
            }
        }
    }
}

/// Topological label of a graph component relative to two geometries
/// (slots 0 and 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl Label {
    /// Line label with the same `On` location for both geometries.
    #[must_use]
    pub fn on(loc: Location) -> Self {
        Self {
            elt: [TopologyLocation::line(loc), TopologyLocation::line(loc)],
        }
    }

    /// Area label for geometry `geom_index`; the other slot is an unknown
    /// area location.
    #[must_use]
    pub fn area(geom_index: usize, on: Location, left: Location, right: Location) -> Self {
        let unknown = TopologyLocation::area(Location::None, Location::None, Location::None);
        let mut elt = [unknown, unknown];
        elt[geom_index.min(1)] = TopologyLocation::area(on, left, right);
        Self { elt }
    }

    #[must_use]
    pub fn element(&self, geom_index: usize) -> &TopologyLocation {
        &self.elt[geom_index.min(1)]
    }

    /// Location at `pos` for geometry `geom_index`.
    #[must_use]
    pub fn location(&self, geom_index: usize, pos: Position) -> Location {
        self.element(geom_index).get(pos)
    }

    pub fn set_location(&mut self, geom_index: usize, pos: Position, loc: Location) {
        self.elt[geom_index.min(1)].set(pos, loc);
    }

    pub fn set_all_locations_if_null(&mut self, geom_index: usize, loc: Location) {
        self.elt[geom_index.min(1)].set_all_locations_if_null(loc);
    }

    /// Swaps left and right for both geometries.
    pub fn flip(&mut self) {
        for e in &mut self.elt {
            e.flip();
        }
    }

    /// Returns a copy with left and right swapped.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }

    /// Fills unknown locations of both slots from `other`.
    pub fn merge(&mut self, other: &Label) {
        for (mine, theirs) in self.elt.iter_mut().zip(other.elt.iter()) {
            mine.merge(theirs);
        }
    }

    /// Returns `true` if either slot is area-type.
    #[must_use]
    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    #[must_use]
    pub fn is_area_at(&self, geom_index: usize) -> bool {
        self.element(geom_index).is_area()
    }

    #[must_use]
    pub fn is_line(&self, geom_index: usize) -> bool {
        self.element(geom_index).is_line()
    }

    #[must_use]
    pub fn is_null(&self, geom_index: usize) -> bool {
        self.element(geom_index).is_null()
    }

    #[must_use]
    pub fn is_any_null(&self, geom_index: usize) -> bool {
        self.element(geom_index).is_any_null()
    }

    /// Collapses slot `geom_index` to a line-type location.
    pub fn to_line(&mut self, geom_index: usize) {
        let i = geom_index.min(1);
        if self.elt[i].is_area() {
            self.elt[i] = TopologyLocation::line(self.elt[i].get(Position::On));
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Interior => 'i',
            Self::Boundary => 'b',
            Self::Exterior => 'e',
            Self::None => '-',
        };
        write!(f, "{c}")
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.elt.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "A{i}:")?;
            if e.is_area() {
                write!(f, "{}{}{}", e.get(Position::Left), e.get(Position::On), e.get(Position::Right))?;
            } else {
                write!(f, "{}", e.get(Position::On))?;
            }
        }
        Ok(())
    }
}

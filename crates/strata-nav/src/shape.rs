use strata_geom::Vec2;
use strata_geom::polygon;

/// Closed planar boundary polygon in world XZ.
///
/// Outer boundaries wind counter-clockwise; holes wind clockwise. The last
/// vertex connects back to the first and is not repeated.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedShape {
    pub(crate) vertices: Vec<Vec2>,
}

impl OrderedShape {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn signed_area(&self) -> f32 {
        polygon::signed_area(&self.vertices)
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Interior boundary of a region that is not simply connected.
    pub fn is_hole(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn is_simple(&self) -> bool {
        polygon::is_simple(&self.vertices)
    }

    /// Edges as `(start, end)` pairs, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

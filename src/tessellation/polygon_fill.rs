use std::collections::{HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};
use tracing::trace;

use crate::batch::{Batch, Corner};
use crate::colour::PackedColour;
use crate::error::{Result, TessellationError};
use crate::math::{coincident, Point2};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Fills an arbitrary simple polygon, convex or concave.
///
/// The outline is inserted as a closed constraint loop into a constrained
/// Delaunay triangulation; triangles are kept when reaching them from
/// outside crosses the outline an odd number of times. Nothing is pushed
/// unless the whole outline triangulates.
#[derive(Debug, Clone, Copy)]
pub struct FillPolygon<'a> {
    points: &'a [Point2],
    colour: PackedColour,
}

impl<'a> FillPolygon<'a> {
    /// Creates a white fill of `points`.
    #[must_use]
    pub fn new(points: &'a [Point2]) -> Self {
        Self {
            points,
            colour: PackedColour::WHITE,
        }
    }

    /// Sets the fill colour.
    #[must_use]
    pub fn with_colour(mut self, colour: PackedColour) -> Self {
        self.colour = colour;
        self
    }

    /// Triangulates the outline and pushes the interior triangles.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::TooFewPoints`] when fewer than three
    /// distinct points remain, [`TessellationError::SelfIntersecting`] when
    /// the outline crosses itself, and [`TessellationError::Failed`] when the
    /// triangulator rejects a point (for example a non-finite coordinate).
    pub fn execute<B: Batch>(&self, batch: &mut B) -> Result<()> {
        let outline = distinct_outline(self.points);
        if outline.len() < 3 {
            return Err(TessellationError::TooFewPoints(outline.len()).into());
        }

        let mut cdt = Cdt::new();
        insert_constraint_loop(&mut cdt, &outline)?;
        let interior = classify_interior_faces(&cdt);

        let triangles: Vec<[Point2; 3]> = cdt
            .inner_faces()
            .filter(|face| interior.contains(&face.fix().index()))
            .map(|face| face.vertices().map(|v| to_point(v.position())))
            .collect();
        trace!(
            points = outline.len(),
            triangles = triangles.len(),
            "triangulated polygon fill"
        );

        for [a, b, c] in triangles {
            batch.push_triangle(&[
                Corner::new(a, self.colour),
                Corner::new(b, self.colour),
                Corner::new(c, self.colour),
            ]);
        }
        Ok(())
    }
}

/// Drops consecutive coincident points and a closing point that repeats
/// the first.
fn distinct_outline(points: &[Point2]) -> Vec<SpadePoint2<f64>> {
    let mut kept: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if kept.last().is_some_and(|last| coincident(last, p)) {
            continue;
        }
        kept.push(*p);
    }
    if kept.len() > 1 && coincident(&kept[0], &kept[kept.len() - 1]) {
        kept.pop();
    }
    kept.iter()
        .map(|p| SpadePoint2::new(f64::from(p.x), f64::from(p.y)))
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn to_point(p: SpadePoint2<f64>) -> Point2 {
    Point2::new(p.x as f32, p.y as f32)
}

/// Inserts `points` and constrains the closed loop through them.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[SpadePoint2<f64>]) -> Result<()> {
    let mut handles: Vec<FixedVertexHandle> = Vec::with_capacity(points.len());
    for &pt in points {
        let handle = cdt
            .insert(pt)
            .map_err(|e: InsertionError| TessellationError::Failed(format!("insert: {e}")))?;
        handles.push(handle);
    }

    for (i, &from) in handles.iter().enumerate() {
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::SelfIntersecting.into());
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Flood-fills the inner faces from the hull inward, counting constraint
/// crossings. Faces at odd depth are inside the outline.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer = cdt.outer_face().fix();
    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer {
            continue;
        }
        let Some(inner) = edge.rev().face().as_inner() else {
            continue;
        };
        if !visited.insert(inner.fix().index()) {
            continue;
        }
        let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
        queue.push_back((inner.fix(), depth));
    }

    while let Some((face, depth)) = queue.pop_front() {
        if depth % 2 == 1 {
            interior.insert(face.index());
        }
        for edge in cdt.face(face).adjacent_edges() {
            let Some(neighbour) = edge.rev().face().as_inner() else {
                continue;
            };
            if !visited.insert(neighbour.fix().index()) {
                continue;
            }
            let crossing = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            queue.push_back((neighbour.fix(), depth + crossing));
        }
    }

    interior
}

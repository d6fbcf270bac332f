use super::join::{self, EdgeEnd, JoinPoints};
use super::stroke_style::JoinType;
use crate::batch::{Batch, Corner};
use crate::colour::PackedColour;
use crate::math::{direction, is_reversal, is_straight, signed_angle, Point2};

/// Offset points of one vertex of a stroked ribbon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RibbonJoint {
    /// Closes the edge arriving at this vertex.
    pub incoming: JoinPoints,
    /// Opens the edge leaving this vertex.
    pub outgoing: JoinPoints,
    /// Wedge a smooth join leaves between the two edges: inside point,
    /// then the incoming and outgoing outside points.
    pub fill: Option<[Point2; 3]>,
}

impl RibbonJoint {
    /// A joint where both edges use the same pair of points.
    pub(crate) fn shared(points: JoinPoints) -> Self {
        Self {
            incoming: points,
            outgoing: points,
            fill: None,
        }
    }

    /// Joint at `b` between edges `a -> b` and `b -> c`.
    pub(crate) fn between(
        join: JoinType,
        a: &Point2,
        b: &Point2,
        c: &Point2,
        half_width: f32,
    ) -> Self {
        if let Some(joint) = Self::reversal(a, b, c, half_width) {
            return joint;
        }
        match join {
            JoinType::Smooth => {
                let (end, angle) = join::smooth(a, b, c, half_width, EdgeEnd::End);
                let (start, _) = join::smooth(a, b, c, half_width, EdgeEnd::Start);
                let fill = (!is_straight(angle))
                    .then(|| [end.inside(angle), end.outside(angle), start.outside(angle)]);
                Self {
                    incoming: end,
                    outgoing: start,
                    fill,
                }
            }
            // Unjoined strokes never build a ribbon.
            JoinType::Pointy | JoinType::None => Self::shared(join::pointy(a, b, c, half_width).0),
        }
    }

    /// Joint for a path that doubles back at `b`. Each edge is cut square at
    /// `b`, so the outgoing quad keeps the winding of the incoming one.
    fn reversal(a: &Point2, b: &Point2, c: &Point2, half_width: f32) -> Option<Self> {
        let ab = direction(a, b)?;
        let bc = direction(b, c)?;
        is_reversal(signed_angle(&ab, &bc)).then(|| Self {
            incoming: join::flat_endpoint(b, &ab, half_width),
            outgoing: join::flat_endpoint(b, &bc, half_width),
            fill: None,
        })
    }

    pub(crate) fn map(self, f: impl Fn(Point2) -> Point2) -> Self {
        Self {
            incoming: self.incoming.map(&f),
            outgoing: self.outgoing.map(&f),
            fill: self.fill.map(|tri| tri.map(&f)),
        }
    }
}

/// Emits one quad per edge of a `count`-vertex ribbon, plus the join fills.
///
/// `joint_at` is called once per vertex, in order. Each quad reuses the
/// previous joint's outgoing points as its leading edge. A closed ribbon
/// ends on the very points it started with.
pub(crate) fn emit_ribbon<B, F>(
    batch: &mut B,
    count: usize,
    closed: bool,
    colour: PackedColour,
    mut joint_at: F,
) where
    B: Batch,
    F: FnMut(usize) -> RibbonJoint,
{
    if count < 2 {
        return;
    }
    let edges = if closed { count } else { count - 1 };
    batch.ensure_space((edges * 4).min(batch.max_vertices()));

    let corner = |p: Point2| Corner::new(p, colour);
    let push_fill = |batch: &mut B, fill: Option<[Point2; 3]>| {
        if let Some(tri) = fill {
            batch.push_triangle(&tri.map(corner));
        }
    };

    let first = joint_at(0);
    push_fill(batch, first.fill);
    let mut previous = first.outgoing;
    for i in 1..=edges {
        let joint = if i == count { first } else { joint_at(i) };
        batch.push_quad(&[
            corner(previous.left),
            corner(previous.right),
            corner(joint.incoming.right),
            corner(joint.incoming.left),
        ]);
        if i < count {
            push_fill(batch, joint.fill);
        }
        previous = joint.outgoing;
    }
}

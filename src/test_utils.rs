use approx::abs_diff_eq;

use crate::diagram::{Diagram, EdgeId, VertexId};
use crate::geometry::{cross, distance, Point};

pub fn pt(x: f64, y: f64) -> Point {
    Point::new(x.into(), y.into())
}

pub fn points_close(a: &Point, b: &Point, tol: f64) -> bool {
    abs_diff_eq!(a.x.into_inner(), b.x.into_inner(), epsilon = tol)
        && abs_diff_eq!(a.y.into_inner(), b.y.into_inner(), epsilon = tol)
}

pub fn vertex_degree(diagram: &Diagram, v: VertexId) -> usize {
    diagram
        .edges()
        .iter()
        .filter(|edge| edge.b == Some(v) || edge.e == Some(v))
        .count()
}

/// Points on the edge: closed endpoints, plus probes along each open side.
pub fn edge_samples(diagram: &Diagram, id: EdgeId) -> Vec<Point> {
    let edge = diagram.edge(id);
    match (edge.b, edge.e) {
        (Some(b), Some(e)) => {
            let bp = diagram.vertex(b).center;
            let ep = diagram.vertex(e).center;
            vec![bp, ep, (bp + ep) * 0.5.into()]
        }
        (Some(b), None) => {
            let bp = diagram.vertex(b).center;
            vec![bp, bp + edge.direction * 0.7.into(), bp + edge.direction * 2.3.into()]
        }
        (None, Some(e)) => {
            let ep = diagram.vertex(e).center;
            vec![ep, ep - edge.direction * 0.7.into(), ep - edge.direction * 2.3.into()]
        }
        (None, None) => vec![
            edge.origin,
            edge.origin + edge.direction * 1.3.into(),
            edge.origin - edge.direction * 0.9.into(),
        ],
    }
}

/// Largest deviation from the bisector property over the edge's samples.
pub fn bisector_error(diagram: &Diagram, id: EdgeId) -> f64 {
    let edge = diagram.edge(id);
    let l = diagram.site(edge.l);
    let r = diagram.site(edge.r);
    edge_samples(diagram, id)
        .iter()
        .map(|s| (distance(s, &l) - distance(s, &r)).abs())
        .fold(0.0, f64::max)
}

/// True when the two closed segments cross in their interiors.
pub fn segments_cross(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> bool {
    fn orient(a: &Point, b: &Point, c: &Point) -> f64 {
        let v = cross(*b - *a, *c - *b).into_inner();
        if v.abs() <= 1e-12 {
            0.0
        } else {
            v.signum()
        }
    }
    orient(a1, a2, b1) * orient(a1, a2, b2) < 0.0
        && orient(b1, b2, a1) * orient(b1, b2, a2) < 0.0
}

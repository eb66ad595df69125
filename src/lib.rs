use log::{debug, trace};

pub use crate::diagram::{Diagram, Edge, EdgeId, SiteId, Vertex, VertexId};
pub use crate::geometry::Point;

use crate::beachline::{Beachline, Breakpoint, BreakpointId};
use crate::events::EventQueue;
use crate::geometry::{circumcircle, normal_vector, point_less, point_on_parabola};

mod beachline;
pub mod diagram;
mod events;
pub mod geometry;
#[cfg(test)]
mod test_utils;

/// Sweep the sites left to right and build their Voronoi diagram.
///
/// The sites must be pre-sorted lexicographically by (x, y) under `eps` and
/// contain no duplicates within `eps`; `eps` must be positive and well below
/// the smallest site separation. Edges left with an open endpoint are the
/// unbounded edges of the diagram; their `origin`/`direction` describe the
/// supporting line for the caller to clip.
pub fn fortunes_algorithm(sites: &[Point], eps: f64) -> Diagram {
    debug_assert!(eps > 0.0);
    debug_assert!(sites.windows(2).all(|w| point_less(&w[0], &w[1], eps)));

    let mut diagram = Diagram::new(sites, eps);
    let mut beachline = Beachline::new();
    let mut queue = EventQueue::new();
    debug!("sweeping {} sites, tolerance {:e}", sites.len(), eps);

    for index in 0..diagram.site_count() {
        let site = SiteId(index);
        let p = diagram.site(site);
        while let Some(position) = queue.peek_point() {
            if !point_less(&position, &p, eps) {
                break;
            }
            let (v, pair) = queue.pop().expect("peeked event vanished");
            finalize_event(v, pair, &mut diagram, &mut beachline, &mut queue);
        }
        trace!("site event {:?} at {:?}", site, p);
        insert_arc(site, &mut diagram, &mut beachline, &mut queue);
    }
    while let Some((v, pair)) = queue.pop() {
        finalize_event(v, pair, &mut diagram, &mut beachline, &mut queue);
    }

    debug!(
        "sweep finished: {} vertices, {} edges",
        diagram.vertex_count(),
        diagram.edges().len()
    );
    diagram
}

/// Split the arc under the new site, or attach the new arc above a still
/// degenerate one.
fn insert_arc(
    site: SiteId,
    diagram: &mut Diagram,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
) {
    if beachline.is_fresh() {
        beachline.start(site);
        return;
    }
    let eps = diagram.eps();
    let p = diagram.site(site);
    let arc = beachline.locate_arc(&p, diagram.site_points(), eps);

    // the event that would collapse the located arc dies with the split
    if let (Some(above), Some(below)) = (arc.above, arc.below) {
        let pending = beachline.breakpoint(above).event;
        if pending.is_some() && pending == beachline.breakpoint(below).event {
            delete_event(pending.unwrap(), diagram, beachline, queue);
        }
    }

    let q = arc.site;
    let qp = diagram.site(q);
    if qp.x.into_inner() + eps >= p.x.into_inner() {
        // the located arc is still a horizontal ray, which happens only for
        // the leading run of sites sharing the sweep abscissa; the new arc
        // sits above it and a single breakpoint separates the two rays
        debug_assert!(arc.above.is_none());
        let origin = Point::new(p.x, (p.y + qp.y) / 2.0);
        let edge = diagram.add_edge(q, site, origin, normal_vector(qp - p));
        let top = beachline.insert_after(
            None,
            Breakpoint {
                l: site,
                r: q,
                edge,
                event: None,
            },
        );
        if let Some(below) = arc.below {
            check_event(top, below, &p, diagram, beachline, queue);
        }
    } else {
        let origin = point_on_parabola(&qp, p.x, p.y);
        let edge = diagram.add_edge(q, site, origin, normal_vector(qp - p));
        let upper = beachline.insert_after(
            arc.above,
            Breakpoint {
                l: q,
                r: site,
                edge,
                event: None,
            },
        );
        let lower = beachline.insert_after(
            Some(upper),
            Breakpoint {
                l: site,
                r: q,
                edge,
                event: None,
            },
        );
        if let Some(above) = arc.above {
            check_event(above, upper, &p, diagram, beachline, queue);
        }
        if let Some(below) = arc.below {
            check_event(lower, below, &p, diagram, beachline, queue);
        }
    }
}

/// Schedule the disappearance of the arc between two adjacent breakpoints,
/// if their circumcircle closes ahead of the sweep.
fn check_event(
    upper: BreakpointId,
    lower: BreakpointId,
    sweep: &Point,
    diagram: &mut Diagram,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
) {
    let (a, b, c) = {
        let ub = beachline.breakpoint(upper);
        let lb = beachline.breakpoint(lower);
        debug_assert_eq!(ub.r, lb.l);
        (ub.l, ub.r, lb.r)
    };
    if a == c {
        // both flanking arcs belong to one site
        return;
    }
    let eps = diagram.eps();
    let (pa, pb, pc) = (diagram.site(a), diagram.site(b), diagram.site(c));
    let Some((center, radius)) = circumcircle(&pa, &pb, &pc, eps) else {
        return;
    };
    let touch = Point::new(center.x + radius, center.y);
    if point_less(&touch, sweep, eps) {
        return;
    }
    // a breakpoint backs at most one event: the earlier firing position wins
    for id in [upper, lower] {
        if let Some(pending) = beachline.breakpoint(id).event {
            if point_less(&touch, &diagram.touch_point(pending), eps) {
                delete_event(pending, diagram, beachline, queue);
            } else {
                return;
            }
        }
    }
    let v = diagram.add_vertex(center, radius);
    trace!("circle of {:?}/{:?}/{:?} queued at {:?}", a, b, c, touch);
    queue.push(v, touch, (upper, lower));
    beachline.breakpoint_mut(upper).event = Some(v);
    beachline.breakpoint_mut(lower).event = Some(v);
}

/// Invalidate a pending circle event and free its vertex.
fn delete_event(
    v: VertexId,
    diagram: &mut Diagram,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
) {
    trace!("dropping circle event of {:?}", v);
    let pair = queue.remove(v);
    debug_assert!(pair.is_some(), "deleting an event that is not pending");
    if let Some((upper, lower)) = pair {
        beachline.clear_event(upper, v);
        beachline.clear_event(lower, v);
    }
    diagram.remove_vertex(v);
}

/// Fire a circle event: collapse every breakpoint meeting the vertex, close
/// their edges, and insert the single surviving boundary.
fn finalize_event(
    v: VertexId,
    pair: (BreakpointId, BreakpointId),
    diagram: &mut Diagram,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
) {
    let eps = diagram.eps();
    let probe = diagram.touch_point(v);

    // co-circular sites collapse more than two breakpoints at once; widen
    // the linked pair to the whole range level with the vertex
    let (mut first, mut last) = pair;
    while let Some(prev) = beachline.predecessor(first) {
        let y = beachline.intersect_y(prev, diagram.site_points(), probe.x, eps);
        if (y.into_inner() - probe.y.into_inner()).abs() > eps {
            break;
        }
        first = prev;
    }
    while let Some(next) = beachline.successor(last) {
        let y = beachline.intersect_y(next, diagram.site_points(), probe.x, eps);
        if (y.into_inner() - probe.y.into_inner()).abs() > eps {
            break;
        }
        last = next;
    }
    let above = beachline.predecessor(first);
    let below = beachline.successor(last);

    let mut range = vec![first];
    while *range.last().unwrap() != last {
        let next = beachline
            .successor(*range.last().unwrap())
            .expect("breakpoint range broken");
        range.push(next);
    }
    trace!(
        "circle event at {:?}: {} breakpoints meet {:?}",
        probe,
        range.len(),
        v
    );

    let upper_site = beachline.breakpoint(first).l;
    let lower_site = beachline.breakpoint(last).r;
    for &id in &range {
        // events still linked here either duplicate this circle (co-circular
        // sites) or reference an arc that vanishes with it
        if let Some(pending) = beachline.breakpoint(id).event {
            if pending != v {
                delete_event(pending, diagram, beachline, queue);
            }
        }
        diagram.truncate(beachline.breakpoint(id).edge, v);
    }
    for &id in &range {
        beachline.erase(id);
    }

    let center = diagram.vertex(v).center;
    let direction = normal_vector(diagram.site(lower_site) - diagram.site(upper_site));
    let edge = diagram.add_edge_from(lower_site, upper_site, v, center, direction);
    let merged = beachline.insert_after(
        above,
        Breakpoint {
            l: upper_site,
            r: lower_site,
            edge,
            event: None,
        },
    );
    if let Some(above) = above {
        check_event(above, merged, &probe, diagram, beachline, queue);
    }
    if let Some(below) = below {
        check_event(merged, below, &probe, diagram, beachline, queue);
    }
}

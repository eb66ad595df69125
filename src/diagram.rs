use std::collections::VecDeque;

use ordered_float::OrderedFloat;

use crate::geometry::Point;

/// Handle to an input site; the index into the site sequence.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SiteId(pub(crate) usize);

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VertexId(pub(crate) usize);

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeId(pub(crate) usize);

impl SiteId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A circumcircle: the sweep line first meets it at x = center.x + radius.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Vertex {
    pub center: Point,
    pub radius: OrderedFloat<f64>,
}

impl Vertex {
    pub fn touch(&self) -> OrderedFloat<f64> {
        self.center.x + self.radius
    }
}

/// An oriented edge separating the cells of `l` and `r`.
///
/// Traversed from `b` to `e`, `l` lies on the left and `r` on the right. An
/// unset endpoint extends to infinity: past `b` along `-direction`, past `e`
/// along `direction`. `origin` and `direction` always describe the supporting
/// bisector line, so rays and full lines stay clippable downstream.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Edge {
    pub l: SiteId,
    pub r: SiteId,
    pub b: Option<VertexId>,
    pub e: Option<VertexId>,
    pub origin: Point,
    pub direction: Point,
}

/// The growing diagram: vertices, edges in construction order, and per-site
/// cyclic edge rings in counter-clockwise order.
pub struct Diagram {
    sites: Vec<Point>,
    vertices: Vec<Option<Vertex>>,
    free_vertices: Vec<VertexId>,
    edges: Vec<Edge>,
    cells: Vec<VecDeque<EdgeId>>,
    eps: f64,
}

impl Diagram {
    pub(crate) fn new(sites: &[Point], eps: f64) -> Self {
        Self {
            sites: sites.to_vec(),
            vertices: vec![],
            free_vertices: vec![],
            edges: vec![],
            cells: vec![VecDeque::new(); sites.len()],
            eps,
        }
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn site(&self, id: SiteId) -> Point {
        self.sites[id.0]
    }

    pub fn site_points(&self) -> &[Point] {
        &self.sites
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub(crate) fn add_vertex(&mut self, center: Point, radius: OrderedFloat<f64>) -> VertexId {
        let vertex = Vertex { center, radius };
        match self.free_vertices.pop() {
            Some(id) => {
                self.vertices[id.0] = Some(vertex);
                id
            }
            None => {
                let id = VertexId(self.vertices.len());
                self.vertices.push(Some(vertex));
                id
            }
        }
    }

    pub(crate) fn remove_vertex(&mut self, id: VertexId) {
        let slot = self.vertices[id.0].take();
        debug_assert!(slot.is_some(), "vertex removed twice");
        self.free_vertices.push(id);
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.vertices[id.0].as_ref().expect("vertex was removed")
    }

    /// The sweep-line position at which the vertex's event fires.
    pub(crate) fn touch_point(&self, id: VertexId) -> Point {
        let vertex = self.vertex(id);
        Point::new(vertex.touch(), vertex.center.y)
    }

    /// Live vertices ordered by (center.x, center.y).
    pub fn vertices(&self) -> Vec<(VertexId, &Vertex)> {
        let mut out: Vec<_> = self
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (VertexId(i), v)))
            .collect();
        out.sort_by_key(|(_, v)| (v.center.x, v.center.y));
        out
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().flatten().count()
    }

    /// New edge with both endpoints open, hooked into both cell rings: front
    /// of the left cell, back of the right cell.
    pub(crate) fn add_edge(
        &mut self,
        l: SiteId,
        r: SiteId,
        origin: Point,
        direction: Point,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            l,
            r,
            b: None,
            e: None,
            origin,
            direction,
        });
        self.cells[l.0].push_front(id);
        self.cells[r.0].push_back(id);
        id
    }

    /// New edge that begins at an already finalised vertex.
    pub(crate) fn add_edge_from(
        &mut self,
        l: SiteId,
        r: SiteId,
        b: VertexId,
        origin: Point,
        direction: Point,
    ) -> EdgeId {
        let id = self.add_edge(l, r, origin, direction);
        self.edges[id.0].b = Some(b);
        id
    }

    /// Close one end of the edge with `v`.
    ///
    /// When both ends are still open, the sites' relative position decides
    /// which end `v` is, preserving the l-left / r-right traversal invariant.
    pub(crate) fn truncate(&mut self, id: EdgeId, v: VertexId) {
        let center = self.vertex(v).center;
        let edge = &mut self.edges[id.0];
        match (edge.b, edge.e) {
            (None, None) => {
                let l = self.sites[edge.l.0];
                let r = self.sites[edge.r.0];
                let begins = (r.x < l.x && center.y < l.y) || (l.x < r.x && r.y < center.y);
                if begins {
                    edge.b = Some(v);
                } else {
                    edge.e = Some(v);
                }
            }
            (Some(_), None) => edge.e = Some(v),
            (None, Some(_)) => edge.b = Some(v),
            (Some(_), Some(_)) => debug_assert!(false, "edge already closed at both ends"),
        }
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn cell(&self, site: SiteId) -> &VecDeque<EdgeId> {
        &self.cells[site.0]
    }

    pub fn cells(&self) -> impl Iterator<Item = (SiteId, &VecDeque<EdgeId>)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, ring)| (SiteId(i), ring))
    }
}

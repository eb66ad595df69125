use ordered_float::OrderedFloat;

use crate::diagram::{EdgeId, SiteId, VertexId};
use crate::geometry::{breakpoint_y, Point};

/// Handle to a live beach-line node. Stable across every insertion and
/// erasure of other nodes; slots are recycled only after the handle is dead.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BreakpointId(pub(crate) usize);

/// Boundary between the arc of `l` (above) and the arc of `r` (below). It
/// traces `edge` as the sweep advances and backs at most one pending circle
/// event.
pub struct Breakpoint {
    pub l: SiteId,
    pub r: SiteId,
    pub edge: EdgeId,
    pub event: Option<VertexId>,
}

struct Node {
    parent: Option<BreakpointId>,
    left: Option<BreakpointId>,
    right: Option<BreakpointId>,
    breakpoint: Breakpoint,
}

/// The beach line: breakpoints in top-to-bottom order, kept in an
/// arena-backed search tree with parent links.
///
/// In-order position is fixed at insertion time against located neighbours
/// (`insert_after`), never by comparing stored keys: the relative order of
/// live breakpoints cannot change between events, and converging ones are
/// erased by their circle event before they could cross. Keys are never
/// rewritten in place.
pub struct Beachline {
    root: Option<BreakpointId>,
    nodes: Vec<Option<Node>>,
    free: Vec<BreakpointId>,
    lone_arc: Option<SiteId>,
}

/// An arc located under a probe point, with its bounding breakpoints.
pub struct ArcRef {
    pub above: Option<BreakpointId>,
    pub below: Option<BreakpointId>,
    pub site: SiteId,
}

impl Beachline {
    pub fn new() -> Self {
        Self {
            root: None,
            nodes: vec![],
            free: vec![],
            lone_arc: None,
        }
    }

    /// True until the first arc exists.
    pub fn is_fresh(&self) -> bool {
        self.root.is_none() && self.lone_arc.is_none()
    }

    /// Install the very first arc; no breakpoint exists yet.
    pub fn start(&mut self, site: SiteId) {
        debug_assert!(self.is_fresh());
        self.lone_arc = Some(site);
    }

    fn node(&self, id: BreakpointId) -> &Node {
        self.nodes[id.0].as_ref().expect("breakpoint was erased")
    }

    fn node_mut(&mut self, id: BreakpointId) -> &mut Node {
        self.nodes[id.0].as_mut().expect("breakpoint was erased")
    }

    pub fn breakpoint(&self, id: BreakpointId) -> &Breakpoint {
        &self.node(id).breakpoint
    }

    pub fn breakpoint_mut(&mut self, id: BreakpointId) -> &mut Breakpoint {
        &mut self.node_mut(id).breakpoint
    }

    /// Null the event back-reference if it still names `v`. Quiet when the
    /// node is already gone.
    pub fn clear_event(&mut self, id: BreakpointId, v: VertexId) {
        if let Some(node) = self.nodes[id.0].as_mut() {
            if node.breakpoint.event == Some(v) {
                node.breakpoint.event = None;
            }
        }
    }

    /// Intersection ordinate of this breakpoint's arcs at directrix `d`.
    pub fn intersect_y(
        &self,
        id: BreakpointId,
        sites: &[Point],
        d: OrderedFloat<f64>,
        eps: f64,
    ) -> OrderedFloat<f64> {
        let breakpoint = self.breakpoint(id);
        breakpoint_y(&sites[breakpoint.l.0], &sites[breakpoint.r.0], d, eps)
    }

    fn leftmost(&self, mut id: BreakpointId) -> BreakpointId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: BreakpointId) -> BreakpointId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// Next breakpoint above, in beach order.
    pub fn predecessor(&self, id: BreakpointId) -> Option<BreakpointId> {
        if let Some(left) = self.node(id).left {
            return Some(self.rightmost(left));
        }
        let mut curr = id;
        while let Some(parent) = self.node(curr).parent {
            if self.node(parent).right == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Next breakpoint below, in beach order.
    pub fn successor(&self, id: BreakpointId) -> Option<BreakpointId> {
        if let Some(right) = self.node(id).right {
            return Some(self.leftmost(right));
        }
        let mut curr = id;
        while let Some(parent) = self.node(curr).parent {
            if self.node(parent).left == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Which arc sits at the probe's ordinate, for the directrix through the
    /// probe's abscissa. A probe level with a breakpoint resolves into the
    /// arc above it, so a site landing exactly on a breakpoint splits the
    /// upper arc.
    pub fn locate_arc(&self, probe: &Point, sites: &[Point], eps: f64) -> ArcRef {
        let mut above = None;
        let mut below = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            let y = self.intersect_y(id, sites, probe.x, eps);
            if probe.y.into_inner() + eps < y.into_inner() {
                above = Some(id);
                curr = self.node(id).right;
            } else {
                below = Some(id);
                curr = self.node(id).left;
            }
        }
        if let (Some(a), Some(b)) = (above, below) {
            debug_assert_eq!(self.breakpoint(a).r, self.breakpoint(b).l);
        }
        let site = match (above, below) {
            (Some(a), _) => self.breakpoint(a).r,
            (None, Some(b)) => self.breakpoint(b).l,
            (None, None) => self.lone_arc.expect("locate_arc on an empty beach line"),
        };
        ArcRef { above, below, site }
    }

    fn alloc(&mut self, breakpoint: Breakpoint) -> BreakpointId {
        let node = Node {
            parent: None,
            left: None,
            right: None,
            breakpoint,
        };
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.nodes[id.0].is_none());
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                let id = BreakpointId(self.nodes.len());
                self.nodes.push(Some(node));
                id
            }
        }
    }

    /// Insert directly after `anchor` in beach order; `None` inserts at the
    /// top. The caller has already located the neighbours; a newborn
    /// breakpoint may compare equal to them by formula, so its position is
    /// given, never computed.
    pub fn insert_after(&mut self, anchor: Option<BreakpointId>, breakpoint: Breakpoint) -> BreakpointId {
        let id = self.alloc(breakpoint);
        let slot = match anchor {
            None => match self.root {
                None => {
                    self.root = Some(id);
                    return id;
                }
                Some(root) => self.leftmost(root),
            },
            Some(anchor) => match self.node(anchor).right {
                None => {
                    self.node_mut(anchor).right = Some(id);
                    self.node_mut(id).parent = Some(anchor);
                    return id;
                }
                Some(right) => self.leftmost(right),
            },
        };
        debug_assert!(self.node(slot).left.is_none());
        self.node_mut(slot).left = Some(id);
        self.node_mut(id).parent = Some(slot);
        id
    }

    /// Unlink and free a node. Surviving handles are untouched: removal
    /// relinks the structure instead of moving keys between slots.
    pub fn erase(&mut self, id: BreakpointId) {
        let node = self.nodes[id.0].take().expect("breakpoint erased twice");
        let replacement = match (node.left, node.right) {
            (None, None) => None,
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (Some(left), Some(right)) => {
                let succ = self.leftmost(right);
                if succ != right {
                    let succ_parent = self.node(succ).parent.expect("successor without parent");
                    let succ_right = self.node(succ).right;
                    self.node_mut(succ_parent).left = succ_right;
                    if let Some(sr) = succ_right {
                        self.node_mut(sr).parent = Some(succ_parent);
                    }
                    self.node_mut(succ).right = Some(right);
                    self.node_mut(right).parent = Some(succ);
                }
                self.node_mut(succ).left = Some(left);
                self.node_mut(left).parent = Some(succ);
                Some(succ)
            }
        };
        if let Some(replacement) = replacement {
            self.node_mut(replacement).parent = node.parent;
        }
        match node.parent {
            None => self.root = replacement,
            Some(parent) => {
                let parent_node = self.node_mut(parent);
                if parent_node.left == Some(id) {
                    parent_node.left = replacement;
                } else {
                    debug_assert_eq!(parent_node.right, Some(id));
                    parent_node.right = replacement;
                }
            }
        }
        self.free.push(id);
    }

    #[cfg(test)]
    fn in_order(&self) -> Vec<BreakpointId> {
        let mut out = vec![];
        let mut curr = self.root.map(|root| self.leftmost(root));
        while let Some(id) = curr {
            out.push(id);
            curr = self.successor(id);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::pt;

    const EPS: f64 = 1e-9;

    fn bp(l: usize, r: usize) -> Breakpoint {
        Breakpoint {
            l: SiteId(l),
            r: SiteId(r),
            edge: EdgeId(0),
            event: None,
        }
    }

    #[test]
    fn positional_insertion_keeps_beach_order() {
        let mut beach = Beachline::new();

        let top = beach.insert_after(None, bp(0, 1));
        let bottom = beach.insert_after(Some(top), bp(1, 0));
        let middle = beach.insert_after(Some(top), bp(1, 2));
        let newest_top = beach.insert_after(None, bp(3, 0));

        assert_eq!(beach.in_order(), vec![newest_top, top, middle, bottom]);
        assert_eq!(beach.predecessor(middle), Some(top));
        assert_eq!(beach.successor(middle), Some(bottom));
        assert_eq!(beach.predecessor(newest_top), None);
        assert_eq!(beach.successor(bottom), None);
    }

    #[test]
    fn erasure_relinks_without_touching_other_handles() {
        let mut beach = Beachline::new();
        let a = beach.insert_after(None, bp(0, 1));
        let c = beach.insert_after(Some(a), bp(1, 2));
        let b = beach.insert_after(Some(a), bp(9, 9));
        let d = beach.insert_after(Some(c), bp(2, 3));
        assert_eq!(beach.in_order(), vec![a, b, c, d]);

        // c holds two children here: b hangs to its left, d to its right
        beach.erase(c);
        assert_eq!(beach.in_order(), vec![a, b, d]);
        assert_eq!(beach.breakpoint(b).l, SiteId(9));

        beach.erase(a);
        assert_eq!(beach.in_order(), vec![b, d]);

        beach.erase(d);
        beach.erase(b);
        assert_eq!(beach.in_order(), vec![]);
    }

    #[test]
    fn erased_slots_are_recycled() {
        let mut beach = Beachline::new();
        let a = beach.insert_after(None, bp(0, 1));
        let b = beach.insert_after(Some(a), bp(1, 0));
        beach.erase(b);

        let c = beach.insert_after(Some(a), bp(1, 2));
        assert_eq!(b, c);
        assert_eq!(beach.in_order(), vec![a, c]);
    }

    #[test]
    fn locate_arc_walks_to_the_bounded_arc() {
        // two grown arcs of (0,0) around the young arc of (1,0); at d = 2 the
        // breakpoints sit at y = ±√2
        let sites = vec![pt(0.0, 0.0), pt(1.0, 0.0)];
        let mut beach = Beachline::new();
        beach.start(SiteId(0));
        let upper = beach.insert_after(None, bp(0, 1));
        let lower = beach.insert_after(Some(upper), bp(1, 0));

        let inner = beach.locate_arc(&pt(2.0, 0.0), &sites, EPS);
        assert_eq!(inner.site, SiteId(1));
        assert_eq!(inner.above, Some(upper));
        assert_eq!(inner.below, Some(lower));

        let above_all = beach.locate_arc(&pt(2.0, 3.0), &sites, EPS);
        assert_eq!(above_all.site, SiteId(0));
        assert_eq!(above_all.above, None);
        assert_eq!(above_all.below, Some(upper));

        let below_all = beach.locate_arc(&pt(2.0, -3.0), &sites, EPS);
        assert_eq!(below_all.site, SiteId(0));
        assert_eq!(below_all.above, Some(lower));
        assert_eq!(below_all.below, None);
    }

    #[test]
    fn probe_level_with_a_breakpoint_resolves_above_it() {
        let sites = vec![pt(0.0, 0.0), pt(1.0, 0.0)];
        let mut beach = Beachline::new();
        beach.start(SiteId(0));
        let upper = beach.insert_after(None, bp(0, 1));
        let lower = beach.insert_after(Some(upper), bp(1, 0));

        let level = beach.locate_arc(&pt(2.0, 2.0_f64.sqrt()), &sites, EPS);
        assert_eq!(level.site, SiteId(0));
        assert_eq!(level.below, Some(upper));

        let level = beach.locate_arc(&pt(2.0, -(2.0_f64.sqrt())), &sites, EPS);
        assert_eq!(level.site, SiteId(1));
        assert_eq!(level.above, Some(upper));
        assert_eq!(level.below, Some(lower));
    }

    #[test]
    fn lone_arc_backs_the_empty_tree() {
        let mut beach = Beachline::new();
        assert!(beach.is_fresh());
        beach.start(SiteId(0));
        assert!(!beach.is_fresh());

        let sites = vec![pt(0.0, 0.0)];
        let arc = beach.locate_arc(&pt(1.0, 5.0), &sites, EPS);
        assert_eq!(arc.site, SiteId(0));
        assert_eq!(arc.above, None);
        assert_eq!(arc.below, None);
    }
}

use std::cmp::Reverse;
use std::collections::HashMap;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;

use crate::beachline::BreakpointId;
use crate::diagram::VertexId;
use crate::geometry::Point;

type EventKey = Reverse<(OrderedFloat<f64>, OrderedFloat<f64>)>;

/// Pending circle events: vertices keyed by the sweep position (touch, y) at
/// which they fire, each cross-linked to the pair of adjacent breakpoints
/// whose middle arc disappears. Obsolete events are removed by their vertex
/// handle.
pub struct EventQueue {
    queue: PriorityQueue<VertexId, EventKey>,
    links: HashMap<VertexId, (BreakpointId, BreakpointId)>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            links: HashMap::new(),
        }
    }

    pub fn push(&mut self, v: VertexId, touch: Point, pair: (BreakpointId, BreakpointId)) {
        let stale = self.queue.push(v, Reverse((touch.x, touch.y)));
        debug_assert!(stale.is_none(), "vertex enqueued twice");
        self.links.insert(v, pair);
    }

    /// Sweep position of the earliest pending event.
    pub fn peek_point(&self) -> Option<Point> {
        self.queue
            .peek()
            .map(|(_, Reverse((x, y)))| Point::new(*x, *y))
    }

    pub fn pop(&mut self) -> Option<(VertexId, (BreakpointId, BreakpointId))> {
        let (v, _) = self.queue.pop()?;
        let pair = self.links.remove(&v).expect("event without breakpoint links");
        Some((v, pair))
    }

    /// Drop a pending event, handing back its breakpoint pair so the caller
    /// can null the back-references.
    pub fn remove(&mut self, v: VertexId) -> Option<(BreakpointId, BreakpointId)> {
        self.queue.remove(&v)?;
        self.links.remove(&v)
    }
}

use std::{
    fmt,
    ops::{Add, Mul, Sub},
};

use ordered_float::OrderedFloat;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: OrderedFloat<f64>,
    pub y: OrderedFloat<f64>,
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x.into_inner(), self.y.into_inner())
    }
}

impl Point {
    pub fn new(x: OrderedFloat<f64>, y: OrderedFloat<f64>) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<OrderedFloat<f64>> for Point {
    type Output = Self;

    fn mul(self, rhs: OrderedFloat<f64>) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Lexicographic (x then y) order with slack `eps` on both axes.
pub fn point_less(p: &Point, q: &Point, eps: f64) -> bool {
    if p.x.into_inner() + eps < q.x.into_inner() {
        return true;
    }
    if q.x.into_inner() + eps < p.x.into_inner() {
        return false;
    }
    p.y.into_inner() + eps < q.y.into_inner()
}

pub fn cross(a: Point, b: Point) -> OrderedFloat<f64> {
    a.x * b.y - a.y * b.x
}

pub fn normal_vector(point: Point) -> Point {
    Point::new(-point.y, point.x)
}

pub fn distance(a: &Point, b: &Point) -> OrderedFloat<f64> {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    OrderedFloat((dx * dx + dy * dy).sqrt())
}

/// Ordinate where the arcs of foci `l` (above) and `r` (below) meet, for the
/// directrix x = d.
///
/// A focus within `eps` of the directrix still traces a horizontal ray, so
/// those cases short-circuit before the quadratic. Foci sharing an abscissa
/// give parabolas that are reflections across a horizontal line, and the
/// intersection reduces to the midpoint of the ordinates.
pub fn breakpoint_y(l: &Point, r: &Point, d: OrderedFloat<f64>, eps: f64) -> OrderedFloat<f64> {
    let l_on_directrix = l.x.into_inner() + eps >= d.into_inner();
    let r_on_directrix = r.x.into_inner() + eps >= d.into_inner();
    match (l_on_directrix, r_on_directrix) {
        (true, true) => (l.y + r.y) / 2.0,
        (true, false) => l.y,
        (false, true) => r.y,
        (false, false) => {
            if (l.x - r.x).abs() <= eps {
                return (l.y + r.y) / 2.0;
            }
            let dl = d - l.x;
            let dr = d - r.x;
            let a = dr - dl;
            let b = (l.y * dr - r.y * dl) * -2.0;
            let c = l.y * l.y * dr - r.y * r.y * dl - dl * dr * a;
            let discrim = b * b - a * c * 4.0;
            debug_assert!(discrim.into_inner() >= 0.0);
            // of the two intersections, this root keeps l's arc above
            (-b - discrim.sqrt()) / (a * 2.0)
        }
    }
}

/// The point of the parabola of `focus` (directrix x = d) at ordinate `y`.
pub fn point_on_parabola(focus: &Point, d: OrderedFloat<f64>, y: OrderedFloat<f64>) -> Point {
    let dy = y - focus.y;
    let dx = focus.x - d;
    debug_assert!(dx.into_inner() != 0.0);
    let x = (dy * dy + focus.x * focus.x - d * d) / (dx * 2.0);
    Point::new(x, y)
}

/// Circumcircle of the counter-clockwise triple (a, b, c).
///
/// Returns `None` when the doubled signed area is at most `eps`²: a
/// collinear or clockwise triple, whose breakpoints diverge. The radius
/// comes from the three edge lengths, not from the center.
pub fn circumcircle(
    a: &Point,
    b: &Point,
    c: &Point,
    eps: f64,
) -> Option<(Point, OrderedFloat<f64>)> {
    let g = cross(*b - *a, *c - *b);
    if g.into_inner() <= eps * eps {
        return None;
    }

    let c1 = c.x * c.x + c.y * c.y - a.x * a.x - a.y * a.y;
    let c2 = c.x * c.x + c.y * c.y - b.x * b.x - b.y * b.y;
    let a1 = (a.x - c.x) * -2.0;
    let a2 = (b.x - c.x) * -2.0;
    let b1 = (a.y - c.y) * -2.0;
    let b2 = (b.y - c.y) * -2.0;

    let denom = b1 * a2 - b2 * a1;
    debug_assert!(denom.into_inner() != 0.0);
    let y_cen = (c1 * a2 - c2 * a1) / denom;
    let x_cen = if a2.into_inner() != 0.0 {
        (c2 - b2 * y_cen) / a2
    } else {
        (c1 - b1 * y_cen) / a1
    };

    let ab = distance(a, b);
    let bc = distance(b, c);
    let ca = distance(c, a);
    let heron = (ab + bc - ca) * (ab + ca - bc) * (bc + ca - ab) * (ab + bc + ca);
    debug_assert!(
        heron.into_inner() > 0.0,
        "tolerance too coarse for the coordinate scale"
    );
    let radius = ab * bc * ca / heron.sqrt();

    Some((Point::new(x_cen, y_cen), radius))
}

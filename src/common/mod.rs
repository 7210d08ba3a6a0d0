use std::ops::{Add, Sub};

use serde::Deserialize;

pub mod signal;

pub use signal::{Signal, WireColor};

// 위치 (x, y), virtual pixels
#[derive(Debug, Default, Copy, Clone, PartialEq, Deserialize)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.0 - other.0;
        let dy = self.1 - other.1;
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Point(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Point(self.0 - rhs.0, self.1 - rhs.1)
    }
}

// 사이즈 (width, height)
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Size(pub f64, pub f64);

impl Size {
    pub fn width(&self) -> f64 {
        self.0
    }

    pub fn height(&self) -> f64 {
        self.1
    }

    pub fn center(&self) -> Point {
        Point(self.0 / 2., self.1 / 2.)
    }
}

/// Axis aligned box centered on a position. Edges are part of the box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub center: Point,
    pub size: Size,
}

impl BoundingBox {
    pub fn new(center: Point, size: Size) -> Self {
        Self { center, size }
    }

    pub fn left(&self) -> f64 {
        self.center.0 - self.size.0 / 2.
    }

    pub fn right(&self) -> f64 {
        self.center.0 + self.size.0 / 2.
    }

    pub fn top(&self) -> f64 {
        self.center.1 - self.size.1 / 2.
    }

    pub fn bottom(&self) -> f64 {
        self.center.1 + self.size.1 / 2.
    }

    pub fn contains(&self, point: Point) -> bool {
        point.0 >= self.left()
            && point.0 <= self.right()
            && point.1 >= self.top()
            && point.1 <= self.bottom()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unittest_bounding_box_edges() {
        let bound = BoundingBox::new(Point(100., 200.), Size(50., 76.));

        assert!(bound.contains(Point(75., 200.)));
        assert!(bound.contains(Point(125., 162.)));
        assert!(bound.contains(Point(100., 238.)));
        assert!(!bound.contains(Point(74., 200.)));
        assert!(!bound.contains(Point(126., 200.)));
        assert!(!bound.contains(Point(100., 161.)));
        assert!(!bound.contains(Point(100., 239.)));
    }

    #[test]
    fn unittest_point_arith() {
        let p = Point(3., 4.) + Point(1., -1.);
        assert_eq!(p, Point(4., 3.));
        assert_eq!((p - Point(4., 3.)).distance_squared(&Point::default()), 0.);
        assert_eq!(Point(0., 0.).distance_squared(&Point(3., 4.)), 25.);
    }
}

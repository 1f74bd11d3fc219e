//! Core geometry types for layout and painting
//!
//! This module provides the geometric primitives used throughout the
//! highlight pipeline. All units are in CSS pixels.
//!
//! # Coordinate System
//!
//! The coordinate system has its origin at the top-left corner:
//! - Positive X extends to the right
//! - Positive Y extends downward
//!
//! This matches CSS's coordinate system as defined in CSS 2.1 Section 8.3.1.

use std::fmt;

/// A 2D point in CSS pixel space
///
/// Represents a coordinate in the document's coordinate system.
/// The origin (0, 0) is at the top-left corner.
///
/// # Examples
///
/// ```
/// use overmark::Point;
///
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::ZERO;
///
/// assert_eq!(p1.x, 10.0);
/// assert_eq!(p1.y, 20.0);
/// assert_eq!(p2, Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  /// X coordinate (horizontal position, increases to the right)
  pub x: f32,
  /// Y coordinate (vertical position, increases downward)
  pub y: f32,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

  /// Creates a new point at the given coordinates
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  /// Translates this point by another point's coordinates
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::Point;
  ///
  /// let p1 = Point::new(10.0, 20.0);
  /// let p2 = Point::new(5.0, 3.0);
  /// let result = p1.translate(p2);
  ///
  /// assert_eq!(result, Point::new(15.0, 23.0));
  /// ```
  pub fn translate(self, other: Point) -> Self {
    Self {
      x: self.x + other.x,
      y: self.y + other.y,
    }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A 2D size in CSS pixels
///
/// Represents the dimensions of a rectangular region.
/// Both width and height are non-negative (though not enforced by the type).
///
/// # Examples
///
/// ```
/// use overmark::Size;
///
/// let size = Size::new(100.0, 50.0);
/// assert_eq!(size.width, 100.0);
/// assert_eq!(size.height, 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
  /// Width (horizontal extent)
  pub width: f32,
  /// Height (vertical extent)
  pub height: f32,
}

impl Size {
  /// A size with zero width and height
  pub const ZERO: Self = Self {
    width: 0.0,
    height: 0.0,
  };

  /// Creates a new size with the given dimensions
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// Returns true if either width or height is zero
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::Size;
  ///
  /// assert!(Size::ZERO.is_empty());
  /// assert!(Size::new(0.0, 10.0).is_empty());
  /// assert!(!Size::new(10.0, 10.0).is_empty());
  /// ```
  pub fn is_empty(self) -> bool {
    self.width == 0.0 || self.height == 0.0
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}×{}", self.width, self.height)
  }
}

/// An axis-aligned rectangle in CSS pixel space
///
/// Defined by an origin point (top-left corner) and a size. This is the
/// currency of the rect pipeline: line geometry, adjusted highlight boxes,
/// and painted regions are all `Rect`s.
///
/// # Examples
///
/// ```
/// use overmark::{Rect, Point, Size};
///
/// let rect = Rect::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
/// assert_eq!(rect.x(), 10.0);
/// assert_eq!(rect.y(), 20.0);
/// assert_eq!(rect.width(), 100.0);
/// assert_eq!(rect.height(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  /// The top-left corner of the rectangle
  pub origin: Point,
  /// The size (width and height) of the rectangle
  pub size: Size,
}

impl Rect {
  /// A zero-sized rectangle at the origin
  pub const ZERO: Self = Self {
    origin: Point::ZERO,
    size: Size::ZERO,
  };

  /// Creates a new rectangle from an origin point and size
  pub const fn new(origin: Point, size: Size) -> Self {
    Self { origin, size }
  }

  /// Creates a rectangle from x, y, width, height components
  ///
  /// This is a convenience constructor for the common case.
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::Rect;
  ///
  /// let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);
  /// assert_eq!(rect.x(), 10.0);
  /// assert_eq!(rect.width(), 100.0);
  /// ```
  pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      origin: Point::new(x, y),
      size: Size::new(width, height),
    }
  }

  // Accessor methods

  /// Returns the x coordinate of the left edge
  pub fn x(self) -> f32 {
    self.origin.x
  }

  /// Returns the y coordinate of the top edge
  pub fn y(self) -> f32 {
    self.origin.y
  }

  /// Returns the width
  pub fn width(self) -> f32 {
    self.size.width
  }

  /// Returns the height
  pub fn height(self) -> f32 {
    self.size.height
  }

  /// Returns the x coordinate of the left edge (same as x())
  pub fn min_x(self) -> f32 {
    self.origin.x
  }

  /// Returns the x coordinate of the right edge
  pub fn max_x(self) -> f32 {
    self.origin.x + self.size.width
  }

  /// Returns the y coordinate of the top edge (same as y())
  pub fn min_y(self) -> f32 {
    self.origin.y
  }

  /// Returns the y coordinate of the bottom edge
  pub fn max_y(self) -> f32 {
    self.origin.y + self.size.height
  }

  /// Returns true if the rectangle has zero width or height
  pub fn is_empty(self) -> bool {
    self.size.is_empty()
  }

  // Geometric operations

  /// Computes the union of two rectangles
  ///
  /// Returns the smallest rectangle that contains both rectangles.
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::Rect;
  ///
  /// let rect1 = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
  /// let rect2 = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
  /// let union = rect1.union(rect2);
  ///
  /// assert_eq!(union, Rect::from_xywh(0.0, 0.0, 15.0, 15.0));
  /// ```
  pub fn union(self, other: Rect) -> Rect {
    let min_x = self.min_x().min(other.min_x());
    let min_y = self.min_y().min(other.min_y());
    let max_x = self.max_x().max(other.max_x());
    let max_y = self.max_y().max(other.max_y());

    Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
  }

  /// Translates this rectangle by an offset
  ///
  /// # Examples
  ///
  /// ```
  /// use overmark::{Rect, Point};
  ///
  /// let rect = Rect::from_xywh(10.0, 10.0, 20.0, 20.0);
  /// let translated = rect.translate(Point::new(5.0, 3.0));
  ///
  /// assert_eq!(translated, Rect::from_xywh(15.0, 13.0, 20.0, 20.0));
  /// ```
  pub fn translate(self, offset: Point) -> Rect {
    Rect {
      origin: self.origin.translate(offset),
      size: self.size,
    }
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[{} {} @ {}, {}]",
      self.size.width, self.size.height, self.origin.x, self.origin.y
    )
  }
}

//! Drag-to-select of OCR regions on the displayed screenshot.
//!
//! Coordinates come in as rendered (on-screen) pixels relative to the
//! screenshot container and leave as integer pixels of the screenshot's
//! natural resolution.

use ocrpanel_types::{Point, Region, Size};

use crate::error::SelectionError;

/// Smallest accepted width and height, in rendered pixels
pub const MIN_REGION_SIZE: u32 = 10;

pub const DEFAULT_REGION_NAME: &str = "Unnamed Region";

/// Axis-aligned rectangle with `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// Rectangle spanned by two drag corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Reject anything under `MIN_REGION_SIZE` on either axis
    pub fn validate(&self) -> Result<(), SelectionError> {
        let (width, height) = (self.width(), self.height());
        let min = f64::from(MIN_REGION_SIZE);
        if !(width >= min && height >= min) {
            return Err(SelectionError::TooSmall {
                width,
                height,
                min: MIN_REGION_SIZE,
            });
        }
        Ok(())
    }
}

/// A validated selection, already rescaled to natural pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRegion {
    pub display: Rect,
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl PendingRegion {
    /// Region body for `/add_ocr_region`; a blank name becomes `Unnamed Region`
    pub fn into_region(self, name: &str) -> Region {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_REGION_NAME
        } else {
            name
        };

        Region {
            name: name.to_string(),
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }

    /// Human readable description of the on-screen selection
    pub fn coords_label(&self) -> String {
        let d = &self.display;
        format!(
            "Coordinates: ({}, {}) to ({}, {})\nSize: {}x{} pixels",
            d.x1.round(),
            d.y1.round(),
            d.x2.round(),
            d.y2.round(),
            d.width().round(),
            d.height().round()
        )
    }
}

/// Map a rendered rectangle onto the image's natural resolution
pub fn scale_to_natural(
    rect: Rect,
    displayed: Size,
    natural: Size,
) -> Result<PendingRegion, SelectionError> {
    if displayed.width <= 0.0 || displayed.height <= 0.0 {
        return Err(SelectionError::NoScreenshot);
    }

    let scale_x = natural.width / displayed.width;
    let scale_y = natural.height / displayed.height;

    let pending = PendingRegion {
        display: rect,
        x1: (rect.x1 * scale_x).round() as i64,
        y1: (rect.y1 * scale_y).round() as i64,
        x2: (rect.x2 * scale_x).round() as i64,
        y2: (rect.y2 * scale_y).round() as i64,
    };

    // corners round independently, so a valid on-screen box can still collapse
    if pending.x2 <= pending.x1 || pending.y2 <= pending.y1 {
        return Err(SelectionError::Degenerate {
            width: pending.x2 - pending.x1,
            height: pending.y2 - pending.y1,
        });
    }

    Ok(pending)
}

/// Mouse-driven selection state
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    start: Option<Point>,
    current: Option<Point>,
}

impl DragSelection {
    pub fn begin(&mut self, point: Point) {
        self.start = Some(point);
        self.current = Some(point);
    }

    /// Move the free corner; returns the box to draw while dragging
    pub fn update(&mut self, point: Point) -> Option<Rect> {
        let start = self.start?;
        self.current = Some(point);
        Some(Rect::from_corners(start, point))
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.current = None;
    }

    /// Release the mouse. The drag always ends here, accepted or not.
    pub fn finish(&mut self, point: Point, container: Size) -> Result<Rect, SelectionError> {
        let start = self.start.take().ok_or(SelectionError::NotSelecting)?;
        self.current = None;

        if !container.contains(point) {
            return Err(SelectionError::OutsideContainer);
        }

        let rect = Rect::from_corners(start, point);
        rect.validate()?;
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(from: (f64, f64), to: (f64, f64)) -> Result<Rect, SelectionError> {
        let mut selection = DragSelection::default();
        selection.begin(Point::new(from.0, from.1));
        selection.update(Point::new(to.0, to.1));
        selection.finish(Point::new(to.0, to.1), Size::new(800.0, 600.0))
    }

    #[test]
    fn reversed_drag_is_normalized() {
        let rect = drag((120.0, 90.0), (20.0, 40.0)).unwrap();
        assert_eq!(rect, Rect { x1: 20.0, y1: 40.0, x2: 120.0, y2: 90.0 });
    }

    #[test]
    fn undersized_in_either_dimension_is_rejected() {
        for (to, expected) in [((9.0, 50.0), (9.0, 50.0)), ((50.0, 9.5), (50.0, 9.5))] {
            let err = drag((0.0, 0.0), to).unwrap_err();
            assert_eq!(
                err,
                SelectionError::TooSmall {
                    width: expected.0,
                    height: expected.1,
                    min: MIN_REGION_SIZE
                }
            );
        }
    }

    #[test]
    fn zero_sized_click_is_rejected_not_clamped() {
        let err = drag((30.0, 30.0), (30.0, 30.0)).unwrap_err();
        assert!(matches!(err, SelectionError::TooSmall { .. }));
        assert_eq!(
            err.to_string(),
            "Region is too small (0x0 pixels). Please select a region at least 10x10 pixels."
        );
    }

    #[test]
    fn exactly_minimum_is_accepted() {
        assert!(drag((0.0, 0.0), (10.0, 10.0)).is_ok());
    }

    #[test]
    fn release_outside_container_cancels() {
        let mut selection = DragSelection::default();
        selection.begin(Point::new(10.0, 10.0));
        let err = selection
            .finish(Point::new(900.0, 50.0), Size::new(800.0, 600.0))
            .unwrap_err();
        assert_eq!(err, SelectionError::OutsideContainer);
        // the drag is over; a second release has nothing to finish
        let again = selection
            .finish(Point::new(20.0, 20.0), Size::new(800.0, 600.0))
            .unwrap_err();
        assert_eq!(again, SelectionError::NotSelecting);
    }

    #[test]
    fn finish_without_begin() {
        let mut selection = DragSelection::default();
        let err = selection
            .finish(Point::new(1.0, 1.0), Size::new(10.0, 10.0))
            .unwrap_err();
        assert_eq!(err, SelectionError::NotSelecting);
    }

    #[test]
    fn scales_to_natural_resolution() {
        let rect = drag((10.0, 10.0), (50.0, 50.0)).unwrap();
        let pending =
            scale_to_natural(rect, Size::new(960.0, 540.0), Size::new(1920.0, 1080.0)).unwrap();
        assert_eq!((pending.x1, pending.y1, pending.x2, pending.y2), (20, 20, 100, 100));
    }

    #[test]
    fn enlarged_screenshot_selection_collapsing_to_nothing_is_rejected() {
        // 40x40 image shown at 1000x1000: a 10x10 box maps to (4,4)-(4,4)
        let rect = drag((100.0, 100.0), (110.0, 110.0)).unwrap();
        let err = scale_to_natural(rect, Size::new(1000.0, 1000.0), Size::new(40.0, 40.0))
            .unwrap_err();
        assert_eq!(err, SelectionError::Degenerate { width: 0, height: 0 });
        assert!(err.to_string().starts_with("Region is too small at full resolution (0x0 pixels)"));
    }

    #[test]
    fn scaling_rounds_to_nearest_pixel() {
        let rect = Rect { x1: 10.0, y1: 10.0, x2: 33.0, y2: 33.0 };
        let pending = scale_to_natural(rect, Size::new(600.0, 400.0), Size::new(1000.0, 500.0))
            .unwrap();
        // 33 * 5/3 = 55, 33 * 1.25 = 41.25
        assert_eq!((pending.x1, pending.y1, pending.x2, pending.y2), (17, 13, 55, 41));
    }

    #[test]
    fn blank_name_falls_back() {
        let rect = Rect { x1: 0.0, y1: 0.0, x2: 20.0, y2: 20.0 };
        let pending = scale_to_natural(rect, Size::new(1.0, 1.0), Size::new(1.0, 1.0)).unwrap();
        assert_eq!(pending.into_region("   ").name, DEFAULT_REGION_NAME);
    }
}

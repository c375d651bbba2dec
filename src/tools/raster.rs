//! Integer rasterizers for the two-phase tools. All functions return the
//! cell set rather than writing pixels, so the same paths feed both commits
//! and the live viewport preview.

/// Bresenham line, endpoints inclusive. Endpoints are canonicalized first
/// so a line commits to the same pixel set from either end.
pub fn line_points(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let ((x0, y0), (x1, y1)) = if (x0, y0) <= (x1, y1) {
        ((x0, y0), (x1, y1))
    } else {
        ((x1, y1), (x0, y0))
    };

    let mut points = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        points.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Axis-sorted bounding box of two corners: (left, top, right, bottom),
/// all inclusive.
pub fn sorted_box(x0: i64, y0: i64, x1: i64, y1: i64) -> (i64, i64, i64, i64) {
    (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

pub fn rect_points(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let (left, top, right, bottom) = sorted_box(x0, y0, x1, y1);
    let mut points = Vec::new();
    for y in top..=bottom {
        for x in left..=right {
            points.push((x, y));
        }
    }
    points
}

/// Filled ellipse inscribed in the sorted bounding box, rasterized with the
/// incremental midpoint algorithm and filled by horizontal spans. A box
/// under 2px on either axis has no room for curvature and degrades to the
/// rectangle.
///
/// The radii floor on even extents, so on an even-width or even-height box
/// the ellipse hugs the top-left and stops one cell short of the far edge.
pub fn ellipse_points(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let (left, top, right, bottom) = sorted_box(x0, y0, x1, y1);
    if right - left < 2 || bottom - top < 2 {
        return rect_points(left, top, right, bottom);
    }

    let rx = (right - left) / 2;
    let ry = (bottom - top) / 2;
    let cx = left + rx;
    let cy = top + ry;

    let mut points = Vec::new();
    let mut span = |x: i64, y: i64| {
        for px in (cx - x)..=(cx + x) {
            points.push((px, y));
        }
    };

    let (rx2, ry2) = (rx * rx, ry * ry);
    let mut x = 0i64;
    let mut y = ry;

    // region 1: gradient > -1
    let mut d1 = ry2 - rx2 * ry + rx2 / 4;
    let mut dx = 2 * ry2 * x;
    let mut dy = 2 * rx2 * y;
    while dx < dy {
        span(x, cy + y);
        span(x, cy - y);
        if d1 < 0 {
            x += 1;
            dx += 2 * ry2;
            d1 += dx + ry2;
        } else {
            x += 1;
            y -= 1;
            dx += 2 * ry2;
            dy -= 2 * rx2;
            d1 += dx - dy + ry2;
        }
    }

    // region 2: gradient <= -1
    let mut d2 = ry2 * (2 * x + 1) * (2 * x + 1) / 4 + rx2 * (y - 1) * (y - 1) - rx2 * ry2;
    while y >= 0 {
        span(x, cy + y);
        span(x, cy - y);
        if d2 > 0 {
            y -= 1;
            dy -= 2 * rx2;
            d2 += rx2 - dy;
        } else {
            y -= 1;
            x += 1;
            dx += 2 * ry2;
            dy -= 2 * rx2;
            d2 += dx - dy + rx2;
        }
    }

    points.sort_unstable();
    points.dedup();
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_is_endpoint_order_independent() {
        let mut a = line_points(2, 2, 5, 5);
        let mut b = line_points(5, 5, 2, 2);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);

        let mut a = line_points(0, 3, 7, 1);
        let mut b = line_points(7, 1, 0, 3);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn diagonal_line_hits_every_step() {
        assert_eq!(line_points(2, 2, 5, 5), vec![(2, 2), (3, 3), (4, 4), (5, 5)]);
    }

    #[test]
    fn horizontal_line_is_a_row() {
        assert_eq!(line_points(1, 4, 4, 4), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn rect_spans_sorted_corners() {
        let cells = rect_points(5, 5, 2, 2);
        assert_eq!(cells.len(), 16);
        assert!(cells.contains(&(2, 2)));
        assert!(cells.contains(&(5, 5)));
        assert!(!cells.contains(&(6, 5)));
    }

    #[test]
    fn tiny_ellipse_degrades_to_rect() {
        assert_eq!(ellipse_points(1, 1, 2, 5), rect_points(1, 1, 2, 5));
        assert_eq!(ellipse_points(1, 1, 5, 2), rect_points(1, 1, 5, 2));
    }

    #[test]
    fn ellipse_fills_center_and_stays_in_box() {
        let cells = ellipse_points(0, 0, 8, 6);
        assert!(cells.contains(&(4, 3)), "center is filled");
        assert!(cells.contains(&(0, 3)), "leftmost point on the midline");
        assert!(cells.contains(&(4, 0)), "topmost point on the midline");
        assert!(!cells.contains(&(0, 0)), "corners are outside the ellipse");
        for &(x, y) in &cells {
            assert!((0..=8).contains(&x) && (0..=6).contains(&y));
        }
    }

    #[test]
    fn even_box_ellipse_floors_the_radii() {
        // extent 7 on x: rx = 3, centered at x = 3, so column 7 stays empty
        let cells = ellipse_points(0, 0, 7, 6);
        assert!(cells.contains(&(0, 3)));
        assert!(cells.contains(&(6, 3)));
        assert!(!cells.iter().any(|&(x, _)| x == 7));
    }

    #[test]
    fn ellipse_is_symmetric_on_odd_boxes() {
        let cells = ellipse_points(0, 0, 8, 6);
        for &(x, y) in &cells {
            assert!(cells.contains(&(8 - x, y)), "({x},{y}) missing h-twin");
            assert!(cells.contains(&(x, 6 - y)), "({x},{y}) missing v-twin");
        }
    }
}

use super::{Canvas, Mirror, Rgb};

/// Iterative 4-connected flood fill from (x, y). Filling with the seed's
/// current color is a no-op. The explicit stack keeps large fills off the
/// call stack.
pub fn flood_fill(canvas: &mut Canvas, x: usize, y: usize, new_color: Rgb) {
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let old_color = canvas.get_pixel(x, y);
    if old_color == new_color {
        return;
    }
    fill_region(canvas, x as i64, y as i64, old_color, new_color);
}

/// Flood fill plus independent re-seeds at each mirrored seed position.
/// The mirror is applied to the seed, not propagated through the flood, so
/// a mirrored region with different topology fills to its own boundary.
pub fn flood_fill_mirrored(canvas: &mut Canvas, x: usize, y: usize, new_color: Rgb, mirror: &Mirror) {
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let old_color = canvas.get_pixel(x, y);
    if old_color == new_color {
        return;
    }
    fill_region(canvas, x as i64, y as i64, old_color, new_color);
    for (mx, my) in mirror.replicas(x, y, canvas.width(), canvas.height()) {
        fill_region(canvas, mx as i64, my as i64, old_color, new_color);
    }
}

fn fill_region(canvas: &mut Canvas, x: i64, y: i64, old_color: Rgb, new_color: Rgb) {
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        if !canvas.in_bounds(cx, cy) {
            continue;
        }
        // current != old covers both boundaries and already-painted cells,
        // so no visited set is needed
        if canvas.get_pixel(cx as usize, cy as usize) != old_color {
            continue;
        }
        canvas.set_pixel(cx as usize, cy as usize, new_color);
        stack.push((cx + 1, cy));
        stack.push((cx - 1, cy));
        stack.push((cx, cy + 1));
        stack.push((cx, cy - 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BLACK;
    use pretty_assertions::assert_eq;

    const WHITE: Rgb = (255, 255, 255);
    const GREEN: Rgb = (0, 255, 0);

    #[test]
    fn fill_covers_enclosed_region_exactly() {
        let mut canvas = Canvas::new(8, 8);
        // white box around [2,5]x[2,5]; interior stays black
        for i in 2..=5 {
            canvas.set_pixel(i, 2, WHITE);
            canvas.set_pixel(i, 5, WHITE);
            canvas.set_pixel(2, i, WHITE);
            canvas.set_pixel(5, i, WHITE);
        }
        flood_fill(&mut canvas, 3, 3, GREEN);

        let green = canvas.pixels().iter().filter(|&&p| p == GREEN).count();
        assert_eq!(green, 4, "2x2 interior repaints exactly 4 cells");
        for i in 2..=5 {
            assert_eq!(canvas.get_pixel(i, 2), WHITE);
            assert_eq!(canvas.get_pixel(2, i), WHITE);
        }
        assert_eq!(canvas.get_pixel(0, 0), BLACK, "outside the closure untouched");
    }

    #[test]
    fn fill_with_seed_color_is_a_no_op() {
        let mut canvas = Canvas::new(8, 8);
        canvas.set_pixel(1, 1, WHITE);
        let before = canvas.pixels().to_vec();
        flood_fill(&mut canvas, 4, 4, BLACK);
        assert_eq!(canvas.pixels(), &before[..]);
    }

    #[test]
    fn fill_terminates_on_open_canvas() {
        let mut canvas = Canvas::new(16, 16);
        flood_fill(&mut canvas, 0, 0, GREEN);
        assert!(canvas.pixels().iter().all(|&p| p == GREEN));
    }

    #[test]
    fn mirrored_fill_reseeds_at_reflection() {
        let mut canvas = Canvas::new(8, 8);
        // wall splitting the canvas down the middle
        for y in 0..8 {
            canvas.set_pixel(3, y, WHITE);
            canvas.set_pixel(4, y, WHITE);
        }
        let mirror = Mirror {
            horizontal: true,
            ..Mirror::default()
        };
        flood_fill_mirrored(&mut canvas, 1, 1, GREEN, &mirror);
        // both halves filled: the right half via the mirrored seed at x=6
        assert_eq!(canvas.get_pixel(0, 0), GREEN);
        assert_eq!(canvas.get_pixel(7, 7), GREEN);
        assert_eq!(canvas.get_pixel(3, 3), WHITE);
    }
}

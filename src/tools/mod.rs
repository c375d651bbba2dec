pub mod raster;

use crate::canvas::{fill, Canvas, Mirror, Rgb};

/// The seven drawing tools. Only Line/Rect/Ellipse use the anchor; only
/// Stroke uses the persistent drawing flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Point,
    Stroke,
    Bucket,
    Line,
    Rect,
    Ellipse,
    Picker,
}

pub const ALL_TOOLS: [Tool; 7] = [
    Tool::Point,
    Tool::Stroke,
    Tool::Bucket,
    Tool::Line,
    Tool::Rect,
    Tool::Ellipse,
    Tool::Picker,
];

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Point => "point",
            Tool::Stroke => "stroke",
            Tool::Bucket => "bucket",
            Tool::Line => "line",
            Tool::Rect => "rect",
            Tool::Ellipse => "ellipse",
            Tool::Picker => "picker",
        }
    }

    pub fn from_index(index: usize) -> Tool {
        ALL_TOOLS[index % ALL_TOOLS.len()]
    }

    fn position(&self) -> usize {
        ALL_TOOLS.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tool {
        ALL_TOOLS[(self.position() + 1) % ALL_TOOLS.len()]
    }

    pub fn prev(&self) -> Tool {
        ALL_TOOLS[(self.position() + ALL_TOOLS.len() - 1) % ALL_TOOLS.len()]
    }
}

/// What a commit did, surfaced so the session can route side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Canvas changed (pixel placed, shape rasterized, fill ran, stroke
    /// started).
    Mutated,
    /// Anchor armed or stroke toggled off; nothing drawn.
    Armed,
    /// Picker read this color; the engine has already switched to Point.
    Picked(Rgb),
}

/// Tool state machine: Idle (no anchor) or Armed (anchor set), per tool.
/// Switching tools always clears in-flight state without rasterizing.
pub struct ToolEngine {
    tool: Tool,
    anchor: Option<(usize, usize)>,
    stroke_active: bool,
}

impl ToolEngine {
    pub fn new() -> Self {
        Self {
            tool: Tool::Point,
            anchor: None,
            stroke_active: false,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn anchor(&self) -> Option<(usize, usize)> {
        self.anchor
    }

    pub fn stroke_active(&self) -> bool {
        self.stroke_active
    }

    pub fn select(&mut self, tool: Tool) {
        self.tool = tool;
        self.anchor = None;
        self.stroke_active = false;
    }

    pub fn cycle_next(&mut self) {
        self.select(self.tool.next());
    }

    pub fn cycle_prev(&mut self) {
        self.select(self.tool.prev());
    }

    /// True when the next commit will change the canvas. The session uses
    /// this to snapshot history before the mutation happens.
    pub fn commit_mutates(&self) -> bool {
        match self.tool {
            Tool::Point | Tool::Bucket => true,
            // toggling the stroke on paints the current cell
            Tool::Stroke => !self.stroke_active,
            Tool::Line | Tool::Rect | Tool::Ellipse => self.anchor.is_some(),
            Tool::Picker => false,
        }
    }

    pub fn commit(
        &mut self,
        canvas: &mut Canvas,
        cursor: (usize, usize),
        color: Rgb,
        mirror: &Mirror,
    ) -> Commit {
        let (cx, cy) = cursor;
        match self.tool {
            Tool::Point => {
                canvas.set_pixel_mirrored(cx, cy, color, mirror);
                Commit::Mutated
            }
            Tool::Stroke => {
                self.stroke_active = !self.stroke_active;
                if self.stroke_active {
                    canvas.set_pixel_mirrored(cx, cy, color, mirror);
                    Commit::Mutated
                } else {
                    Commit::Armed
                }
            }
            Tool::Bucket => {
                fill::flood_fill_mirrored(canvas, cx, cy, color, mirror);
                Commit::Mutated
            }
            Tool::Line => match self.anchor.take() {
                None => {
                    self.anchor = Some(cursor);
                    Commit::Armed
                }
                Some((ax, ay)) => {
                    self.paint(canvas, raster::line_points(ax as i64, ay as i64, cx as i64, cy as i64), color, mirror);
                    Commit::Mutated
                }
            },
            Tool::Rect => match self.anchor.take() {
                None => {
                    self.anchor = Some(cursor);
                    Commit::Armed
                }
                Some((ax, ay)) => {
                    self.paint(canvas, raster::rect_points(ax as i64, ay as i64, cx as i64, cy as i64), color, mirror);
                    Commit::Mutated
                }
            },
            Tool::Ellipse => match self.anchor.take() {
                None => {
                    self.anchor = Some(cursor);
                    Commit::Armed
                }
                Some((ax, ay)) => {
                    self.paint(canvas, raster::ellipse_points(ax as i64, ay as i64, cx as i64, cy as i64), color, mirror);
                    Commit::Mutated
                }
            },
            Tool::Picker => {
                let picked = canvas.get_pixel(cx, cy);
                self.select(Tool::Point);
                Commit::Picked(picked)
            }
        }
    }

    /// Stroke painting on cursor movement. Returns true when a pixel was
    /// placed.
    pub fn stroke_step(
        &self,
        canvas: &mut Canvas,
        cursor: (usize, usize),
        color: Rgb,
        mirror: &Mirror,
    ) -> bool {
        if self.tool == Tool::Stroke && self.stroke_active {
            canvas.set_pixel_mirrored(cursor.0, cursor.1, color, mirror);
            true
        } else {
            false
        }
    }

    fn paint(&self, canvas: &mut Canvas, points: Vec<(i64, i64)>, color: Rgb, mirror: &Mirror) {
        for (x, y) in points {
            if canvas.in_bounds(x, y) {
                canvas.set_pixel_mirrored(x as usize, y as usize, color, mirror);
            }
        }
    }
}

impl Default for ToolEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BLACK;
    use pretty_assertions::assert_eq;

    const WHITE: Rgb = (255, 255, 255);
    const NO_MIRROR: Mirror = Mirror {
        horizontal: false,
        vertical: false,
        offset_x: 0,
        offset_y: 0,
    };

    #[test]
    fn point_paints_one_pixel_immediately() {
        let mut canvas = Canvas::new(4, 4);
        let mut engine = ToolEngine::new();
        assert_eq!(engine.commit(&mut canvas, (1, 1), WHITE, &NO_MIRROR), Commit::Mutated);
        assert_eq!(canvas.get_pixel(1, 1), WHITE);
        let untouched = canvas.pixels().iter().filter(|&&p| p == BLACK).count();
        assert_eq!(untouched, 15);
    }

    #[test]
    fn rect_commits_on_second_action_only() {
        let mut canvas = Canvas::new(8, 8);
        let mut engine = ToolEngine::new();
        engine.select(Tool::Rect);

        assert_eq!(engine.commit(&mut canvas, (1, 1), WHITE, &NO_MIRROR), Commit::Armed);
        assert!(canvas.pixels().iter().all(|&p| p == BLACK));
        assert_eq!(engine.anchor(), Some((1, 1)));

        assert_eq!(engine.commit(&mut canvas, (3, 3), WHITE, &NO_MIRROR), Commit::Mutated);
        assert_eq!(engine.anchor(), None);
        let painted = canvas.pixels().iter().filter(|&&p| p == WHITE).count();
        assert_eq!(painted, 9);
        for y in 1..=3 {
            for x in 1..=3 {
                assert_eq!(canvas.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn rect_corners_commute() {
        let run = |a: (usize, usize), b: (usize, usize)| {
            let mut canvas = Canvas::new(8, 8);
            let mut engine = ToolEngine::new();
            engine.select(Tool::Rect);
            engine.commit(&mut canvas, a, WHITE, &NO_MIRROR);
            engine.commit(&mut canvas, b, WHITE, &NO_MIRROR);
            canvas.pixels().to_vec()
        };
        assert_eq!(run((2, 2), (5, 5)), run((5, 5), (2, 2)));
    }

    #[test]
    fn line_endpoints_commute() {
        let run = |a: (usize, usize), b: (usize, usize)| {
            let mut canvas = Canvas::new(8, 8);
            let mut engine = ToolEngine::new();
            engine.select(Tool::Line);
            engine.commit(&mut canvas, a, WHITE, &NO_MIRROR);
            engine.commit(&mut canvas, b, WHITE, &NO_MIRROR);
            canvas.pixels().to_vec()
        };
        assert_eq!(run((2, 2), (5, 5)), run((5, 5), (2, 2)));
        assert_eq!(run((0, 3), (7, 1)), run((7, 1), (0, 3)));
    }

    #[test]
    fn switching_tools_discards_the_anchor() {
        let mut canvas = Canvas::new(8, 8);
        let mut engine = ToolEngine::new();
        engine.select(Tool::Line);
        engine.commit(&mut canvas, (1, 1), WHITE, &NO_MIRROR);
        engine.select(Tool::Rect);
        assert_eq!(engine.anchor(), None);
        assert!(canvas.pixels().iter().all(|&p| p == BLACK), "nothing rasterized");
    }

    #[test]
    fn stroke_toggles_and_paints_on_moves() {
        let mut canvas = Canvas::new(8, 8);
        let mut engine = ToolEngine::new();
        engine.select(Tool::Stroke);

        assert!(engine.commit_mutates());
        assert_eq!(engine.commit(&mut canvas, (2, 2), WHITE, &NO_MIRROR), Commit::Mutated);
        assert!(engine.stroke_active());
        assert!(engine.stroke_step(&mut canvas, (3, 2), WHITE, &NO_MIRROR));
        assert_eq!(canvas.get_pixel(3, 2), WHITE);

        assert_eq!(engine.commit(&mut canvas, (3, 2), WHITE, &NO_MIRROR), Commit::Armed);
        assert!(!engine.stroke_active());
        assert!(!engine.stroke_step(&mut canvas, (4, 2), WHITE, &NO_MIRROR));
        assert_eq!(canvas.get_pixel(4, 2), BLACK);
    }

    #[test]
    fn tiny_ellipse_behaves_like_rect() {
        let mut canvas = Canvas::new(8, 8);
        let mut engine = ToolEngine::new();
        engine.select(Tool::Ellipse);
        engine.commit(&mut canvas, (1, 1), WHITE, &NO_MIRROR);
        engine.commit(&mut canvas, (2, 4), WHITE, &NO_MIRROR);
        for y in 1..=4 {
            for x in 1..=2 {
                assert_eq!(canvas.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn picker_reads_pixel_and_switches_to_point() {
        let mut canvas = Canvas::new(8, 8);
        canvas.set_pixel(5, 5, (10, 20, 30));
        let mut engine = ToolEngine::new();
        engine.select(Tool::Picker);
        assert!(!engine.commit_mutates());
        let result = engine.commit(&mut canvas, (5, 5), WHITE, &NO_MIRROR);
        assert_eq!(result, Commit::Picked((10, 20, 30)));
        assert_eq!(engine.tool(), Tool::Point);
    }

    #[test]
    fn tool_cycling_wraps_both_directions() {
        let mut engine = ToolEngine::new();
        engine.cycle_prev();
        assert_eq!(engine.tool(), Tool::Picker);
        engine.cycle_next();
        assert_eq!(engine.tool(), Tool::Point);
    }
}

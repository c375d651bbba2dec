use crate::canvas::{Canvas, Mirror, Rgb};
use crate::history::History;
use crate::palette::{Palette, MAX_COLORS};
use crate::tools::{Commit, Tool, ToolEngine};

/// The logical, backend-independent command surface. The front-end resolves
/// keys to these; one command drives exactly one update-then-render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Toggle/commit the active tool at the cursor.
    Commit,
    Undo,
    NextColor,
    PrevColor,
    NextTool,
    PrevTool,
    SelectTool(usize),
    ToggleMirrorH,
    ToggleMirrorV,
    ShiftMirrorX(i32),
    ShiftMirrorY(i32),
    /// Replace the current palette entry (resolved from the recolor prompt).
    Recolor(Rgb),
    ExportPalette,
    /// Confirmed by the front-end before it reaches the core.
    Reset,
    QuitSave,
    QuitConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Exit; `save` tells the front-end whether the canvas should be
    /// written first (QuitConfirm prompts before saving).
    Quit { save: bool, confirm: bool },
}

/// Persistence the front-end must perform after a cycle. The core never
/// touches the disk for canvas data itself, so a failed or interrupted save
/// cannot corrupt in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistRequest {
    /// Auto-save checkpoint taken before a mutating commit.
    Checkpoint,
    /// Write the palette out as a hex file.
    Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub control: Control,
    pub persist: Option<PersistRequest>,
}

impl Outcome {
    fn proceed() -> Self {
        Self {
            control: Control::Continue,
            persist: None,
        }
    }

    fn with_persist(persist: PersistRequest) -> Self {
        Self {
            control: Control::Continue,
            persist: Some(persist),
        }
    }
}

/// All mutable editor state for one run: canvas, palette, cursor, mirror,
/// tool engine, and undo history. Passed explicitly into every command
/// handler; there are no process-wide singletons.
pub struct Session {
    pub canvas: Canvas,
    pub palette: Palette,
    pub engine: ToolEngine,
    history: History,
    cursor_x: usize,
    cursor_y: usize,
    mirror: Mirror,
    color_index: usize,
}

impl Session {
    pub fn new(width: usize, height: usize, palette: Palette) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            palette,
            engine: ToolEngine::new(),
            history: History::new(),
            cursor_x: width / 2,
            cursor_y: height / 2,
            mirror: Mirror::default(),
            // white, the first drawable entry
            color_index: 1,
        }
    }

    /// Adopts a decoded image: the canvas takes its size and its most
    /// frequent unseen colors are merged into the palette.
    pub fn load_pixels(&mut self, width: usize, height: usize, pixels: Vec<Rgb>) {
        self.palette.extend_from_histogram(&pixels, MAX_COLORS);
        self.canvas.resize_from_image(width, height, pixels);
        self.cursor_x = width / 2;
        self.cursor_y = height / 2;
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn current_color(&self) -> Rgb {
        self.palette.get(self.color_index)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::MoveUp => self.move_cursor(0, -1),
            Command::MoveDown => self.move_cursor(0, 1),
            Command::MoveLeft => self.move_cursor(-1, 0),
            Command::MoveRight => self.move_cursor(1, 0),
            Command::Commit => self.commit(),
            Command::Undo => {
                if let Some(snapshot) = self.history.pop() {
                    self.canvas = snapshot;
                }
                Outcome::proceed()
            }
            Command::NextColor => {
                self.color_index = (self.color_index + 1) % self.palette.len();
                Outcome::proceed()
            }
            Command::PrevColor => {
                let len = self.palette.len();
                self.color_index = (self.color_index + len - 1) % len;
                Outcome::proceed()
            }
            Command::NextTool => {
                self.engine.cycle_next();
                Outcome::proceed()
            }
            Command::PrevTool => {
                self.engine.cycle_prev();
                Outcome::proceed()
            }
            Command::SelectTool(index) => {
                self.engine.select(Tool::from_index(index));
                Outcome::proceed()
            }
            Command::ToggleMirrorH => {
                self.mirror.horizontal = !self.mirror.horizontal;
                Outcome::proceed()
            }
            Command::ToggleMirrorV => {
                self.mirror.vertical = !self.mirror.vertical;
                Outcome::proceed()
            }
            Command::ShiftMirrorX(delta) => {
                self.mirror.offset_x += delta;
                Outcome::proceed()
            }
            Command::ShiftMirrorY(delta) => {
                self.mirror.offset_y += delta;
                Outcome::proceed()
            }
            Command::Recolor(rgb) => {
                self.palette.replace(self.color_index, rgb);
                Outcome::proceed()
            }
            Command::ExportPalette => Outcome::with_persist(PersistRequest::Palette),
            Command::Reset => {
                self.history.push(self.canvas.clone());
                self.canvas.clear();
                Outcome::with_persist(PersistRequest::Checkpoint)
            }
            Command::QuitSave => Outcome {
                control: Control::Quit {
                    save: true,
                    confirm: false,
                },
                persist: None,
            },
            Command::QuitConfirm => Outcome {
                control: Control::Quit {
                    save: true,
                    confirm: true,
                },
                persist: None,
            },
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) -> Outcome {
        let w = self.canvas.width() as i32;
        let h = self.canvas.height() as i32;
        self.cursor_x = ((self.cursor_x as i32 + dx).rem_euclid(w)) as usize;
        self.cursor_y = ((self.cursor_y as i32 + dy).rem_euclid(h)) as usize;

        let color = self.current_color();
        self.engine
            .stroke_step(&mut self.canvas, (self.cursor_x, self.cursor_y), color, &self.mirror);
        Outcome::proceed()
    }

    fn commit(&mut self) -> Outcome {
        let mutates = self.engine.commit_mutates();
        if mutates {
            self.history.push(self.canvas.clone());
        }

        let color = self.current_color();
        let result = self.engine.commit(
            &mut self.canvas,
            (self.cursor_x, self.cursor_y),
            color,
            &self.mirror,
        );

        if let Commit::Picked(rgb) = result {
            self.color_index = self.palette.nearest_index(rgb, crate::palette::MATCH_THRESHOLD);
        }

        if mutates {
            Outcome::with_persist(PersistRequest::Checkpoint)
        } else {
            Outcome::proceed()
        }
    }
}

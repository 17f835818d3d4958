use blockhop::{Art, Block, Config, Editor, Level, Point, Tool};
use blockhop_engine::{Assets, InputEvent, InputState, Key, MouseButton, Mx};
use glam::DVec2;
use tempfile::TempDir;

const EPS: f64 = 1e-9;

struct Session {
    dir: TempDir,
    editor: Editor,
    assets: Assets,
    input: InputState,
}

impl Session {
    fn with_level(level: Level) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            autosave_path: dir.path().join("autosave.lvl"),
            quick_save_path: dir.path().join("created.lvl"),
            ..Config::default()
        };
        let assets = Assets::silent(dir.path());
        Self {
            editor: Editor::new(level, &config),
            dir,
            assets,
            input: InputState::new(),
        }
    }

    fn frame(&mut self) {
        let frame = self.input.snapshot();
        self.editor.update(&frame, &mut self.assets);
    }

    fn tap(&mut self, key: Key) {
        self.input.handle(&InputEvent::KeyDown { key });
        self.frame();
        self.input.handle(&InputEvent::KeyUp { key });
    }

    fn type_line(&mut self, text: &str) {
        for ch in text.chars() {
            self.input.handle(&InputEvent::KeyDown { key: Key::char(ch) });
            self.input.handle(&InputEvent::Text { ch });
            self.frame();
            self.input.handle(&InputEvent::KeyUp { key: Key::char(ch) });
        }
    }

    fn point_at_world(&mut self, x: f64, y: f64) {
        let s = self.editor.camera.world_to_screen(DVec2::new(x, y));
        self.input.handle(&InputEvent::PointerMove { x: s.x, y: s.y });
    }

    fn point_at_screen(&mut self, p: DVec2) {
        self.input.handle(&InputEvent::PointerMove { x: p.x, y: p.y });
    }

    fn button(&mut self, down: bool) {
        let button = MouseButton::Left;
        let event = if down {
            InputEvent::PointerDown { button }
        } else {
            InputEvent::PointerUp { button }
        };
        self.input.handle(&event);
    }
}

fn write_png(dir: &std::path::Path, name: &str) {
    image::RgbaImage::from_pixel(8, 4, image::Rgba([40, 200, 40, 255]))
        .save(dir.join(name))
        .unwrap();
}

#[test]
fn drag_creates_block_from_corner_to_corner() {
    let mut s = Session::with_level(Level::default());
    s.tap(Key::char('l'));
    assert!(matches!(s.editor.tool(), Tool::Platform(_)));

    s.point_at_world(0.0, 0.0);
    s.button(true);
    s.frame();
    s.point_at_world(4.0, 2.0);
    s.frame();
    s.button(false);
    s.frame();

    assert_eq!(s.editor.level.blocks.len(), 1);
    let g = s.editor.level.blocks[0].transform.geometry();
    assert!((g.center - DVec2::new(2.0, 1.0)).length() < EPS);
    assert!((g.half_width - 2.0).abs() < EPS);
    assert!((g.half_height - 1.0).abs() < EPS);
    assert!(g.angle.abs() < EPS);
}

#[test]
fn save_and_load_keeps_blocks_and_art() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "grass.png");
    let mut assets = Assets::silent(dir.path());

    let mut art_transform = Mx::from_rect(DVec2::new(1.0, 2.0), DVec2::new(3.0, 1.5));
    art_transform.rotate(0.3);
    let level = Level {
        spawn: Point { x: -2.0, y: 4.0 },
        blocks: vec![Block::new(Mx::from_rect(DVec2::new(0.1, -0.7), DVec2::new(7.0, 0.5)))],
        art: vec![Art {
            transform: art_transform,
            path: "grass.png".into(),
            image: None,
        }],
        ..Level::default()
    };
    let path = dir.path().join("round.lvl");
    level.save(&path).unwrap();

    let loaded = Level::load(&path, &mut assets).unwrap();
    assert_eq!(loaded.spawn, level.spawn);
    assert_eq!(loaded.blocks.len(), 1);
    assert_eq!(loaded.art.len(), 1);
    for (a, b) in loaded.blocks[0]
        .transform
        .elements()
        .iter()
        .zip(level.blocks[0].transform.elements())
    {
        assert!((a - b).abs() < EPS);
    }
    for (a, b) in loaded.art[0].transform.elements().iter().zip(art_transform.elements()) {
        assert!((a - b).abs() < EPS);
    }
    let image = loaded.art[0].image.expect("art image resolved on load");
    assert_eq!((image.width, image.height), (8, 4));
}

#[test]
fn corrupt_load_leaves_level_and_reports() {
    let mut s = Session::with_level(Level::starter());
    let bad = s.dir.path().join("broken.lvl");
    std::fs::write(&bad, "{\"spawn\": {\"x\": 1.0, \"y\": ").unwrap();
    let before = s.editor.level.to_json().unwrap();

    s.tap(Key::char('o'));
    s.tap(Key::Enter);
    s.type_line(bad.to_str().unwrap());
    s.tap(Key::Enter);

    assert!(s.editor.status().starts_with("Load failed"));
    assert!(s.editor.status().contains("broken.lvl"));
    assert_eq!(s.editor.level.to_json().unwrap(), before);
    // Typing the path did not trigger any tool key.
    assert_eq!(s.editor.tool().name(), "Open");
}

#[test]
fn select_and_drag_moves_by_camera_ratio() {
    let mut level = Level::default();
    level.spawn = Point { x: -6.0, y: 5.0 };
    level.blocks.push(Block::new(Mx::from_rect(DVec2::ZERO, DVec2::new(2.0, 2.0))));
    let mut s = Session::with_level(level);
    assert!((s.editor.camera.half_width - 12.0).abs() < EPS);
    s.tap(Key::char('t'));

    s.point_at_world(0.0, 0.0);
    let start = s.editor.camera.world_to_screen(DVec2::ZERO);
    s.button(true);
    s.frame();
    s.point_at_screen(start + DVec2::new(10.0, 0.0));
    s.frame();
    s.button(false);
    s.frame();

    let c = s.editor.level.blocks[0].transform.translation();
    assert!((c.x - 2.0 * 12.0 * 10.0 / 720.0).abs() < EPS);
    assert!(c.y.abs() < EPS);
}

#[test]
fn empty_submit_runs_no_command() {
    let mut s = Session::with_level(Level::starter());
    s.tap(Key::char('a'));
    s.tap(Key::Enter);
    s.type_line("   ");
    s.tap(Key::Enter);
    assert_eq!(s.editor.status(), "");
    assert!(s.editor.level.art.is_empty());
    assert!(matches!(s.editor.tool(), Tool::Art(t) if !t.is_typing()));
}

#[test]
fn typed_art_path_adds_art() {
    let mut s = Session::with_level(Level::starter());
    write_png(s.dir.path(), "grass.png");
    s.tap(Key::char('a'));
    s.tap(Key::Enter);
    s.type_line("grass.png");
    s.tap(Key::Enter);
    assert_eq!(s.editor.status(), "Added grass.png");
    assert_eq!(s.editor.level.art.len(), 1);
    assert!(s.editor.level.art[0].image.is_some());
}

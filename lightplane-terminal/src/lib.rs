/// Terminal control panel and ASCII preview for the light projection pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use lightplane_core::{Pipeline, PreviewSurface, Scene, SceneUpdate};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod preview;

pub use preview::AsciiPreview;

/// Rows reserved for the title and status lines
pub const STATUS_ROWS: u16 = 4;

const SCALE_STEP: f32 = 2.0;
const ROTATE_STEP: f32 = 0.1;
const LIGHT_STEP: f32 = 5.0;

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    SelectNext,
    TogglePolicy,
    Zoom(f32),
    Update(SceneUpdate),
}

/// Map a key to an action against the current scene and selected mesh
pub fn action_for_key(code: KeyCode, scene: &Scene, selected: usize) -> Option<Action> {
    let light = &scene.light;
    let mesh = scene.mesh(selected);

    let scale_by = |dx: f32, dy: f32, dz: f32| {
        mesh.map(|m| {
            Action::Update(SceneUpdate::MeshScale {
                mesh: selected,
                scale: m.scale + Vector3::new(dx, dy, dz),
            })
        })
    };
    let rotate_by = |dy: f32| {
        mesh.map(|m| {
            let mut rotation = m.rotation;
            rotation.rotate(0.0, dy, 0.0);
            Action::Update(SceneUpdate::MeshRotation {
                mesh: selected,
                rotation,
            })
        })
    };
    let move_light = |d: Vector3<f32>| Some(Action::Update(SceneUpdate::LightPosition(light.position + d)));
    let move_target = |d: Vector3<f32>| Some(Action::Update(SceneUpdate::LightTarget(light.target + d)));

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::SelectNext),
        KeyCode::Char('p') => Some(Action::TogglePolicy),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Zoom(0.8)),
        KeyCode::Char('-') => Some(Action::Zoom(1.25)),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            scene.mesh(index).map(|m| {
                Action::Update(SceneUpdate::Contribution {
                    mesh: index,
                    contributes: !m.contributes,
                })
            })
        }
        KeyCode::Char('x') => scale_by(-SCALE_STEP, 0.0, 0.0),
        KeyCode::Char('X') => scale_by(SCALE_STEP, 0.0, 0.0),
        KeyCode::Char('y') => scale_by(0.0, -SCALE_STEP, 0.0),
        KeyCode::Char('Y') => scale_by(0.0, SCALE_STEP, 0.0),
        KeyCode::Char('z') => scale_by(0.0, 0.0, -SCALE_STEP),
        KeyCode::Char('Z') => scale_by(0.0, 0.0, SCALE_STEP),
        KeyCode::Char('r') => rotate_by(ROTATE_STEP),
        KeyCode::Char('R') => rotate_by(-ROTATE_STEP),
        KeyCode::Left => move_light(Vector3::new(-LIGHT_STEP, 0.0, 0.0)),
        KeyCode::Right => move_light(Vector3::new(LIGHT_STEP, 0.0, 0.0)),
        KeyCode::Up => move_light(Vector3::new(0.0, 0.0, -LIGHT_STEP)),
        KeyCode::Down => move_light(Vector3::new(0.0, 0.0, LIGHT_STEP)),
        KeyCode::PageUp => move_light(Vector3::new(0.0, LIGHT_STEP, 0.0)),
        KeyCode::PageDown => move_light(Vector3::new(0.0, -LIGHT_STEP, 0.0)),
        KeyCode::Char('j') => move_target(Vector3::new(-LIGHT_STEP, 0.0, 0.0)),
        KeyCode::Char('l') => move_target(Vector3::new(LIGHT_STEP, 0.0, 0.0)),
        KeyCode::Char('i') => move_target(Vector3::new(0.0, 0.0, -LIGHT_STEP)),
        KeyCode::Char('k') => move_target(Vector3::new(0.0, 0.0, LIGHT_STEP)),
        KeyCode::Char('u') => move_target(Vector3::new(0.0, LIGHT_STEP, 0.0)),
        KeyCode::Char('o') => move_target(Vector3::new(0.0, -LIGHT_STEP, 0.0)),
        _ => None,
    }
}

/// Main application struct for the terminal preview
pub struct TerminalApp {
    pipeline: Pipeline,
    preview: AsciiPreview,
    selected: usize,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(pipeline: Pipeline) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            pipeline,
            preview: AsciiPreview::new(width as usize, height.saturating_sub(STATUS_ROWS) as usize),
            selected: 0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// React to one terminal event; scene changes re-run the pipeline immediately
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(action) = action_for_key(code, self.pipeline.scene(), self.selected) {
                    self.perform(action);
                }
            }
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.preview
                    .resize(width as usize, height.saturating_sub(STATUS_ROWS) as usize);
            }
            _ => {}
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SelectNext => {
                let count = self.pipeline.scene().meshes.len().max(1);
                self.selected = (self.selected + 1) % count;
            }
            Action::TogglePolicy => {
                let policy = self.pipeline.policy().toggled();
                info!(policy = policy.name(), "fit policy changed");
                self.pipeline.set_policy(policy);
            }
            Action::Zoom(factor) => self.preview.zoom(factor),
            Action::Update(update) => {
                self.pipeline.dispatch(update);
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let pass = self.pipeline.last_pass();
        self.preview.render_spans(&pass.result.points, &pass.result.spans);
        if let Some(extents) = &pass.extents {
            self.preview.overlay_extents(extents);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.preview.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Lightplane | FPS: {:.1} | Tab=Select 1-9=Toggle xyz/XYZ=Scale r/R=Rotate Arrows/PgUp/PgDn=Light ijkluo=Target p=Policy +/-=Zoom q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        for (i, line) in self.status_lines().into_iter().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, self.preview.height() as u16 + 1 + i as u16),
                terminal::Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    /// Selected mesh, light placement and the latest fit
    pub fn status_lines(&self) -> Vec<String> {
        let scene = self.pipeline.scene();
        let pass = self.pipeline.last_pass();

        let mesh_line = match scene.mesh(self.selected) {
            Some(m) => format!(
                "[{}/{}] {} scale ({:.1}, {:.1}, {:.1}) rot {:.2} {}",
                self.selected + 1,
                scene.meshes.len(),
                m.name,
                m.scale.x,
                m.scale.y,
                m.scale.z,
                m.rotation.y,
                if m.contributes { "on" } else { "off" }
            ),
            None => "no meshes".to_string(),
        };

        let p = scene.light.position;
        let t = scene.light.target;
        let light_line = format!(
            "light ({:.0}, {:.0}, {:.0}) -> target ({:.0}, {:.0}, {:.1})  view {:.2} u/col",
            p.x,
            p.y,
            p.z,
            t.x,
            t.y,
            t.z,
            self.preview.units_per_cell()
        );

        let e = scene.light.shadow.extents;
        let fit_line = match &pass.skipped {
            Some(reason) => format!("{} fit skipped: {reason}", self.pipeline.policy().name()),
            None => format!(
                "{} fit  L {:.1}  R {:.1}  T {:.1}  B {:.1}  ({} points)",
                self.pipeline.policy().name(),
                e.left,
                e.right,
                e.top,
                e.bottom,
                pass.result.points.len()
            ),
        };

        vec![mesh_line, light_line, fit_line]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use lightplane_core::FitPolicy;
    use nalgebra::Point3;

    #[test]
    fn test_quit_keys() {
        let scene = Scene::default();
        assert_eq!(action_for_key(KeyCode::Char('q'), &scene, 0), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::Esc, &scene, 0), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::F(5), &scene, 0), None);
    }

    #[test]
    fn test_toggle_contribution() {
        let scene = Scene::default();
        assert_eq!(
            action_for_key(KeyCode::Char('2'), &scene, 0),
            Some(Action::Update(SceneUpdate::Contribution {
                mesh: 1,
                contributes: false
            }))
        );
        assert_eq!(action_for_key(KeyCode::Char('7'), &scene, 0), None);
    }

    #[test]
    fn test_scale_selected_mesh() {
        let scene = Scene::default();
        let Some(Action::Update(SceneUpdate::MeshScale { mesh, scale })) =
            action_for_key(KeyCode::Char('Y'), &scene, 2)
        else {
            panic!("expected a scale update");
        };
        assert_eq!(mesh, 2);
        assert_eq!(scale, Vector3::new(15.0, 17.0, 15.0));
    }

    #[test]
    fn test_light_keys_move_from_current_position() {
        let scene = Scene::default();
        assert_eq!(
            action_for_key(KeyCode::Left, &scene, 0),
            Some(Action::Update(SceneUpdate::LightPosition(Point3::new(95.0, 0.0, 0.0))))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('u'), &scene, 0),
            Some(Action::Update(SceneUpdate::LightTarget(Point3::new(0.0, 5.0, 0.0))))
        );
    }

    #[test]
    fn test_status_reports_skipped_pass() {
        let mut pipeline = Pipeline::new(Scene::default(), FitPolicy::Tight);
        for mesh in 0..3 {
            pipeline.dispatch(SceneUpdate::Contribution {
                mesh,
                contributes: false,
            });
        }
        let app = TerminalApp {
            pipeline,
            preview: AsciiPreview::new(20, 10),
            selected: 0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        let lines = app.status_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("box"));
        assert!(lines[0].ends_with("off"));
        assert!(lines[2].contains("skipped"));
    }

    #[test]
    fn test_status_tracks_zoom() {
        let mut app = TerminalApp {
            pipeline: Pipeline::default(),
            preview: AsciiPreview::new(20, 10),
            selected: 0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        assert!(app.status_lines()[1].ends_with("view 4.00 u/col"));

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('-'), KeyModifiers::NONE)));
        assert!(app.status_lines()[1].ends_with("view 5.00 u/col"));
    }
}

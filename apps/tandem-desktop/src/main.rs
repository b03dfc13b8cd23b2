use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use glam::{Quat, Vec3};
use tandem_app::{App, CancelToken, FrameError};
use tandem_common::Color;
use tandem_config::{Vector, WorldSettings};
use tandem_input::{Action, FlyControls};
use tandem_render::DebugTextRenderer;
use tandem_scene::{BoxParams, Light, LightKind, Node, RingParams};
use tandem_shapes::{Cuboid, CuboidDesc, Ring, RingDesc};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tandem-desktop", about = "Tandem desktop host")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Host state around the app: window, held keys and the loop clock.
struct Host {
    app: App<DebugTextRenderer>,
    token: CancelToken,
    window: Option<Arc<Window>>,
    keys_held: HashSet<KeyCode>,
    mouse_captured: bool,
    started: Instant,
}

impl Host {
    fn new(settings: WorldSettings) -> Result<Self> {
        let mut app = App::with_rapier(settings, Some(DebugTextRenderer::new()));
        build_demo_scene(&mut app)?;
        app.camera_mut().position = Vec3::new(0.0, 6.0, 18.0);
        app.camera_mut().target = Vec3::ZERO;
        let controls = FlyControls::looking_along(app.camera());
        app.attach_controls(controls);
        let token = app.cancel_token();
        Ok(Self {
            app,
            token,
            window: None,
            keys_held: HashSet::new(),
            mouse_captured: false,
            started: Instant::now(),
        })
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }

        let held = |k: KeyCode| if self.keys_held.contains(&k) { 1.0 } else { 0.0 };
        let direction = Vec3::new(
            held(KeyCode::KeyD) - held(KeyCode::KeyA),
            held(KeyCode::Space) - held(KeyCode::ControlLeft),
            held(KeyCode::KeyW) - held(KeyCode::KeyS),
        );
        let boost = self.keys_held.contains(&KeyCode::ShiftLeft);
        self.app.handle_action(Action::Move(direction));
        self.app.handle_action(Action::Boost(boost));

        if pressed && key == KeyCode::Escape {
            self.token.cancel();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        match self.app.tick(self.started.elapsed()) {
            Ok(report) => {
                if let (Some(window), Some(stats)) = (&self.window, report.stats) {
                    window.set_title(&format!("Tandem | {stats}"));
                }
                if let Some(screen) = self.app.screen() {
                    tracing::trace!("{screen}");
                }
            }
            Err(FrameError::Stopped) => {
                event_loop.exit();
                return;
            }
            Err(e) => {
                tracing::error!("tick failed: {e}");
                event_loop.exit();
                return;
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn build_demo_scene(app: &mut App<DebugTextRenderer>) -> Result<()> {
    app.add(Cuboid::new(CuboidDesc {
        geometry: BoxParams {
            width: 30.0,
            height: 1.0,
            depth: 30.0,
        },
        mass: 0.0,
        ..CuboidDesc::default()
    })?)?;
    for i in 0..5 {
        app.add(Cuboid::new(CuboidDesc {
            position: Vec3::new(i as f32 * 1.5 - 3.0, 4.0 + i as f32 * 2.0, 0.0),
            ..CuboidDesc::default()
        })?)?;
    }

    let mut ring = Ring::new(RingDesc {
        geometry: RingParams {
            inner_radius: 6.0,
            outer_radius: 8.0,
            theta_segments: 32,
            ..RingParams::default()
        },
        ..RingDesc::default()
    })?;
    ring.set_position(Vec3::new(0.0, 0.6, 0.0));
    ring.set_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2));
    app.add(ring)?;

    app.add_node(Node::light(
        "sun",
        Light {
            kind: LightKind::Directional,
            color: Color::WHITE,
            intensity: 1.0,
        },
    ));
    Ok(())
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let (width, height) = self.app.display_size();
        let attrs = Window::default_attributes()
            .with_title("Tandem")
            .with_inner_size(PhysicalSize::new(width, height));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                window.request_redraw();
                self.window = Some(window);
                tracing::info!(width, height, "window created");
            }
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.token.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.app.resize(size.width.max(1), size.height.max(1));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                self.handle_key(key, state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => {
                self.mouse_captured = state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.mouse_captured);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.mouse_captured {
                self.app.handle_action(Action::Look {
                    dx: dx as f32,
                    dy: dy as f32,
                });
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let settings = match cli.config {
        Some(path) => WorldSettings::load(path)?,
        None => WorldSettings {
            gravity: Vector::new(0.0, -9.8, 0.0),
            autoresize: true,
            stats: tandem_config::StatsSetting::Mode("fps".into()),
            ..WorldSettings::default()
        },
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut host = Host::new(settings)?;
    event_loop.run_app(&mut host)?;
    tracing::info!(ticks = host.app.ticks(), "desktop host exited");
    Ok(())
}

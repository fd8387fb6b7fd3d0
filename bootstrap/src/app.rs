use glutin::config::{Config as GlConfig, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::BufWriter;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_kit::renderer::{GlRenderer, RenderOptions};

/// Per-sample window and context configuration. Defaults mirror the
/// plain clear-only sample: a 640x480 window titled "OpenGL Samples"
/// with a 4.4 core context and the full 3D state block enabled.
pub struct Config {
    pub title: String,
    pub size: (u32, u32),
    pub resizable: bool,
    pub gl_version: (u8, u8),
    pub options: RenderOptions,
    /// Close on its own after this many drawn frames.
    pub frame_limit: Option<u64>,
    /// Capture the last frame here when the frame limit is reached.
    pub screenshot: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "OpenGL Samples".to_owned(),
            size: (640, 480),
            resizable: true,
            gl_version: (4, 4),
            options: RenderOptions::default(),
            frame_limit: None,
            screenshot: None,
        }
    }
}

/// What a draw callback gets to work with each frame.
pub struct Frame<'a> {
    pub renderer: &'a mut GlRenderer,
    /// Current framebuffer size in pixels.
    pub size: (u32, u32),
    /// Seconds since the render loop started.
    pub elapsed: f32,
}

/// Owns the window, the GL context and the render loop. Created once per
/// sample; the context is current from `new` on, so GL resources can be
/// built right after.
pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: GlRenderer,
    size: (u32, u32),
    frame_limit: Option<u64>,
    screenshot: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(config.size.0, config.size.1)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_resizable(config.resizable)
            .with_title(config.title.as_str());
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| configs.next().unwrap())
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let (major, minor) = config.gl_version;
        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| {
            gl_display
                .get_proc_address(CString::new(s).unwrap().as_c_str())
                .cast()
        });

        log::info!(
            "OpenGL {} on {}",
            gl_string(gl::VERSION),
            gl_string(gl::RENDERER)
        );

        let renderer = GlRenderer::new();

        // viewport from the framebuffer, not the window; they differ on
        // high-density displays
        let size = gl_window.window.inner_size();
        renderer.resize(size.width, size.height);
        renderer.apply_options(&config.options);

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            renderer,
            size: (size.width, size.height),
            frame_limit: config.frame_limit,
            screenshot: config.screenshot,
        })
    }

    /// Runs the event loop until the window closes, by request or by the
    /// configured frame limit. Backspace closes the window.
    pub fn run(mut self, mut draw: impl FnMut(&mut Frame) + 'static) -> ! {
        let started = Instant::now();
        let mut frames_drawn: u64 = 0;

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                *control_flow = ControlFlow::Wait;
                match event {
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::Resized(size) => {
                            if size.width != 0 && size.height != 0 {
                                self.gl_window.surface.resize(
                                    &self.gl_context,
                                    NonZeroU32::new(size.width).unwrap(),
                                    NonZeroU32::new(size.height).unwrap(),
                                );
                                self.renderer.resize(size.width, size.height);
                                self.size = (size.width, size.height);
                                log::debug!(
                                    "framebuffer resized to {}x{}",
                                    size.width,
                                    size.height
                                );
                            }
                        }
                        WindowEvent::KeyboardInput { input, .. } => {
                            if input.virtual_keycode == Some(VirtualKeyCode::Back)
                                && input.state == ElementState::Pressed
                            {
                                control_flow.set_exit();
                            }
                        }
                        WindowEvent::CloseRequested => control_flow.set_exit(),
                        _ => (),
                    },
                    Event::RedrawRequested(_) => {
                        let mut frame = Frame {
                            renderer: &mut self.renderer,
                            size: self.size,
                            elapsed: started.elapsed().as_secs_f32(),
                        };

                        draw(&mut frame);

                        frames_drawn += 1;
                        if matches!(self.frame_limit, Some(limit) if frames_drawn >= limit) {
                            // capture before the swap so the finished
                            // frame is still in the back buffer
                            if let Some(path) = self.screenshot.take() {
                                let pixels =
                                    self.renderer.read_pixels(self.size.0, self.size.1);
                                if let Err(e) =
                                    write_png(&path, self.size.0, self.size.1, &pixels)
                                {
                                    log::error!("could not write screenshot {path:?}: {e}");
                                }
                            }
                            control_flow.set_exit();
                        }
                    }
                    Event::RedrawEventsCleared => {
                        self.gl_window.window.request_redraw();
                        self.gl_window
                            .surface
                            .swap_buffers(&self.gl_context)
                            .unwrap();
                    }
                    _ => (),
                }
            })
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &GlConfig) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not create a window on this display: {0}")]
    Display(String),
    #[error("the display offered no window")]
    NoWindow,
    #[error("GL context setup failed: {0}")]
    Context(#[from] glutin::error::Error),
}

fn gl_string(name: gl::types::GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };

    if ptr.is_null() {
        return "unknown".to_owned();
    }

    unsafe { CStr::from_ptr(ptr.cast()) }
        .to_string_lossy()
        .into_owned()
}

fn write_png(
    path: &Path,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<(), png::EncodingError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;

    Ok(())
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};
use viewport::types::{CHECKER_DARK, CHECKER_LIGHT};
use viewport::{
    Channel, EventOutcome, FileImageSource, Rgba, Viewport, ViewportError, ViewportEvent,
    WgpuBackend,
};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::config::MIN_WINDOW_SIZE;
use crate::run::Settings;

const TITLE: &str = "Texture Viewer";

/// What a key press asks the host to do.
#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    Viewport(ViewportEvent),
    Diagnostics,
    Quit,
}

pub fn run(settings: Settings) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title(TITLE)
        .with_inner_size(LogicalSize::new(settings.width, settings.height))
        .with_min_inner_size(LogicalSize::new(MIN_WINDOW_SIZE, MIN_WINDOW_SIZE))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create viewer window: {err}"))?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let backend = WgpuBackend::new(Arc::clone(&window), size.width, size.height, settings.power)
        .context("failed to initialise GPU")?;
    let redraw_window = Arc::clone(&window);
    let mut viewport = Viewport::new(
        backend,
        Box::new(FileImageSource::new()),
        Box::new(move || redraw_window.request_redraw()),
        size.width,
        size.height,
    )
    .context("failed to build viewport programs")?;

    let diagnostics = viewport.diagnostics();
    info!(
        vendor = %diagnostics.vendor,
        renderer = %diagnostics.renderer,
        api = %diagnostics.api_version,
        "GPU ready"
    );
    if settings.print_info {
        println!("{diagnostics}");
    }

    let mut current: Option<PathBuf> = settings.path.clone();
    let startup = [
        Some(ViewportEvent::SetChannels(settings.channels)),
        Some(ViewportEvent::SetBackground {
            checkerboard: settings.checkerboard,
            color1: settings.solid,
            color2: settings.solid,
        }),
        settings.path.clone().map(ViewportEvent::OpenImage),
    ];
    for request in startup.into_iter().flatten() {
        if !dispatch(&mut viewport, &window, current.as_deref(), request) {
            return Err(anyhow!("viewport failed during start-up"));
        }
    }

    let mut modifiers = ModifiersState::empty();
    let solid = settings.solid;
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            if window_id != window.id() {
                return;
            }

            if let Some(request) = viewport_event(&event) {
                let resized = matches!(request, ViewportEvent::Resized { .. });
                if let ViewportEvent::OpenImage(path) = &request {
                    current = Some(path.clone());
                }
                if !dispatch(&mut viewport, &window, current.as_deref(), request) {
                    elwt.exit();
                } else if resized {
                    window.request_redraw();
                }
                return;
            }

            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                WindowEvent::ModifiersChanged(state) => modifiers = state.state(),
                WindowEvent::KeyboardInput { event, .. }
                    if event.state == ElementState::Pressed && !event.repeat =>
                {
                    match key_action(&event.logical_key, modifiers.shift_key(), solid) {
                        Some(KeyAction::Viewport(request)) => {
                            if !dispatch(&mut viewport, &window, current.as_deref(), request) {
                                elwt.exit();
                            }
                        }
                        Some(KeyAction::Diagnostics) => info!("\n{}", viewport.diagnostics()),
                        Some(KeyAction::Quit) => elwt.exit(),
                        None => {}
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}

/// Window events that map directly onto a viewport request.
fn viewport_event(event: &WindowEvent) -> Option<ViewportEvent> {
    match event {
        WindowEvent::Resized(size) => Some(ViewportEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::RedrawRequested => Some(ViewportEvent::RedrawRequested),
        WindowEvent::DroppedFile(path) => Some(ViewportEvent::OpenImage(path.clone())),
        _ => None,
    }
}

/// Hands one request to the viewport. Returns `false` when the host should exit.
fn dispatch(
    viewport: &mut Viewport<WgpuBackend>,
    window: &Window,
    current: Option<&Path>,
    request: ViewportEvent,
) -> bool {
    match viewport.handle_event(request) {
        Ok(EventOutcome::Status(status)) => {
            window.set_title(&title(current, &status));
            true
        }
        Ok(EventOutcome::Handled | EventOutcome::Rendered) => true,
        Err(err @ ViewportError::Surface(_)) => {
            error!(error = %err, "presentation surface failed; exiting");
            false
        }
        Err(err) => {
            warn!(error = %err, "viewport failed to handle request");
            true
        }
    }
}

fn title(path: Option<&Path>, status: &str) -> String {
    match (path, status.is_empty()) {
        (None, _) => TITLE.to_string(),
        (Some(path), true) => format!("{TITLE} - {}", path.display()),
        (Some(path), false) => format!("{TITLE} - {} [{status}]", path.display()),
    }
}

fn key_action(key: &Key, shift: bool, solid: Rgba) -> Option<KeyAction> {
    let character = match key {
        Key::Named(NamedKey::Escape) => return Some(KeyAction::Quit),
        Key::Character(value) => value.to_lowercase(),
        _ => return None,
    };

    let channel = match character.as_str() {
        "r" => Channel::Red,
        "g" => Channel::Green,
        "b" => Channel::Blue,
        "a" => Channel::Alpha,
        "c" => {
            return Some(KeyAction::Viewport(ViewportEvent::SetBackground {
                checkerboard: true,
                color1: CHECKER_DARK,
                color2: CHECKER_LIGHT,
            }))
        }
        "s" => {
            return Some(KeyAction::Viewport(ViewportEvent::SetBackground {
                checkerboard: false,
                color1: solid,
                color2: solid,
            }))
        }
        "i" => return Some(KeyAction::Diagnostics),
        _ => return None,
    };

    Some(KeyAction::Viewport(if shift {
        ViewportEvent::SoloChannel(channel)
    } else {
        ViewportEvent::ToggleChannel(channel)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    fn character(value: &str) -> Key {
        Key::Character(value.into())
    }

    #[test]
    fn window_events_become_viewport_requests() {
        assert_eq!(
            viewport_event(&WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(ViewportEvent::Resized {
                width: 640,
                height: 480
            })
        );
        assert_eq!(
            viewport_event(&WindowEvent::RedrawRequested),
            Some(ViewportEvent::RedrawRequested)
        );
        assert_eq!(
            viewport_event(&WindowEvent::DroppedFile(PathBuf::from("brick.tga"))),
            Some(ViewportEvent::OpenImage(PathBuf::from("brick.tga")))
        );
        assert_eq!(viewport_event(&WindowEvent::CloseRequested), None);
        assert_eq!(viewport_event(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn title_includes_path_and_status() {
        assert_eq!(title(None, ""), "Texture Viewer");
        assert_eq!(
            title(Some(Path::new("brick.png")), "PNG - 64x64 - Rgba8"),
            "Texture Viewer - brick.png [PNG - 64x64 - Rgba8]"
        );
        assert_eq!(
            title(Some(Path::new("brick.png")), ""),
            "Texture Viewer - brick.png"
        );
    }

    #[test]
    fn channel_keys_toggle_and_shift_solos() {
        let grey = Rgba::grey(0.2);
        assert_eq!(
            key_action(&character("r"), false, grey),
            Some(KeyAction::Viewport(ViewportEvent::ToggleChannel(
                Channel::Red
            )))
        );
        assert_eq!(
            key_action(&character("A"), true, grey),
            Some(KeyAction::Viewport(ViewportEvent::SoloChannel(
                Channel::Alpha
            )))
        );
    }

    #[test]
    fn background_and_control_keys() {
        let grey = Rgba::grey(0.2);
        assert_eq!(
            key_action(&character("s"), false, grey),
            Some(KeyAction::Viewport(ViewportEvent::SetBackground {
                checkerboard: false,
                color1: grey,
                color2: grey,
            }))
        );
        assert!(matches!(
            key_action(&character("c"), false, grey),
            Some(KeyAction::Viewport(ViewportEvent::SetBackground {
                checkerboard: true,
                ..
            }))
        ));
        assert_eq!(
            key_action(&character("i"), false, grey),
            Some(KeyAction::Diagnostics)
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::Escape), false, grey),
            Some(KeyAction::Quit)
        );
        assert_eq!(key_action(&character("z"), false, grey), None);
        assert_eq!(key_action(&Key::Named(NamedKey::Tab), false, grey), None);
    }
}

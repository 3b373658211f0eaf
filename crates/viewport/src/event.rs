use std::path::PathBuf;

use crate::types::{Channel, ChannelMask, Rgba};

/// Everything the host can ask of the viewport, as one tagged union.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    /// The framebuffer changed size.
    Resized { width: u32, height: u32 },
    /// The host wants a frame drawn now.
    RedrawRequested,
    /// Display a new file.
    OpenImage(PathBuf),
    /// Replace the whole channel selection.
    SetChannels(ChannelMask),
    /// Flip a single channel.
    ToggleChannel(Channel),
    /// Show only the given channel.
    SoloChannel(Channel),
    /// Switch background mode.
    SetBackground {
        checkerboard: bool,
        color1: Rgba,
        color2: Rgba,
    },
}

/// What handling an event produced, for hosts that surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// State changed (or nothing to report).
    Handled,
    /// A frame was drawn.
    Rendered,
    /// An image was loaded; carries the status line.
    Status(String),
}

/// Lets the viewport ask its host for a repaint after a state change the
/// host did not initiate.
pub trait RedrawRequest {
    fn request_redraw(&self);
}

impl<F: Fn()> RedrawRequest for F {
    fn request_redraw(&self) {
        self()
    }
}

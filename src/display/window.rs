use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use super::Display;
use crate::frame::Frame;

/// Desktop window backed by minifb.
///
/// The window is created lazily on the first frame so it can match the
/// camera's actual resolution. Pressing `Q` or closing the window quits.
pub struct WindowDisplay {
    title: String,
    window: Option<Window>,
    buf: Vec<u32>,
}

impl WindowDisplay {
    pub fn open(title: &str) -> Result<Self> {
        Ok(Self {
            title: title.to_string(),
            window: None,
            buf: Vec::new(),
        })
    }

    fn ensure_window(&mut self, width: usize, height: usize) -> Result<&mut Window> {
        let stale = self
            .window
            .as_ref()
            .is_some_and(|w| w.get_size() != (width, height));
        if stale || self.window.is_none() {
            let window = Window::new(
                &self.title,
                width,
                height,
                WindowOptions {
                    resize: false,
                    ..WindowOptions::default()
                },
            )
            .map_err(|e| anyhow!("open display window: {}", e))?;
            log::info!("display window opened ({}x{})", width, height);
            self.window = Some(window);
        }
        self.window
            .as_mut()
            .ok_or_else(|| anyhow!("display window unavailable"))
    }
}

impl Display for WindowDisplay {
    fn present(&mut self, frame: &Frame) -> Result<bool> {
        let (width, height) = (frame.width as usize, frame.height as usize);
        let mut buf = std::mem::take(&mut self.buf);
        frame.write_packed(&mut buf);

        let window = self.ensure_window(width, height)?;
        let shown = window.update_with_buffer(&buf, width, height);
        let quit = !window.is_open() || window.is_key_pressed(Key::Q, KeyRepeat::No);
        self.buf = buf;

        shown.map_err(|e| anyhow!("update display window: {}", e))?;
        Ok(quit)
    }
}

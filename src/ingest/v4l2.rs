//! V4L2 webcam source.
//!
//! Opens a local device node (e.g. /dev/video0), negotiates a capture format,
//! and streams frames through an mmap buffer ring. Frames are normalized to
//! RGB24 before they leave this module.

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use super::normalize::{normalize_to_rgb, PixelFormat};
use super::FrameSource;
use crate::config::CameraSettings;
use crate::frame::Frame;

/// V4L2 frame source backed by libv4l.
pub struct V4l2Source {
    settings: CameraSettings,
    state: Option<DeviceState>,
    format: PixelFormat,
    frame_count: u64,
    active_width: u32,
    active_height: u32,
}

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2Source {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            active_width: settings.width,
            active_height: settings.height,
            settings,
            state: None,
            format: PixelFormat::Yuyv,
            frame_count: 0,
        }
    }

    /// Open the device and start streaming.
    ///
    /// Asks for YUYV at the configured size. The driver may pick something
    /// else; whatever it settles on is what we report and decode.
    pub fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let device = &self.settings.device;
        let mut dev = v4l::Device::with_path(device)
            .with_context(|| format!("open v4l2 device {}", device))?;
        let mut requested = dev.format().context("read v4l2 format")?;
        requested.width = self.settings.width;
        requested.height = self.settings.height;
        requested.fourcc = v4l::FourCC::new(b"YUYV");

        let format = match dev.set_format(&requested) {
            Ok(format) => format,
            Err(err) => {
                log::warn!("V4l2Source: failed to set format on {}: {}", device, err);
                dev.format().context("read v4l2 format after set failure")?
            }
        };
        self.format = PixelFormat::from_fourcc(&format.fourcc.repr).ok_or_else(|| {
            anyhow!(
                "v4l2 device {} settled on unsupported pixel format {}",
                device,
                format.fourcc
            )
        })?;

        if self.settings.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.settings.target_fps);
            if let Err(err) = dev.set_params(&params) {
                log::warn!("V4l2Source: failed to set fps on {}: {}", device, err);
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;

        let state = DeviceStateBuilder {
            device: dev,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()?;
        self.state = Some(state);

        log::info!(
            "V4l2Source: connected to {} ({}x{}, {:?})",
            device,
            self.active_width,
            self.active_height,
            self.format
        );
        Ok(())
    }
}

impl FrameSource for V4l2Source {
    fn describe(&self) -> String {
        format!(
            "{} ({}x{})",
            self.settings.device, self.active_width, self.active_height
        )
    }

    fn next_frame(&mut self) -> Result<Frame> {
        use v4l::io::traits::CaptureStream;

        let state = self.state.as_mut().context("v4l2 device not connected")?;
        let (width, height, format) = (self.active_width, self.active_height, self.format);
        let rgb = state.with_mut(|fields| -> Result<Vec<u8>> {
            let (buf, _meta) = fields.stream.next().context("capture v4l2 frame")?;
            normalize_to_rgb(buf, width, height, format)
        })?;

        self.frame_count += 1;
        Frame::from_rgb(rgb, width, height, self.frame_count)
    }

    fn frame_height(&self) -> u32 {
        self.active_height
    }
}

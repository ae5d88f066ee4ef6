use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::effects::composite::flatten_over_bg;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::io::sink::{FrameSink, SinkConfig};
use crate::io::source::FrameSource;
use crate::render::frame::Frame;

/// Options for [`FfmpegCaptureSource`].
#[derive(Clone, Debug)]
pub struct FfmpegCaptureOpts {
    /// Capture device or file, e.g. `/dev/video0`.
    pub device: PathBuf,
    /// ffmpeg demuxer for `device` (`v4l2`, `avfoundation`, ...). `None` lets ffmpeg detect it.
    pub input_format: Option<String>,
    /// Requested capture size; frames are scaled to it.
    pub canvas: Canvas,
    /// Requested capture rate.
    pub fps: Fps,
}

/// Capture source that streams raw RGBA8 frames out of a system `ffmpeg` process.
pub struct FfmpegCaptureSource {
    opts: FfmpegCaptureOpts,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
}

impl FfmpegCaptureSource {
    /// Spawn `ffmpeg` reading from the configured device.
    pub fn spawn(opts: FfmpegCaptureOpts) -> LayercamResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(LayercamError::device(
                "ffmpeg is required for device capture, but was not found on PATH",
            ));
        }
        let frame_len = opts.canvas.rgba8_len()?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args(["-loglevel", "error"]);
        if let Some(format) = &opts.input_format {
            cmd.args(["-f", format]);
        }
        cmd.args(["-framerate", &format!("{}/{}", opts.fps.num, opts.fps.den)]);
        cmd.arg("-i").arg(&opts.device);
        cmd.args([
            "-vf",
            &format!("scale={}:{}", opts.canvas.width, opts.canvas.height),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ]);

        let child = cmd.spawn().map_err(|e| {
            LayercamError::device(format!(
                "failed to spawn ffmpeg for '{}': {e}",
                opts.device.display()
            ))
        })?;
        let source = Self::from_child(opts, child, frame_len)?;
        tracing::info!(
            device = %source.opts.device.display(),
            canvas = %source.opts.canvas,
            "capture started"
        );
        Ok(source)
    }

    fn from_child(
        opts: FfmpegCaptureOpts,
        mut child: Child,
        frame_len: usize,
    ) -> LayercamResult<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LayercamError::device("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| LayercamError::device("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });
        Ok(Self {
            opts,
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frame_len,
        })
    }

    // Stop the process and collect whatever it wrote to stderr.
    fn shutdown(&mut self) -> Vec<u8> {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        match self.stderr_drain.take().map(JoinHandle::join) {
            Some(Ok(Ok(bytes))) => bytes,
            _ => Vec::new(),
        }
    }
}

fn capture_ended(device: &Path, err: &std::io::Error, stderr: &[u8]) -> LayercamError {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        LayercamError::device(format!("capture from '{}' ended: {err}", device.display()))
    } else {
        LayercamError::device(format!(
            "capture from '{}' ended: {err}: {stderr}",
            device.display()
        ))
    }
}

impl FrameSource for FfmpegCaptureSource {
    fn next_frame(&mut self) -> LayercamResult<Frame> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(LayercamError::device("capture source is closed"));
        };
        let mut buf = vec![0u8; self.frame_len];
        if let Err(err) = stdout.read_exact(&mut buf) {
            let stderr = self.shutdown();
            return Err(capture_ended(&self.opts.device, &err, &stderr));
        }
        Frame::from_rgba8(self.opts.canvas.width, self.opts.canvas.height, buf)
    }
}

impl Drop for FfmpegCaptureSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Options for [`FfmpegCameraSink`].
#[derive(Clone, Debug)]
pub struct FfmpegCameraSinkOpts {
    /// Output device or file, e.g. a v4l2loopback node `/dev/video20`.
    pub output: PathBuf,
    /// ffmpeg muxer for `output` (`v4l2` for loopback devices).
    pub output_format: String,
    /// Pixel format written to the device.
    pub pix_fmt: String,
    /// Background color used to flatten alpha.
    pub bg_rgb: [u8; 3],
}

impl FfmpegCameraSinkOpts {
    /// Options for writing into a v4l2 loopback device.
    pub fn v4l2(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            output_format: "v4l2".to_string(),
            pix_fmt: "yuv420p".to_string(),
            bg_rgb: [0, 0, 0],
        }
    }
}

/// Virtual camera sink that streams flattened RGBA8 frames into a system `ffmpeg` process.
pub struct FfmpegCameraSink {
    opts: FfmpegCameraSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegCameraSink {
    /// Create a sink; `ffmpeg` is spawned in `begin`.
    pub fn new(opts: FfmpegCameraSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegCameraSink {
    fn begin(&mut self, cfg: SinkConfig) -> LayercamResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(LayercamError::device(
                "ffmpeg is required for virtual camera output, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-f",
            &self.opts.output_format,
            "-pix_fmt",
            &self.opts.pix_fmt,
        ]);
        cmd.arg(&self.opts.output);

        let mut child = cmd.spawn().map_err(|e| {
            LayercamError::device(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LayercamError::device("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| LayercamError::device("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; cfg.canvas.rgba8_len()?];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        tracing::info!(output = %self.opts.output.display(), canvas = %cfg.canvas, "virtual camera started");
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> LayercamResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LayercamError::device("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(LayercamError::device(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        frame.ensure_canvas(cfg.canvas)?;
        self.last_idx = Some(idx);

        flatten_over_bg(&mut self.scratch, frame.data(), self.opts.bg_rgb);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LayercamError::device("ffmpeg sink is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            LayercamError::device(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> LayercamResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait().map_err(|e| {
            LayercamError::device(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LayercamError::device("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| LayercamError::device(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(LayercamError::device(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use qrstamp::{
    EncodeParams, ErrorCorrection, FrameInfo, Fps, LEGACY_TEMPLATE, MetadataSnapshot,
    OverlaySettings, PixelFormat, QrOverlay, StampOutcome, VideoFrameMut,
};

#[derive(Parser, Debug)]
#[command(name = "qrstamp", version, about = "Burn metadata QR codes into video frames")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stamp a still image (PNG, JPEG, ...).
    Image(ImageArgs),
    /// Stamp every frame of a raw video file.
    Raw(RawArgs),
    /// List supported raw pixel formats.
    Formats,
}

#[derive(Args, Debug)]
struct OverlayArgs {
    /// Settings JSON; the flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pixels per QR module (1..=255).
    #[arg(long)]
    scale: Option<u32>,

    /// Left edge of the code in pixels.
    #[arg(long)]
    x: Option<u32>,

    /// Top edge of the code in pixels.
    #[arg(long)]
    y: Option<u32>,

    /// Quiet-zone width in modules.
    #[arg(long)]
    border: Option<u32>,

    /// Payload template (%c clock, %t pts, %n frame, %f format, %w/%h size, %r fps).
    #[arg(long, conflicts_with = "legacy_format")]
    format: Option<String>,

    /// Use the multi-line `key=value` payload of the original element.
    #[arg(long)]
    legacy_format: bool,

    /// Error-correction level (l, m, q, h).
    #[arg(long)]
    ec_level: Option<ErrorCorrection>,

    /// Fixed QR version (1..=40); 0 picks the smallest that fits.
    #[arg(long)]
    qr_version: Option<u8>,
}

impl OverlayArgs {
    fn settings(&self) -> anyhow::Result<OverlaySettings> {
        let mut s = match &self.config {
            Some(path) => OverlaySettings::from_path(path)?,
            None => OverlaySettings::default(),
        };
        if let Some(v) = self.scale {
            s.set_scale(v)?;
        }
        if let Some(v) = self.x {
            s.set_x(v)?;
        }
        if let Some(v) = self.y {
            s.set_y(v)?;
        }
        if let Some(v) = self.border {
            s.set_border(v)?;
        }
        if let Some(t) = &self.format {
            s.set_template(t.clone());
        }
        if self.legacy_format {
            s.set_template(LEGACY_TEMPLATE);
        }
        if self.ec_level.is_some() || self.qr_version.is_some() {
            let current = *s.encoding();
            s.set_encoding(EncodeParams {
                ec_level: self.ec_level.unwrap_or(current.ec_level),
                version: self.qr_version.unwrap_or(current.version),
                ..current
            })?;
        }
        Ok(s)
    }
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Stamp as GRAY8 instead of RGB.
    #[arg(long)]
    gray: bool,

    /// Frame number exposed as %n.
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Presentation timestamp in microseconds, exposed as %t.
    #[arg(long, default_value_t = 0)]
    pts_us: u64,

    /// Framerate exposed as %r (N/D or N).
    #[arg(long, default_value = "0/1")]
    fps: Fps,

    #[command(flatten)]
    overlay: OverlayArgs,
}

#[derive(Args, Debug)]
struct RawArgs {
    /// Input raw video (concatenated frames).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output raw video.
    #[arg(long)]
    out: PathBuf,

    /// Pixel format name (see `qrstamp formats`).
    #[arg(long)]
    pix_fmt: PixelFormat,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Framerate (N/D or N), used for %r and per-frame timestamps.
    #[arg(long, default_value = "25/1")]
    fps: Fps,

    /// Row alignment of the input in bytes (1 = tightly packed).
    #[arg(long, default_value_t = 1)]
    row_align: usize,

    #[command(flatten)]
    overlay: OverlayArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Raw(args) => cmd_raw(args),
        Command::Formats => {
            for fmt in PixelFormat::ALL {
                println!("{fmt}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let overlay = QrOverlay::new(args.overlay.settings()?)?;
    let img = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?;
    let (width, height) = (img.width(), img.height());

    ensure_parent_dir(&args.out)?;
    let outcome = if args.gray {
        let mut buf = img.to_luma8();
        let info = PixelFormat::Gray8.frame_info_aligned(width, height, 1);
        let outcome = stamp_one(&overlay, &info, &mut buf, &args)?;
        buf.save(&args.out)
            .with_context(|| format!("write image '{}'", args.out.display()))?;
        outcome
    } else {
        let mut buf = img.to_rgb8();
        let info = PixelFormat::Rgb.frame_info_aligned(width, height, 1);
        let outcome = stamp_one(&overlay, &info, &mut buf, &args)?;
        buf.save(&args.out)
            .with_context(|| format!("write image '{}'", args.out.display()))?;
        outcome
    };

    if let StampOutcome::Skipped(reason) = outcome {
        eprintln!("no code drawn: {reason:?}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn stamp_one(
    overlay: &QrOverlay,
    info: &FrameInfo,
    data: &mut [u8],
    args: &ImageArgs,
) -> anyhow::Result<StampOutcome> {
    let meta = MetadataSnapshot::capture(info, args.pts_us, args.frame, args.fps);
    let mut frame = VideoFrameMut::new(info, data)?;
    Ok(overlay.stamp(&mut frame, &meta)?)
}

fn cmd_raw(args: RawArgs) -> anyhow::Result<()> {
    let overlay = QrOverlay::new(args.overlay.settings()?)?;
    let info = args
        .pix_fmt
        .frame_info_aligned(args.width, args.height, args.row_align);
    info.validate(info.size)?;

    let input = File::open(&args.in_path)
        .with_context(|| format!("open raw input '{}'", args.in_path.display()))?;
    let mut reader = BufReader::new(input);
    ensure_parent_dir(&args.out)?;
    let output = File::create(&args.out)
        .with_context(|| format!("create raw output '{}'", args.out.display()))?;
    let mut writer = BufWriter::new(output);

    let streamed = stream_raw(&overlay, &info, &args, &mut reader, &mut writer);
    drop(writer);
    let (frames, skipped) = match streamed {
        Ok(counts) => counts,
        Err(e) => {
            // Leave no half-written output behind.
            let _ = std::fs::remove_file(&args.out);
            return Err(e);
        }
    };

    tracing::info!(frames, skipped, "done");
    eprintln!("wrote {} ({frames} frames)", args.out.display());
    Ok(())
}

/// Stamp every frame of `reader` into `writer`. Returns `(frames, skipped)`.
fn stream_raw(
    overlay: &QrOverlay,
    info: &FrameInfo,
    args: &RawArgs,
    reader: &mut impl Read,
    writer: &mut impl Write,
) -> anyhow::Result<(u64, u64)> {
    let mut buf = vec![0u8; info.size];
    let mut index = 0u64;
    let mut skipped = 0u64;
    while read_frame(reader, &mut buf)
        .with_context(|| format!("read frame {index} of '{}'", args.in_path.display()))?
    {
        let pts_us = args.fps.frame_to_us(index).unwrap_or(0);
        let meta = MetadataSnapshot::capture(info, pts_us, index, args.fps);
        let mut frame = VideoFrameMut::new(info, &mut buf)?;
        let outcome = overlay
            .stamp(&mut frame, &meta)
            .with_context(|| format!("stamp frame {index}"))?;
        if !outcome.is_stamped() {
            skipped += 1;
        }
        writer
            .write_all(&buf)
            .with_context(|| format!("write frame {index}"))?;
        index += 1;
    }
    writer.flush().context("flush raw output")?;
    Ok((index, skipped))
}

/// Fill `buf` with the next frame. `Ok(false)` on a clean end of stream.
fn read_frame(r: &mut impl Read, buf: &mut [u8]) -> anyhow::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = r.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    match filled {
        0 => Ok(false),
        n if n == buf.len() => Ok(true),
        n => anyhow::bail!("truncated frame: {n} of {} bytes", buf.len()),
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

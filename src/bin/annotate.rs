// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 检测结果绘制工具
///
/// 读取图片与 MOT 检测文件, 绘制检测框/标签后保存.
/// `--letterbox` 时输出 letterbox 预处理结果.
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mot_overlay::detection::read_mot;
use mot_overlay::render::{check_font, font::FONT};
use mot_overlay::{letterbox, AppConfig, Compositor, Frame};

#[derive(Parser, Debug)]
#[command(author, version, about = "检测结果绘制 - draw MOT detections onto an image", long_about = None)]
struct Args {
    /// 输入图片
    #[arg(short, long)]
    image: PathBuf,

    /// MOT 格式检测文件 (frame,id,x,y,w,h,conf,px,py,pz)
    #[arg(short, long)]
    detections: Option<PathBuf>,

    /// 输出图片
    #[arg(short, long, default_value = "annotated.png")]
    output: PathBuf,

    /// JSON 配置文件 (不存在时写入默认值)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 只绘制该帧的检测
    #[arg(long)]
    frame: Option<u32>,

    /// 按跟踪ID着色 (默认按类别)
    #[arg(long)]
    track_colors: bool,

    /// 不绘制标签
    #[arg(long)]
    no_labels: bool,

    /// 标签字体 (TTF/OTF)
    #[arg(long)]
    font: Option<PathBuf>,

    /// 输出 letterbox 结果而不是绘制结果
    #[arg(long)]
    letterbox: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_or_default(path),
        None => AppConfig::default(),
    };

    let image = image::open(&args.image)
        .with_context(|| format!("failed to open image {}", args.image.display()))?
        .into_rgb8();
    let frame = Frame::new(image, args.image.display().to_string());
    log::info!("frame {}: {}x{}", frame.id, frame.width(), frame.height());

    let output = if args.letterbox {
        let result = letterbox(&frame.image, &config.letterbox);
        log::info!(
            "letterbox ratio {:?}, pad {:?}",
            result.ratio,
            result.pad
        );
        result.image
    } else {
        let mut detections = match &args.detections {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open detections {}", path.display()))?;
                read_mot(BufReader::new(file))?
            }
            None => Vec::new(),
        };
        if let Some(frame_idx) = args.frame {
            detections.retain(|d| d.frame == Some(frame_idx));
        }
        log::info!("{} detections", detections.len());

        let draw_labels = !args.no_labels;
        let mut compositor = Compositor::from_config(config.render.clone())?;
        if let Some(path) = &args.font {
            compositor = compositor.with_font(mot_overlay::render::load_font(path)?);
        } else if draw_labels && !compositor.has_font() {
            match check_font(FONT) {
                Ok(font) => compositor = compositor.with_font(font),
                Err(e) => log::warn!("{e:#}, labels are drawn without text"),
            }
        }

        compositor.draw(&frame, &detections, args.track_colors, draw_labels)
    };

    output
        .save(&args.output)
        .with_context(|| format!("failed to save {}", args.output.display()))?;
    log::info!("saved {}", args.output.display());
    Ok(())
}

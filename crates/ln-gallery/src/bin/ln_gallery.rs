use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{GrayImage, Rgb, RgbImage};
use linenorm::{
    CenterConfig, CenterNormalizer, Image, Measurement, NormalizationParams, dewarp_with,
    from_unit_f32, max_value, plan_scale, scale_to_height, to_unit_f32,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ln_gallery")]
#[command(about = "Run text-line normalization on image files")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "normalize")]
    Normalize(NormalizeArgs),
    #[command(name = "measure")]
    Measure(MeasureArgs),
    #[command(name = "scale")]
    Scale(ScaleArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

/// Normalizer parameters; flags override values read from `--config`.
#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    target_height: Option<usize>,
    #[arg(long)]
    range: Option<f32>,
    #[arg(long)]
    smoothness: Option<f32>,
    #[arg(long)]
    extra: Option<f32>,
}

#[derive(Args, Debug, Clone)]
struct NormalizeArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    cfg: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct MeasureArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    cfg: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct ScaleArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, required = true)]
    height: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MeasurementDto {
    radius: usize,
    mad: f64,
    center_min: usize,
    center_max: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaNormalize {
    config: CenterConfig,
    params: NormalizationParams,
    input_size: [usize; 2],
    dewarped_size: [usize; 2],
    output_size: [usize; 2],
    cval: f32,
    measurement: Option<MeasurementDto>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaMeasure {
    config: CenterConfig,
    input_size: [usize; 2],
    blank: bool,
    measurement: Option<MeasurementDto>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaScale {
    input_size: [usize; 2],
    output_size: [usize; 2],
    scale: f64,
    method: &'static str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Normalize(args) => run_normalize(args),
        Command::Measure(args) => run_measure(args),
        Command::Scale(args) => run_scale(args),
    }
}

fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "normalize")?;
    let config = resolve_config(&args.cfg)?;
    let normalizer = CenterNormalizer::new(config.clone()).context("validating config")?;

    let img = load_input_u8(&args.common.input)?;
    let unit = to_unit_f32(&img.as_view());
    let cval = max_value(&unit.as_view()).context("input image has no pixels")?;

    let out = normalizer
        .normalize_with(&unit.as_view(), cval)
        .with_context(|| format!("normalizing {}", args.common.input.display()))?;
    if out.measurement.is_none() {
        warn!("input has no contrast, dewarped line is blank");
    }

    save_f32_image(case_dir.join("dewarped.png"), &out.dewarped)?;
    save_f32_image(case_dir.join("normalized.png"), &out.image)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaNormalize {
            config,
            params: out.params,
            input_size: [img.width(), img.height()],
            dewarped_size: [out.dewarped.width(), out.dewarped.height()],
            output_size: [out.image.width(), out.image.height()],
            cval,
            measurement: out.measurement.as_ref().map(measurement_dto),
        },
    )?;

    info!(
        m1 = out.params.m1,
        m2 = out.params.m2,
        t = out.params.t,
        dir = %case_dir.display(),
        "normalize done"
    );
    Ok(())
}

fn run_measure(args: MeasureArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "measure")?;
    let config = resolve_config(&args.cfg)?;
    config.validate().context("validating config")?;

    let img = load_input_u8(&args.common.input)?;
    let unit = to_unit_f32(&img.as_view());
    let cval = max_value(&unit.as_view()).context("input image has no pixels")?;

    let (_, measurement) = dewarp_with(&unit.as_view(), cval, &config)
        .with_context(|| format!("measuring {}", args.common.input.display()))?;

    let centers = measurement
        .as_ref()
        .map(|m| m.center.clone())
        .unwrap_or_default();
    write_csv(case_dir.join("centerline.csv"), &centers)?;

    let mut overlay = gray_to_rgb(&img)?;
    if let Some(m) = &measurement {
        render_centerline(&mut overlay, m);
    }
    overlay
        .save(case_dir.join("overlay.png"))
        .with_context(|| format!("saving overlay in {}", case_dir.display()))?;

    write_json(
        case_dir.join("meta.json"),
        &MetaMeasure {
            config,
            input_size: [img.width(), img.height()],
            blank: measurement.is_none(),
            measurement: measurement.as_ref().map(measurement_dto),
        },
    )?;

    Ok(())
}

fn run_scale(args: ScaleArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "scale")?;
    let img = load_input_u8(&args.common.input)?;
    let unit = to_unit_f32(&img.as_view());

    let plan = plan_scale(img.width(), img.height(), args.height).context("planning rescale")?;
    let scaled = scale_to_height(&unit.as_view(), args.height).context("rescaling")?;
    save_f32_image(case_dir.join("scaled.png"), &scaled)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaScale {
            input_size: [img.width(), img.height()],
            output_size: [scaled.width(), scaled.height()],
            scale: plan.scale,
            method: plan.method.name(),
        },
    )?;

    Ok(())
}

fn resolve_config(args: &ConfigArgs) -> Result<CenterConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            ensure_file_exists(path, "config")?;
            read_json(path).with_context(|| format!("reading config {}", path.display()))?
        }
        None => CenterConfig::default(),
    };

    if let Some(v) = args.target_height {
        cfg.target_height = v;
    }
    if let Some(v) = args.range {
        cfg.range = v;
    }
    if let Some(v) = args.smoothness {
        cfg.smoothness = v;
    }
    if let Some(v) = args.extra {
        cfg.extra = v;
    }
    Ok(cfg)
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    Ok(case_dir)
}

fn load_input_u8(path: &Path) -> Result<Image<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing line image from {}", path.display()))
}

fn save_f32_image(path: PathBuf, img: &Image<f32>) -> Result<()> {
    let bytes = from_unit_f32(&img.as_view());
    save_u8_image(path, &bytes)
}

fn save_u8_image(path: PathBuf, img: &Image<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn write_csv(path: PathBuf, values: &[usize]) -> Result<()> {
    let mut file =
        fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "index,value").context("writing csv header")?;
    for (i, v) in values.iter().enumerate() {
        writeln!(file, "{i},{v}").context("writing csv row")?;
    }
    Ok(())
}

fn measurement_dto(m: &Measurement) -> MeasurementDto {
    MeasurementDto {
        radius: m.radius,
        mad: m.mad,
        center_min: m.center.iter().min().copied().unwrap_or(0),
        center_max: m.center.iter().max().copied().unwrap_or(0),
    }
}

fn gray_to_rgb(input: &Image<u8>) -> Result<RgbImage> {
    let gray = GrayImage::from_raw(
        input.width() as u32,
        input.height() as u32,
        input.data().to_vec(),
    )
    .context("constructing GrayImage from input")?;
    Ok(image::DynamicImage::ImageLuma8(gray).to_rgb8())
}

/// Centerline in red, window bounds `c - r` and `c + r - 1` in green.
fn render_centerline(img: &mut RgbImage, m: &Measurement) {
    let r = m.radius as i64;
    for (x, &c) in m.center.iter().enumerate() {
        let c = c as i64;
        put_if_inside(img, x as i64, c - r, Rgb([64, 200, 64]));
        put_if_inside(img, x as i64, c + r - 1, Rgb([64, 200, 64]));
        put_if_inside(img, x as i64, c, Rgb([255, 64, 64]));
    }
}

fn put_if_inside(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux >= img.width() || uy >= img.height() {
        return;
    }
    img.put_pixel(ux, uy, color);
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

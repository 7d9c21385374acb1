use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use kawaii_booth::{
    BoothConfig, CaptureOutcome, CpuSurface, DirSave, DirectoryCamera, EditSession, EncodedImage,
    ExportFormat, ExportOutcome, FILTERS, PhaseController, Sequencer, SequencerEvent, Sticker,
    TEMPLATES, THEMES, Template, ThemeId, Viewport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kawaii-booth", version)]
struct Cli {
    /// Booth config JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List layout templates.
    Templates,
    /// List collage themes.
    Themes,
    /// List capture filters.
    Filters,
    /// Run a timed capture against a directory of stills, then export the collage.
    Capture(CaptureArgs),
    /// Compose existing photos into a collage and export it.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Template id.
    #[arg(long)]
    template: String,

    /// Directory the camera replays stills from.
    #[arg(long)]
    photos_dir: PathBuf,

    /// Where captured stills and the collage are written.
    #[arg(long)]
    out_dir: PathBuf,

    /// Capture filter key.
    #[arg(long)]
    filter: Option<String>,

    /// Countdown seconds (3, 5 or 10).
    #[arg(long)]
    countdown: Option<u32>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Template id.
    #[arg(long)]
    template: String,

    /// Theme id. Falls back to the configured default theme.
    #[arg(long)]
    theme: Option<String>,

    /// Photos in slot order.
    #[arg(long, num_args = 1.., required = true)]
    photos: Vec<PathBuf>,

    /// Sticker list JSON (array of `{id, symbol, x, y, font_size, rotation}`).
    #[arg(long)]
    stickers: Option<PathBuf>,

    /// Filter key the photos were captured with.
    #[arg(long)]
    filter: Option<String>,

    /// Output format: png or jpg.
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Font file for the caption and stickers.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => BoothConfig::from_path(path)?,
        None => BoothConfig::default(),
    }
    .with_env_overrides();

    match cli.cmd {
        Command::Templates => cmd_templates(),
        Command::Themes => cmd_themes(),
        Command::Filters => cmd_filters(),
        Command::Capture(args) => cmd_capture(args, cfg),
        Command::Compose(args) => cmd_compose(args, cfg),
    }
}

fn cmd_templates() -> anyhow::Result<()> {
    for t in &TEMPLATES {
        println!(
            "{:<10} {:<14} {} shots  {}x{} grid  {}x{} px",
            t.id,
            t.name,
            t.shot_count,
            t.cols,
            t.rows,
            t.width(),
            t.height()
        );
    }
    Ok(())
}

fn cmd_themes() -> anyhow::Result<()> {
    for t in &THEMES {
        println!("{:<12} {}", t.id, t.name);
    }
    Ok(())
}

fn cmd_filters() -> anyhow::Result<()> {
    for f in &FILTERS {
        println!("{:<8} {:<8} {}", f.key, f.display_name, f.style);
    }
    Ok(())
}

fn cmd_capture(args: CaptureArgs, mut cfg: BoothConfig) -> anyhow::Result<()> {
    if let Some(secs) = args.countdown {
        cfg.countdown_secs = secs.try_into()?;
    }
    let mut phases = PhaseController::new();
    let template = phases.select_template(&args.template)?;

    let camera = DirectoryCamera::open(&args.photos_dir)?;
    anyhow::ensure!(
        !camera.is_empty(),
        "no stills found in '{}'",
        args.photos_dir.display()
    );

    let mut seq = Sequencer::new(camera, cfg.capture_timings());
    seq.set_countdown(cfg.countdown_secs)?;
    seq.set_filter(args.filter.as_deref().unwrap_or(&cfg.default_filter))?;

    let finished: Rc<RefCell<Option<CaptureOutcome>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&finished);
    seq.start(template, move |outcome| {
        *sink.borrow_mut() = Some(outcome);
    })?;

    let mut last = Instant::now();
    while seq.is_running() {
        if let Some(wait) = seq.time_until_next() {
            std::thread::sleep(wait);
        }
        let now = Instant::now();
        for event in seq.advance(now - last) {
            report(&event);
            if let SequencerEvent::Failed { error, .. } = event {
                return Err(error.into());
            }
        }
        last = now;
    }

    let outcome = finished
        .borrow_mut()
        .take()
        .context("capture run ended without photos")?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, still) in outcome.photos.iter().enumerate() {
        let path = args.out_dir.join(format!("shot-{}.{}", i + 1, still_ext(still)));
        std::fs::write(&path, still.bytes.as_slice())
            .with_context(|| format!("write still '{}'", path.display()))?;
    }

    phases.complete_capture(outcome.clone())?;
    export_collage(
        template,
        &outcome,
        cfg.default_theme,
        &[],
        &cfg,
        &args.out_dir,
    )
}

fn cmd_compose(args: ComposeArgs, mut cfg: BoothConfig) -> anyhow::Result<()> {
    let template = kawaii_booth::template_by_id(&args.template)
        .with_context(|| format!("unknown template '{}'", args.template))?;
    let theme = match &args.theme {
        Some(id) => ThemeId::parse(id).with_context(|| format!("unknown theme '{id}'"))?,
        None => cfg.default_theme,
    };
    if let Some(format) = args.format {
        cfg.export.format = format;
    }
    if args.font.is_some() {
        cfg = cfg.with_font_override(args.font);
    }

    let photos = args
        .photos
        .iter()
        .map(EncodedImage::from_path)
        .collect::<Result<Vec<_>, _>>()?;
    let stickers: Vec<Sticker> = match &args.stickers {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("open stickers '{}'", path.display()))?;
            serde_json::from_reader(std::io::BufReader::new(f))
                .with_context(|| format!("parse stickers '{}'", path.display()))?
        }
        None => Vec::new(),
    };

    let outcome = CaptureOutcome {
        photos,
        filter_key: args.filter.unwrap_or_else(|| cfg.default_filter.clone()),
    };
    export_collage(template, &outcome, theme, &stickers, &cfg, &args.out_dir)
}

fn export_collage(
    template: &Template,
    outcome: &CaptureOutcome,
    theme: ThemeId,
    stickers: &[Sticker],
    cfg: &BoothConfig,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let caption = chrono::Local::now().format("%-m/%-d/%Y").to_string();
    let seed = chrono::Local::now().timestamp_millis() as u64;
    let mut opts = cfg.edit_options(seed, Some(caption));
    opts.theme = theme;

    let mut session: EditSession<CpuSurface> =
        EditSession::new(template, &outcome.photos, &outcome.filter_key, opts)?;
    for sticker in stickers {
        session.stickers_mut().insert(sticker.clone());
    }

    let mut surface = CpuSurface::new(Viewport::native(template));
    match &cfg.font_path {
        Some(path) => surface = surface.with_font_file(path)?,
        None => tracing::warn!("no font configured; caption and stickers will not be drawn"),
    }
    session.attach_surface(surface);

    let mut save = DirSave::new(out_dir);
    match session.export_now(&mut save)? {
        ExportOutcome::Saved {
            file_name,
            width,
            height,
        } => {
            eprintln!("wrote {} ({width}x{height})", out_dir.join(file_name).display());
            Ok(())
        }
        ExportOutcome::Skipped(reason) => anyhow::bail!("export skipped: {reason}"),
        ExportOutcome::Busy | ExportOutcome::Scheduled => {
            anyhow::bail!("export did not run")
        }
    }
}

fn report(event: &SequencerEvent) {
    match event {
        SequencerEvent::CountdownStarted { from, .. } => eprintln!("get ready... {from}"),
        SequencerEvent::CountdownTick { remaining, .. } if *remaining > 0 => {
            eprintln!("{remaining}")
        }
        SequencerEvent::Captured { index, .. } => eprintln!("snap #{}", index + 1),
        SequencerEvent::Completed { shots, .. } => eprintln!("done: {shots} shots"),
        _ => {}
    }
}

fn still_ext(still: &EncodedImage) -> &'static str {
    match still.media_type.as_str() {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// Lightplane Terminal - interactive light-plane projection preview
///
/// Projects the scene's boxes onto the directional light's image plane and
/// fits the shadow camera around them. Keys adjust the scene; every change
/// re-runs the projection.
use anyhow::{Context, Result};
use clap::Parser;
use lightplane_core::{FitPolicy, Mesh, Pipeline, Scene, SceneConfig};
use lightplane_terminal::TerminalApp;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lightplane")]
#[command(about = "Project scene geometry onto a light's image plane", long_about = None)]
struct Cli {
    /// Scene description (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Add an STL mesh to the scene (can specify multiple)
    #[arg(long)]
    stl: Vec<PathBuf>,

    /// Shadow frustum fit: tight or symmetric
    #[arg(short, long)]
    policy: Option<FitPolicy>,

    /// Run one projection pass, print it and exit
    #[arg(long)]
    once: bool,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let (mut scene, config_policy) = match &cli.config {
        Some(path) => {
            let config = SceneConfig::load(path)
                .with_context(|| format!("Failed to load scene config {}", path.display()))?;
            let policy = config.policy()?;
            let base_dir = path.parent().unwrap_or(Path::new("."));
            (config.into_scene(base_dir)?, policy)
        }
        None => (Scene::default(), FitPolicy::default()),
    };

    for path in &cli.stl {
        let data = fs::read(path).with_context(|| format!("Failed to read STL file {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stl".to_string());
        let mesh = Mesh::from_stl(name, &data)
            .with_context(|| format!("Failed to parse STL file {}", path.display()))?;
        scene.meshes.push(mesh);
    }

    let pipeline = Pipeline::new(scene, cli.policy.unwrap_or(config_policy));

    if cli.once {
        print_pass(&pipeline);
        return Ok(());
    }

    let mut app = TerminalApp::new(pipeline)?;
    app.run()?;

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn print_pass(pipeline: &Pipeline) {
    let pass = pipeline.last_pass();

    if let Some(basis) = &pass.basis {
        println!(
            "basis normal {:?} p1 {:?} p2 {:?}{}",
            basis.normal.as_slice(),
            basis.p1.as_slice(),
            basis.p2.as_slice(),
            if basis.used_fallback { " (fallback)" } else { "" }
        );
    }

    for span in &pass.result.spans {
        println!("{}:", span.name);
        for p in &pass.result.points[span.range.clone()] {
            println!("  {:.3} {:.3}", p.x, p.y);
        }
    }

    match (&pass.extents, &pass.skipped) {
        (Some(e), _) => println!(
            "{} extents left {:.3} right {:.3} top {:.3} bottom {:.3}",
            pipeline.policy().name(),
            e.left,
            e.right,
            e.top,
            e.bottom
        ),
        (None, Some(reason)) => println!("extents unchanged: {reason}"),
        (None, None) => {}
    }
}

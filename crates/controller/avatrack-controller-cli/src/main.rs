use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use avatrack_controller_core::{
    persist_generated, AssetLayout, AvatarDescriptor, ControllerGraph, DirectoryAssetSink,
    ExpressionParameters, ExpressionsMenu, GeneratedAssets, GeneratorConfig, GraphComposer,
    ParameterCatalog,
};
use avatrack_rig_core::{
    export_bone_mapping, load_bone_mapping, BoneMapping, Skeleton, SkeletonSource,
};

#[derive(Parser)]
#[command(name = "avatrack", version, about = "Body-tracking controller generator")]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the bone-mapping interchange text for a skeleton.
    ExportMapping {
        #[arg(long)]
        skeleton: PathBuf,
        /// Avatar name for the header; defaults to the skeleton root name.
        #[arg(long)]
        name: Option<String>,
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate the tracking controller and its assets.
    Generate {
        #[arg(long)]
        skeleton: PathBuf,
        /// Bone-mapping interchange file whose entries override the skeleton.
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Generator configuration (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Existing controller (JSON) to regenerate in place.
        #[arg(long)]
        controller: Option<PathBuf>,
        /// Existing character descriptor (JSON) to update.
        #[arg(long)]
        descriptor: Option<PathBuf>,
        /// Output directory the asset paths are rooted at.
        #[arg(long)]
        out: PathBuf,
        /// Fail on malformed or unknown mapping lines instead of skipping them.
        #[arg(long)]
        strict_mapping: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.cmd {
        Commands::ExportMapping {
            skeleton,
            name,
            output,
        } => export_mapping(&skeleton, name.as_deref(), output.as_deref()),
        Commands::Generate {
            skeleton,
            mapping,
            config,
            controller,
            descriptor,
            out,
            strict_mapping,
        } => generate(GenerateArgs {
            skeleton: &skeleton,
            mapping: mapping.as_deref(),
            config: config.as_deref(),
            controller: controller.as_deref(),
            descriptor: descriptor.as_deref(),
            out: &out,
            strict_mapping,
        }),
    }
}

fn read_skeleton(path: &Path) -> Result<Skeleton> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read skeleton {}", path.display()))?;
    Skeleton::from_json_str(&json)
        .with_context(|| format!("invalid skeleton {}", path.display()))
}

fn export_mapping(skeleton: &Path, name: Option<&str>, output: Option<&Path>) -> Result<()> {
    let skeleton = read_skeleton(skeleton)?;
    let avatar = name.unwrap_or_else(|| skeleton.name(skeleton.root()));
    let text = export_bone_mapping(&skeleton, avatar);
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("failed to write mapping {}", path.display()))?;
            log::info!("bone mapping for '{avatar}' written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

struct GenerateArgs<'a> {
    skeleton: &'a Path,
    mapping: Option<&'a Path>,
    config: Option<&'a Path>,
    controller: Option<&'a Path>,
    descriptor: Option<&'a Path>,
    out: &'a Path,
    strict_mapping: bool,
}

fn load_overrides(path: Option<&Path>, strict: bool) -> Result<BoneMapping> {
    let Some(path) = path else {
        return Ok(BoneMapping::new());
    };
    let parsed = load_bone_mapping(path)
        .with_context(|| format!("failed to load bone mapping {}", path.display()))?;
    if strict && !parsed.warnings.is_empty() {
        bail!(
            "bone mapping {} has {} problem(s): {:?}",
            path.display(),
            parsed.warnings.len(),
            parsed.warnings
        );
    }
    Ok(parsed.mapping)
}

fn generate(args: GenerateArgs<'_>) -> Result<()> {
    let skeleton = read_skeleton(args.skeleton)?;
    let avatar = skeleton.name(skeleton.root()).to_string();

    let config = match args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GeneratorConfig::from_json_str(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    let overrides = load_overrides(args.mapping, args.strict_mapping)?;

    let layout = AssetLayout::new(&config, &avatar);
    let mut graph = match args.controller {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read controller {}", path.display()))?;
            ControllerGraph::from_json_str(&json)
                .with_context(|| format!("invalid controller {}", path.display()))?
        }
        None => ControllerGraph::new(layout.controller_name()),
    };

    let catalog = ParameterCatalog::standard();
    let report = GraphComposer::new(&catalog, &config)
        .compose(Some(&skeleton), &overrides, &mut graph)
        .context("failed to generate tracking layers")?;
    for miss in &report.unresolved {
        log::warn!("{}: no path for {}", miss.layer, miss.joint);
    }

    let mut descriptor = match args.descriptor {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read descriptor {}", path.display()))?;
            AvatarDescriptor::from_json_str(&json)
                .with_context(|| format!("invalid descriptor {}", path.display()))?
        }
        None => AvatarDescriptor::new(avatar.as_str()),
    };
    if config.bind_action_slot {
        descriptor.configure_tracking_layers(&layout.controller_path());
    }
    descriptor.set_expression_assets(&layout.parameters_path(), &layout.menu_path());

    let parameters = ExpressionParameters::from_catalog(&catalog);
    let menu = ExpressionsMenu::tracking();
    let mut sink = DirectoryAssetSink::new(args.out);
    persist_generated(
        &mut sink,
        &layout,
        GeneratedAssets {
            controller: &graph,
            parameters: &parameters,
            menu: &menu,
            descriptor: Some(&descriptor),
        },
    )
    .with_context(|| format!("failed to write assets under {}", args.out.display()))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to encode report")?
    );
    Ok(())
}

//! Raw Export CLI
//!
//! Export objects from a JSON scene description.

use clap::{Parser, Subcommand};
use raw_export::debug::cube_sides;
use raw_export::{CommandReport, EncoderChain, ExportConfig, Exporter, Scene};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "raw-export")]
#[command(author, version, about = "Export scene meshes to raw JSON", long_about = None)]
struct Cli {
    /// Scene description (JSON)
    #[arg(short, long, global = true, default_value = "scene.json")]
    scene: PathBuf,

    /// Base export directory (overrides the scene setting)
    #[arg(short, long, global = true)]
    base_dir: Option<PathBuf>,

    /// UV layer to export (defaults to the active layer)
    #[arg(long, global = true)]
    uv_layer: Option<String>,

    /// Create missing output directories
    #[arg(long, global = true)]
    create_dirs: bool,

    /// JSON indentation width
    #[arg(long, global = true, default_value = "4")]
    indent: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the active object, or the named one
    Object {
        /// Object name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Export a collection and its sub-collections
    Collection {
        /// Collection name (defaults to the active collection)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Export every eligible object
    All,

    /// Check an object's export as a triangulated test cube
    InspectCube {
        /// Object name (defaults to the active object)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Loading scene from {:?}...", cli.scene);
    let mut scene = Scene::load(&cli.scene)?;
    log::info!(
        "  Found {} objects in {} collections",
        scene.objects.len(),
        scene.collections.len()
    );

    let mut config = ExportConfig::default()
        .with_indent(cli.indent)
        .with_create_dirs(cli.create_dirs);
    if let Some(base_dir) = cli.base_dir {
        config = config.with_base_dir(base_dir);
    }
    if let Some(layer) = cli.uv_layer {
        config = config.with_uv_layer(layer);
    }
    let mut exporter = Exporter::new(config);

    let report = match cli.command {
        Commands::Object { name } => {
            if let Some(name) = name {
                scene.active_object = Some(find_object(&scene, &name)?);
            }
            exporter.export_single_object(&mut scene)?
        }
        Commands::Collection { name } => {
            if let Some(name) = name {
                let id = scene
                    .collections
                    .iter()
                    .position(|c| c.name == name)
                    .ok_or_else(|| format!("No collection named '{}'", name))?;
                scene.active_collection = Some(id);
            }
            exporter.export_active_collection(&mut scene)?
        }
        Commands::All => exporter.export_all(&mut scene)?,
        Commands::InspectCube { name } => {
            let id = match name {
                Some(name) => find_object(&scene, &name)?,
                None => scene.active_object.ok_or("No active object")?,
            };
            inspect_cube(&exporter, &scene, id)?;
            return Ok(());
        }
    };

    match report {
        CommandReport::Finished { written } => {
            println!("Exported {} file(s)", written.len());
            for path in written {
                println!("  {}", path.display());
            }
        }
        CommandReport::Cancelled { reason } => {
            println!("Nothing exported: {}", reason);
        }
    }

    Ok(())
}

fn find_object(scene: &Scene, name: &str) -> Result<usize, String> {
    scene
        .objects
        .iter()
        .position(|o| o.name == name)
        .ok_or_else(|| format!("No object named '{}'", name))
}

fn inspect_cube(exporter: &Exporter, scene: &Scene, id: usize) -> Result<(), Box<dyn std::error::Error>> {
    let data = exporter.object_data(scene, id)?;
    let sides = cube_sides(&data)?;

    let chain = EncoderChain::standard().with_indent(exporter.config().indent);
    println!("{}", chain.to_string_pretty(&sides)?);

    let mismatched = sides.iter().filter(|s| !s.faces_match).count();
    if mismatched > 0 {
        log::warn!("{} of {} sides have triangles on different axes", mismatched, sides.len());
    }
    Ok(())
}

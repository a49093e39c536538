use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tipsmith::{config, output, render, scan, site};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "tipsmith")]
#[command(about = "Static site generator for tip article collections")]
#[command(long_about = "\
Static site generator for tip article collections

Each article is a text file with a front-matter header followed by a
markdown body. The header routes and orders the page; the directory
layout carries no meaning.

Content structure:

  content/
  ├── config.toml              # Site config (optional)
  ├── about.md                 # permalink: /about.html
  └── tips/
      ├── 1.md                 # permalink: /tips/1, order: 1
      ├── 2.md
      └── drafts/
          └── 9.md             # published: false until ready

Front matter:

  ---
  title: Tip of the Week #1: string views    # required
  permalink: /tips/1                         # required, unique
  order: 1                                   # nav position (optional)
  layout: tip                                # template name (optional)
  published: true                            # false = draft (optional)
  ---

Run 'tipsmith gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory of NAME.html templates overriding the built-in layouts
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → render → write
    Build {
        /// Also render documents marked published: false
        #[arg(long)]
        drafts: bool,
    },
    /// Parse the content directory and print the manifest as JSON
    Scan,
    /// Validate the content directory without writing output
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { drafts } => {
            println!("==> Building {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let templates = load_templates(cli.templates.as_deref())?;
            let options = site::BuildOptions {
                include_drafts: drafts,
            };
            let pages = site::generate(&manifest, &templates, &cli.output, &options)?;
            output::print_build_output(&pages);
            println!("==> Site generated at {}", cli.output.display());
        }
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let templates = load_templates(cli.templates.as_deref())?;
            // Render everything in memory, drafts included, so a broken
            // draft is caught here and not by a later `build --drafts`.
            let options = site::BuildOptions {
                include_drafts: true,
            };
            site::build(&manifest, &templates, &options)?;
            output::print_scan_output(&manifest);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_templates(dir: Option<&std::path::Path>) -> Result<render::TemplateSet, render::RenderError> {
    let mut templates = render::TemplateSet::builtin();
    if let Some(dir) = dir {
        let loaded = templates.load_overrides(dir)?;
        println!("Loaded {loaded} template override(s) from {}", dir.display());
    }
    Ok(templates)
}

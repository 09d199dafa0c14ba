use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use certpress::{qr, Composer, ComposerConfig, ExportOptions, Theme};

#[derive(Parser)]
#[command(name = "certpress", version, about = "Compose certificate PNGs from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose and export a certificate PNG
    Compose {
        /// Recipient name (upper-cased on the certificate)
        #[arg(long)]
        name: Option<String>,
        /// Issuer (signer) name
        #[arg(long)]
        issuer: Option<String>,
        /// Signature image file to embed
        #[arg(long)]
        signature: Option<PathBuf>,
        /// Theme preset name, or path to a theme JSON file
        #[arg(long, default_value = "elite")]
        theme: String,
        /// Upscaling factor (1-4)
        #[arg(long, default_value_t = 2)]
        scale: u32,
        /// Output directory for the PNG
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// TrueType font file for text rendering
        #[arg(long)]
        font: Option<PathBuf>,
        /// Discover a system font when --font is not given
        #[arg(long)]
        system_font: bool,
        /// Override the formatted issue date
        #[arg(long)]
        date: Option<String>,
        /// Print the draft snapshot as JSON after exporting
        #[arg(long)]
        json: bool,
    },
    /// List the built-in theme presets
    Themes,
    /// Print the verification URL for a recipient name
    VerifyUrl {
        name: String,
        /// Theme whose verify domain to use
        #[arg(long, default_value = "elite")]
        theme: String,
    },
}

fn resolve_theme(arg: &str) -> anyhow::Result<Theme> {
    if arg.ends_with(".json") {
        Ok(Theme::from_json_file(std::path::Path::new(arg))?)
    } else {
        Ok(Theme::preset(arg)?)
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compose {
            name,
            issuer,
            signature,
            theme,
            scale,
            out,
            font,
            system_font,
            date,
            json,
        } => {
            let theme = resolve_theme(&theme)?;
            let config = ComposerConfig {
                font_file: font,
                use_system_font: system_font,
                ..Default::default()
            };
            let mut composer = Composer::new(config, theme)?;

            if let Some(name) = name {
                composer.set_recipient_name(&name);
            }
            if let Some(issuer) = issuer {
                composer.set_issuer_name(&issuer);
            }
            if let Some(date) = date {
                composer.set_issue_date_display(&date);
            }
            if let Some(path) = signature {
                #[cfg(feature = "upload")]
                {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("cannot read signature file {}", path.display()))?;
                    composer.upload_signature(&bytes)?;
                }
                #[cfg(not(feature = "upload"))]
                anyhow::bail!(
                    "signature upload is not available in this build (missing the `upload` feature): {}",
                    path.display()
                );
            }

            let artifact = composer.export(&ExportOptions { scale })?;
            let path = artifact.write_to(&out)?;
            println!("{}", path.display());
            if json {
                println!("{}", serde_json::to_string_pretty(&composer.snapshot())?);
            }
        }
        Commands::Themes => {
            for name in Theme::preset_names() {
                let theme = Theme::preset(name)?;
                println!(
                    "{:10} {}x{}{}",
                    theme.name,
                    theme.width,
                    theme.height,
                    if theme.background.is_none() {
                        " (transparent)"
                    } else {
                        ""
                    }
                );
            }
        }
        Commands::VerifyUrl { name, theme } => {
            let theme = resolve_theme(&theme)?;
            println!("{}", qr::verify_url(&theme.verify_domain, &name.to_uppercase()));
        }
    }
    Ok(())
}

fn main() {
    // Every failure here maps to one retryable user action; report it as a
    // notification on stderr and exit nonzero instead of panicking.
    if let Err(e) = run() {
        eprintln!("certpress: {:#} (retry the action)", e);
        std::process::exit(1);
    }
}

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::listing::render_tree;
use crate::artifact::{ArtifactError, ArtifactFormat};
use crate::bundle::PackageBundle;
use crate::cli::Command;
use crate::config::{TypeTable, TypeTableError};
use crate::projection::{ExtractError, ScanError};

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let types = match &app_config.types {
            Some(path) => TypeTable::read(path).context(TypeTableSnafu)?,
            None => TypeTable::default(),
        };
        debug!("Using type table: {:?}", types);

        match app_config.command {
            Command::Pack {
                source,
                artifact,
                format,
                no_compress,
                codec,
            } => {
                let bundle = PackageBundle::from_path(&source, &types).context(ScanSnafu)?;
                if format == ArtifactFormat::Binary && !no_compress {
                    bundle
                        .bundle_with(&artifact, format, codec.codec().as_ref())
                        .context(ArtifactSnafu)?;
                } else {
                    bundle
                        .bundle(&artifact, format, false)
                        .context(ArtifactSnafu)?;
                }
                println!("Packed {} into {}", source.display(), artifact.display());
            }
            Command::Unpack {
                artifact,
                output,
                format,
                codec,
            } => {
                let bundle = PackageBundle::open_with(&artifact, format, codec.codec().as_ref())
                    .context(ArtifactSnafu)?;
                let report = bundle.extract(&output, &types).context(ExtractSnafu)?;
                info!("Extraction report: {:?}", report);
                println!(
                    "Unpacked {} files into {}",
                    report.written.len(),
                    output.display()
                );
                for skipped in &report.skipped {
                    println!("  skipped {} (unknown type '{}')", skipped.path, skipped.kind);
                }
            }
            Command::Inspect {
                artifact,
                format,
                codec,
            } => {
                let bundle = PackageBundle::open_with(&artifact, format, codec.codec().as_ref())
                    .context(ArtifactSnafu)?;
                print!("{}", render_tree(&bundle, &types));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the type table"))]
    TypeTableError { source: TypeTableError },
    #[snafu(display("Critical failure encountered while reading the source directory"))]
    ScanError { source: ScanError },
    #[snafu(display("Critical failure encountered while handling the artifact"))]
    ArtifactError { source: ArtifactError },
    #[snafu(display("Critical failure encountered while extracting the bundle"))]
    ExtractError { source: ExtractError },
}

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{Component, Path, PathBuf},
};
use tracing::{info, warn};
use vpk_archive::{EntryStorage, VpkArchive};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input VPK directory file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only extract files whose path starts with this prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Entry paths are only joined onto the target when they stay inside it
fn is_contained(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let vpk = VpkArchive::open(&self.file).context(format!("path: {}", self.file.display()))?;
        let written = self.extract(&vpk)?;
        info!("extracted {} of {} files", written, vpk.len());
        Ok(())
    }

    fn extract(&self, vpk: &VpkArchive) -> Result<usize> {
        let mut written = 0;
        for entry in vpk.files() {
            let name = entry.full_path();
            if let Some(prefix) = &self.prefix {
                if !name.starts_with(prefix.as_str()) {
                    continue;
                }
            }

            if !is_contained(&name) {
                warn!("skipping {}, it would leave the target directory", name);
                continue;
            }

            if entry.storage() == EntryStorage::Unsupported {
                warn!("skipping {}, it has both preload data and a payload", name);
                continue;
            }

            let p = self.directory.join(&name);
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }

            let data = entry.read_to_vec().context(format!("reading {}", name))?;
            let mut out = if !self.overwrite {
                File::create_new(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            } else {
                File::create(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            };

            out.write_all(&data).into_diagnostic()?;
            written += 1;
        }

        Ok(written)
    }
}

use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{io::Write, path::PathBuf};
use vpk_archive::VpkArchive;

#[derive(Args)]
pub struct CatArgs {
    /// An input VPK directory file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Path of the file inside the archive, such as `materials/models/hero.vmt`
    name: String,
}

impl CatArgs {
    pub fn handle(&self) -> Result<()> {
        let vpk = VpkArchive::open(&self.file).context(format!("path: {}", self.file.display()))?;
        self.write_to(&vpk, &mut std::io::stdout().lock())
    }

    fn write_to(&self, vpk: &VpkArchive, out: &mut impl Write) -> Result<()> {
        let entry = vpk
            .get_file(&self.name)
            .ok_or(miette!("{} not found in {}", self.name, self.file.display()))?;

        let data = entry.read_to_vec().context(format!("reading {}", self.name))?;
        out.write_all(&data).into_diagnostic()?;
        out.flush().into_diagnostic()?;

        Ok(())
    }
}

use anyhow::Result;
use libnoted::Noted;
use noted_term::Output;

use crate::ui::render_change_status;

/// Run the `noted status` command logic.
pub fn status(noted: &Noted, output: &dyn Output) -> Result<()> {
    for repo in noted.status()? {
        render_change_status(output, noted.root(), &repo)?;
    }
    Ok(())
}

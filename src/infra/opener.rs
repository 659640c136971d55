use anyhow::Result;

use crate::infra::contracts::ExternalOpener;

/// Opens targets with the platform launcher (image URLs in the viewer).
#[derive(Debug, Clone, Default)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<()> {
        open::that_detached(target)?;
        Ok(())
    }
}

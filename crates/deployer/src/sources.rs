//! Contract Sources - loading Clarity files from disk

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One contract source ready to deploy
#[derive(Debug, Clone)]
pub struct ContractSource {
    pub name: String,
    pub code: String,
}

/// Load `{dir}/{name}.clar` for every listed contract, in order
pub fn load_contract_sources(dir: &Path, names: &[String]) -> Result<Vec<ContractSource>> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(format!("{}.clar", name));
            let code = fs::read_to_string(&path)
                .with_context(|| format!("reading contract source {}", path.display()))?;
            Ok(ContractSource {
                name: name.clone(),
                code,
            })
        })
        .collect()
}

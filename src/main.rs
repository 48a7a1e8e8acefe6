use std::path::PathBuf;

use anyhow::Context;

use cutkit::{
    init_logging, standard_catalog, FileProjectStore, NoOpRenderSink, PartStore, ProjectReport,
};

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cutkit <project.json>")?;

    let mut store = PartStore::new(
        standard_catalog(),
        Box::new(FileProjectStore::new(&path)),
        Box::new(NoOpRenderSink::new()),
    );
    store
        .load_project()
        .with_context(|| format!("failed to load project {}", path.display()))?;

    print!("{}", ProjectReport::new(&store));
    Ok(())
}

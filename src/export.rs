use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::FilterValue;
use crate::view::{Dashboard, DashboardView};

/// Every dropdown option with the eight chart specs it produces.
#[derive(Debug, Serialize)]
pub struct DashboardExport {
    pub rows: usize,
    pub options: Vec<FilterValue>,
    pub views: Vec<DashboardView>,
}

/// Run the view controller once per option.
pub fn export_views(dashboard: &Dashboard) -> DashboardExport {
    let options = dashboard.options();
    let views = options
        .iter()
        .map(|value| dashboard.on_filter_change(value))
        .collect();
    DashboardExport {
        rows: dashboard.table().len(),
        options,
        views,
    }
}

/// Serialise the export as pretty-printed JSON.
pub fn write_json(export: &DashboardExport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, export)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    log::info!(
        "exported {} views to {}",
        export.views.len(),
        path.display()
    );
    Ok(())
}

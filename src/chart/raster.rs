use super::{ChartSpec, svg};
use crate::error::{GanttError, GanttResult};
use resvg::{tiny_skia, usvg};
use std::fs;
use std::path::Path;

/// Rasterizes the chart's SVG rendering into PNG bytes.
pub fn rasterize(spec: &ChartSpec) -> GanttResult<Vec<u8>> {
    let markup = svg::render(spec);
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&markup, &options)
        .map_err(|err| GanttError::Render(format!("invalid chart svg: {err}")))?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        GanttError::Render(format!(
            "cannot allocate a {}x{} image",
            size.width(),
            size.height()
        ))
    })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|err| GanttError::Render(format!("png encoding failed: {err}")))
}

pub fn write_png<P: AsRef<Path>>(spec: &ChartSpec, path: P) -> GanttResult<()> {
    let path = path.as_ref();
    let png = rasterize(spec)?;
    fs::write(path, png).map_err(|err| GanttError::io(path, err))
}

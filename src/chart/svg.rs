use super::{Bar, ChartSpec, TimeAxis};
use chrono::NaiveDate;

const MARGIN_LEFT: f64 = 180.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 70.0;
const BAR_FILL_RATIO: f64 = 0.8;
const MIN_BAR_WIDTH: f64 = 2.0;
const LABEL_FONT_SIZE: u32 = 12;
const AXIS_TITLE_FONT_SIZE: u32 = 14;

struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn for_spec(spec: &ChartSpec) -> Self {
        let width = (f64::from(spec.layout.width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let height = (f64::from(spec.layout.height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width,
            height,
        }
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn x_for(&self, axis: &TimeAxis, date: NaiveDate) -> f64 {
        let span = axis.span_days().max(1) as f64;
        let offset = (date - axis.start).num_days() as f64;
        self.left + offset / span * self.width
    }

    fn row_height(&self, categories: usize) -> f64 {
        self.height / categories.max(1) as f64
    }

    /// Category 0 sits at the bottom of the plot.
    fn row_top(&self, index: usize, categories: usize) -> f64 {
        self.bottom() - (index as f64 + 1.0) * self.row_height(categories)
    }
}

/// Draws the chart as a standalone SVG document.
pub fn render(spec: &ChartSpec) -> String {
    let layout = &spec.layout;
    let plot = PlotArea::for_spec(spec);
    let mut out = String::new();

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = layout.width,
        h = layout.height,
        font = escape(&layout.font_family),
    ));
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        layout.width,
        layout.height,
        escape(&layout.paper_bgcolor)
    ));
    out.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
        plot.left,
        plot.top,
        plot.width,
        plot.height,
        escape(&layout.plot_bgcolor)
    ));

    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
        f64::from(layout.width) * layout.title_x,
        MARGIN_TOP / 2.0,
        escape(&layout.title_font_family),
        layout.title_font_size,
        escape(&layout.font_color),
        escape(&spec.title)
    ));

    if let Some(axis) = &spec.time_axis {
        render_time_axis(&mut out, spec, &plot, axis);
        render_categories(&mut out, spec, &plot);
        for bar in &spec.bars {
            render_bar(&mut out, spec, &plot, axis, bar);
        }
    }

    render_axis_titles(&mut out, spec, &plot);
    render_legend(&mut out, spec, &plot);

    out.push_str("</svg>");
    out
}

fn render_time_axis(out: &mut String, spec: &ChartSpec, plot: &PlotArea, axis: &TimeAxis) {
    let color = escape(&spec.layout.font_color);
    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1"/>"#,
        plot.left,
        plot.bottom(),
        plot.right(),
        plot.bottom(),
        color
    ));
    for tick in &axis.ticks {
        let x = plot.x_for(axis, tick.date);
        if spec.layout.show_grid {
            out.push_str(&format!(
                r##"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="#FFFFFF" stroke-width="1"/>"##,
                plot.top,
                plot.bottom()
            ));
        }
        out.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{}" stroke-width="1"/>"#,
            plot.bottom(),
            plot.bottom() + 5.0,
            color
        ));
        out.push_str(&format!(
            r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle" font-size="{}" fill="{}">{}</text>"#,
            plot.bottom() + 20.0,
            LABEL_FONT_SIZE,
            color,
            escape(&tick.label)
        ));
    }
}

fn render_categories(out: &mut String, spec: &ChartSpec, plot: &PlotArea) {
    let categories = spec.category_order.len();
    let row_height = plot.row_height(categories);
    let color = escape(&spec.layout.font_color);
    for (index, name) in spec.category_order.iter().enumerate() {
        let y = plot.row_top(index, categories) + row_height / 2.0;
        if spec.layout.show_grid {
            out.push_str(&format!(
                r##"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#FFFFFF" stroke-width="1"/>"##,
                plot.left,
                plot.right()
            ));
        }
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{y:.2}" text-anchor="end" dominant-baseline="middle" font-size="{}" fill="{}">{}</text>"#,
            plot.left - 8.0,
            LABEL_FONT_SIZE,
            color,
            escape(name)
        ));
    }
}

fn render_bar(out: &mut String, spec: &ChartSpec, plot: &PlotArea, axis: &TimeAxis, bar: &Bar) {
    let Some(index) = spec.category_index(&bar.task) else {
        return;
    };
    let categories = spec.category_order.len();
    let row_height = plot.row_height(categories);
    let thickness = row_height * BAR_FILL_RATIO;
    let y = plot.row_top(index, categories) + (row_height - thickness) / 2.0;

    let (from, to) = bar.extent();
    let mut x = plot.x_for(axis, from);
    let mut width = plot.x_for(axis, to) - x;
    if width < MIN_BAR_WIDTH {
        x -= (MIN_BAR_WIDTH - width) / 2.0;
        width = MIN_BAR_WIDTH;
    }

    out.push_str(&format!(
        r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{thickness:.2}" fill="{}"><title>{}</title></rect>"#,
        escape(&bar.color),
        escape(&hover_text(bar))
    ));
}

fn hover_text(bar: &Bar) -> String {
    format!(
        "Task={}\nSection={}\nStart={}\nFinish={}\nCritical Path={}",
        bar.task, bar.section, bar.start, bar.finish, bar.critical_path
    )
}

fn render_axis_titles(out: &mut String, spec: &ChartSpec, plot: &PlotArea) {
    let color = escape(&spec.layout.font_color);
    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="{}" fill="{}">{}</text>"#,
        plot.left + plot.width / 2.0,
        plot.bottom() + 50.0,
        AXIS_TITLE_FONT_SIZE,
        color,
        escape(&spec.layout.x_axis_title)
    ));
    let x = 24.0;
    let y = plot.top + plot.height / 2.0;
    out.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" transform="rotate(-90 {x:.2} {y:.2})" font-size="{}" fill="{}">{}</text>"#,
        AXIS_TITLE_FONT_SIZE,
        color,
        escape(&spec.layout.y_axis_title)
    ));
}

fn render_legend(out: &mut String, spec: &ChartSpec, plot: &PlotArea) {
    if spec.legend.is_empty() {
        return;
    }
    let color = escape(&spec.layout.font_color);
    let x = plot.right() + 20.0;
    let mut y = plot.top + 10.0;
    out.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" font-size="{}" fill="{}">{}</text>"#,
        LABEL_FONT_SIZE,
        color,
        escape(&spec.legend_title)
    ));
    for entry in &spec.legend {
        y += 22.0;
        out.push_str(&format!(
            r#"<rect x="{x:.2}" y="{:.2}" width="14" height="14" fill="{}"/>"#,
            y - 11.0,
            escape(&entry.color)
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{y:.2}" font-size="{}" fill="{}">{}</text>"#,
            x + 20.0,
            LABEL_FONT_SIZE,
            color,
            escape(entry.label.as_str())
        ));
    }
}

pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

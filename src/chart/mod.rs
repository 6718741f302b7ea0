/// Chart layer: summaries → declarative chart specifications.
///
/// Nothing in here depends on the UI toolkit; colours are plain sRGB
/// triples and every spec serialises with serde.

pub mod builder;
pub mod color;
pub mod spec;
pub mod style;

pub use builder::{build, Summary};
pub use color::{ColorMap, ColorScale, Rgb};
pub use spec::{ChartKind, ChartSpec, GridAxis, Panel, Series};
pub use style::{ChartStyle, DashboardStyle};

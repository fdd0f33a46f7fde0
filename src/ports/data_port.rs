use crate::domain::error::SigtraderError;
use crate::domain::series::Series;
use std::path::Path;

/// Supplies historical bar series from some backing store.
pub trait SeriesSource {
    fn load_series(&self, path: &Path) -> Result<Series, SigtraderError>;
}

use serde::Serialize;
use std::fmt;

/// Inclusive range of years admitted by the import and used to filter analytics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct YearWindow {
    pub min: i32,
    pub max: i32,
}

pub const YEAR_MIN: i32 = 2010;
pub const YEAR_MAX: i32 = 2025;

/// The window the dataset is studied in.
pub const STUDY_WINDOW: YearWindow = YearWindow {
    min: YEAR_MIN,
    max: YEAR_MAX,
};

impl YearWindow {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        STUDY_WINDOW
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.min, self.max)
    }
}

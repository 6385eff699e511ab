use chrono::{Local, NaiveDate, NaiveDateTime};

/// The instant a message is interpreted at.
///
/// Every date-relative rule reads the current time from here, never from the
/// system clock directly, so parsing is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: NaiveDateTime,
}

impl Clock {
    #[must_use]
    pub fn fixed(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// The local wall-clock time.
    #[must_use]
    pub fn system() -> Self {
        Self::fixed(Local::now().naive_local())
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

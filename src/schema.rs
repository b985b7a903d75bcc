/// Column-name constants for bikeshare trip tables.

// ── Source columns ──────────────────────────────────────────────────────────
pub mod trip {
    pub const START_TIME: &str = "Start Time";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const USER_TYPE: &str = "User Type";

    pub const REQUIRED: [&str; 5] = [
        START_TIME,
        START_STATION,
        END_STATION,
        TRIP_DURATION,
        USER_TYPE,
    ];
}

// ── Demographic columns (not present for every city) ───────────────────────
pub mod demographics {
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    pub const ALL: [&str; 2] = [GENDER, BIRTH_YEAR];
}

// ── Columns derived from Start Time ────────────────────────────────────────
pub mod derived {
    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const HOUR: &str = "hour";
}

/// Timestamp layout used by the source files.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

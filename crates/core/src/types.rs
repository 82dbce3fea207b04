/// All primary keys are PostgreSQL `UUID` values generated by `gen_random_uuid()`.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (formation dates, deadlines) carry no time zone.
pub type Date = chrono::NaiveDate;

//! v001: organisation unit paths and stored min-max bounds.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS organisationunit (
    uid TEXT PRIMARY KEY,
    path TEXT NOT NULL UNIQUE,
    hierarchylevel INTEGER NOT NULL CHECK (hierarchylevel >= 1)
) STRICT;

CREATE TABLE IF NOT EXISTS minmaxdataelement (
    dataelement_uid TEXT NOT NULL,
    orgunit_uid TEXT NOT NULL REFERENCES organisationunit(uid) ON DELETE CASCADE,
    categoryoptioncombo_uid TEXT NOT NULL,
    minimumvalue REAL NOT NULL,
    maximumvalue REAL NOT NULL,
    generated INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (dataelement_uid, orgunit_uid, categoryoptioncombo_uid),
    CHECK (minimumvalue <= maximumvalue)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_minmax_dataelement ON minmaxdataelement(dataelement_uid);
";

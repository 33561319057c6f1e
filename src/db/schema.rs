pub const SCHEMA: &str = r#"
-- Artifact metadata: one row per object id
CREATE TABLE IF NOT EXISTS artifact_metadata (
    id INTEGER PRIMARY KEY,
    title TEXT,
    culture TEXT,
    period TEXT,
    century TEXT,
    medium TEXT,
    dimensions TEXT,
    description TEXT,
    department TEXT,
    classification TEXT,
    accessionyear INTEGER,
    accessionmethod TEXT
);

-- Indexes for the columns the query catalog filters and joins on
CREATE INDEX IF NOT EXISTS idx_metadata_culture ON artifact_metadata(culture);
CREATE INDEX IF NOT EXISTS idx_metadata_classification ON artifact_metadata(classification);
CREATE INDEX IF NOT EXISTS idx_metadata_accessionyear ON artifact_metadata(accessionyear);

-- Media statistics: references artifact_metadata(id) through insertion
-- order only, no declared constraint
CREATE TABLE IF NOT EXISTS artifact_media (
    objectid INTEGER NOT NULL,
    imagecount INTEGER,
    mediacount INTEGER,
    colorcount INTEGER,
    ranks INTEGER,
    datebegin INTEGER,
    dateend INTEGER
);

CREATE INDEX IF NOT EXISTS idx_media_objectid ON artifact_media(objectid);

-- Color breakdown: one row per color entry of a record
CREATE TABLE IF NOT EXISTS artifact_colors (
    objectid INTEGER NOT NULL,
    color TEXT,
    spectrum TEXT,
    hue TEXT,
    percent REAL,
    css3 TEXT
);

CREATE INDEX IF NOT EXISTS idx_colors_objectid ON artifact_colors(objectid);
CREATE INDEX IF NOT EXISTS idx_colors_hue ON artifact_colors(hue);
"#;
